use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "rectshade", version)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene as a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Software)]
    backend: BackendChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Software,
    Accelerated,
}

impl From<BackendChoice> for rectshade::BackendKind {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Software => Self::Software,
            BackendChoice::Accelerated => Self::Accelerated,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<rectshade::Scene> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let scene: rectshade::Scene =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse scene JSON")?;
    scene.validate()?;
    Ok(scene)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut scene = read_scene_json(&args.scene)?;
    scene.opts = scene
        .opts
        .clone()
        .with_overrides(|key| std::env::var(key).ok());

    let base_dir = args.scene.parent().unwrap_or_else(|| Path::new("."));
    let fb = rectshade::render_scene(&scene, base_dir, args.backend.into())?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &fb.to_rgba8(),
        scene.width,
        scene.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
