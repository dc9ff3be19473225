use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;

use crate::compose::{
    BgDesc, BgImageDesc, BorderDesc, Compositor, DrawCtx, ImageDesc, ImageSource, OutlineDesc,
    RectDesc, ShadowDesc,
};
use crate::foundation::core::{Color, OPA_COVER, Opa};
use crate::foundation::error::{Outcome, RectError, RectResult};
use crate::foundation::settings::CompositorOpts;
use crate::geometry::area::Area;
use crate::geometry::radius::RadiusMask;
use crate::pixel::buffer::{Framebuffer, ImageData};
use crate::pixel::format::ColorDepth;
use crate::render::backend::{BackendKind, create_backend};
use crate::render::blend::BlendMode;

/// A frame described as JSON: a cleared buffer, optional masks, then items drawn in order.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub depth: ColorDepth,
    #[serde(default = "default_clear")]
    pub clear: Color,
    #[serde(default)]
    pub opts: CompositorOpts,
    /// Clip for every item; the whole buffer when absent.
    #[serde(default)]
    pub clip: Option<Area>,
    #[serde(default)]
    pub masks: Vec<SceneMask>,
    pub items: Vec<Item>,
}

fn default_clear() -> Color {
    Color::WHITE
}

/// Rounded-rectangle mask applied to every item.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct SceneMask {
    pub area: Area,
    #[serde(default)]
    pub radius: i32,
    /// Keep the outside instead of the inside.
    #[serde(default)]
    pub inverted: bool,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Rect(RectItem),
    Image(ImageItem),
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RectItem {
    pub area: Area,
    #[serde(default)]
    pub radius: i32,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub bg: BgDesc,
    #[serde(default)]
    pub bg_image: Option<BgImageRef>,
    #[serde(default)]
    pub border: BorderDesc,
    #[serde(default)]
    pub outline: OutlineDesc,
    #[serde(default)]
    pub shadow: ShadowDesc,
}

/// Background image loaded from a file relative to the scene.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BgImageRef {
    pub path: String,
    #[serde(default)]
    pub tiled: bool,
    #[serde(default = "default_opa")]
    pub opa: Opa,
    #[serde(default)]
    pub recolor: Color,
    #[serde(default)]
    pub recolor_opa: Opa,
}

fn default_opa() -> Opa {
    OPA_COVER
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ImageItem {
    pub path: String,
    /// Top-left of the untransformed image.
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub desc: ImageDesc,
}

impl Scene {
    pub fn from_json(json: &str) -> RectResult<Self> {
        let scene: Scene =
            serde_json::from_str(json).map_err(|e| RectError::scene(format!("parse: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn validate(&self) -> RectResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RectError::scene("width/height must be > 0"));
        }
        for (i, m) in self.masks.iter().enumerate() {
            if !m.area.is_valid() {
                return Err(RectError::scene(format!("mask {i} has an inverted area")));
            }
        }
        for (i, item) in self.items.iter().enumerate() {
            match item {
                Item::Rect(r) => {
                    if !r.area.is_valid() {
                        return Err(RectError::scene(format!("item {i}: inverted area")));
                    }
                    if let Some(img) = &r.bg_image
                        && img.path.trim().is_empty()
                    {
                        return Err(RectError::scene(format!("item {i}: empty bg_image path")));
                    }
                }
                Item::Image(img) => {
                    if img.path.trim().is_empty() {
                        return Err(RectError::scene(format!("item {i}: empty image path")));
                    }
                }
            }
        }
        Ok(())
    }

    fn image_paths(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            Item::Rect(r) => r.bg_image.as_ref().map(|b| b.path.as_str()),
            Item::Image(i) => Some(i.path.as_str()),
        })
    }
}

/// Decode an image file into the destination depth.
pub fn load_image(path: &Path, depth: ColorDepth) -> RectResult<ImageData> {
    let img = image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    ImageData::from_rgba8(rgba.as_raw(), width, height, depth)
}

/// Render `scene` with a fresh compositor on `kind`, resolving image paths against `base_dir`.
#[tracing::instrument(
    level = "info",
    skip(scene, base_dir),
    fields(w = scene.width, h = scene.height)
)]
pub fn render_scene(scene: &Scene, base_dir: &Path, kind: BackendKind) -> RectResult<Framebuffer> {
    scene.validate()?;

    let mut images = BTreeMap::new();
    for path in scene.image_paths() {
        if !images.contains_key(path) {
            let data = load_image(&base_dir.join(path), scene.depth)?;
            images.insert(path.to_owned(), data);
        }
    }

    let masks: Vec<RadiusMask> = scene
        .masks
        .iter()
        .map(|m| {
            if m.inverted {
                RadiusMask::inverted(m.area, m.radius)
            } else {
                RadiusMask::new(m.area, m.radius)
            }
        })
        .collect();

    let mut fb = Framebuffer::new(scene.width, scene.height, scene.depth, scene.clear)?;
    let mut comp = Compositor::new(create_backend(kind), scene.opts.clone());
    let mut drawn = 0usize;
    {
        let mut ctx = DrawCtx::new(fb.view()?);
        if let Some(clip) = scene.clip {
            ctx = ctx.with_clip(clip);
        }
        for m in &masks {
            ctx = ctx.with_mask(m);
        }

        for (i, item) in scene.items.iter().enumerate() {
            let out = match item {
                Item::Rect(r) => {
                    let bg_img = match &r.bg_image {
                        Some(b) => {
                            let data = images.get(b.path.as_str()).ok_or_else(|| {
                                RectError::scene(format!("item {i}: image '{}' not loaded", b.path))
                            })?;
                            Some(BgImageDesc {
                                src: ImageSource::Image(data.as_buf()),
                                opa: b.opa,
                                recolor: b.recolor,
                                recolor_opa: b.recolor_opa,
                                tiled: b.tiled,
                            })
                        }
                        None => None,
                    };
                    let dsc = RectDesc {
                        radius: r.radius,
                        blend_mode: r.blend_mode,
                        bg: r.bg.clone(),
                        bg_img,
                        border: r.border,
                        outline: r.outline,
                        shadow: r.shadow,
                    };
                    comp.draw_rect(&mut ctx, &dsc, &r.area)?
                }
                Item::Image(img) => {
                    let data = images.get(img.path.as_str()).ok_or_else(|| {
                        RectError::scene(format!("item {i}: image '{}' not loaded", img.path))
                    })?;
                    let buf = data.as_buf();
                    let (w, h) = (buf.width() as i32, buf.height() as i32);
                    let coords = Area::from_size(img.x, img.y, w, h);
                    comp.draw_image(&mut ctx, &img.desc, &coords, buf)?
                }
            };
            if out == Outcome::Drawn {
                drawn += 1;
            } else {
                tracing::debug!(item = i, ?out, "item not drawn");
            }
        }
    }

    let stats = comp.stats();
    tracing::info!(
        items = scene.items.len(),
        drawn,
        fallbacks = stats.fallbacks,
        "scene rendered"
    );
    Ok(fb)
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
