pub const ENV_SHADOW_ENHANCE: &str = "RECTSHADE_SHADOW_ENHANCE";
pub const ENV_SHADOW_CACHE_ENTRIES: &str = "RECTSHADE_SHADOW_CACHE_ENTRIES";
pub const ENV_SHADOW_CACHE_MAX_BYTES: &str = "RECTSHADE_SHADOW_CACHE_MAX_BYTES";

/// Compositor configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorOpts {
    /// Blur shadows in two half-width passes, which gives a softer falloff than one pass.
    pub shadow_enhance: bool,
    pub shadow_cache: ShadowCacheOpts,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            shadow_enhance: true,
            shadow_cache: ShadowCacheOpts::default(),
        }
    }
}

impl CompositorOpts {
    /// Defaults with `RECTSHADE_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; unparsable values keep the current setting.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(ENV_SHADOW_ENHANCE).and_then(|v| parse_flag(&v)) {
            self.shadow_enhance = v;
        }
        if let Some(n) = lookup(ENV_SHADOW_CACHE_ENTRIES)
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            self.shadow_cache.max_entries = n;
        }
        if let Some(n) = lookup(ENV_SHADOW_CACHE_MAX_BYTES)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.shadow_cache.max_kernel_bytes = n;
        }
        self
    }
}

/// Bounds of the shadow corner kernel cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShadowCacheOpts {
    /// Resident kernels; 0 disables caching.
    pub max_entries: usize,
    /// Kernels larger than this are built per draw and never cached.
    pub max_kernel_bytes: usize,
}

impl Default for ShadowCacheOpts {
    fn default() -> Self {
        Self {
            max_entries: 1,
            max_kernel_bytes: 64 * 64,
        }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/settings.rs"]
mod tests;
