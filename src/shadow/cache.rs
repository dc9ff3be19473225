use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::foundation::error::Skip;
use crate::foundation::settings::ShadowCacheOpts;
use crate::shadow::kernel::{CornerKernel, KernelKey, KernelParams, build_corner_kernel};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShadowCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Kernels built but too large to keep.
    pub uncacheable: u64,
}

/// Least-recently-used store of shadow corner kernels.
#[derive(Debug)]
pub struct ShadowCache {
    opts: ShadowCacheOpts,
    entries: HashMap<KernelKey, Arc<CornerKernel>>,
    lru: VecDeque<KernelKey>,
    stats: ShadowCacheStats,
}

impl ShadowCache {
    pub fn new(opts: ShadowCacheOpts) -> Self {
        Self {
            opts,
            entries: HashMap::new(),
            lru: VecDeque::new(),
            stats: ShadowCacheStats::default(),
        }
    }

    pub fn stats(&self) -> ShadowCacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    /// Cached kernel for `params`, building it on a miss.
    pub fn get_or_build(&mut self, params: &KernelParams) -> Result<Arc<CornerKernel>, Skip> {
        let key = params.key();
        if let Some(k) = self.entries.get(&key).cloned() {
            self.stats.hits = self.stats.hits.saturating_add(1);
            self.touch(key);
            return Ok(k);
        }

        self.stats.misses = self.stats.misses.saturating_add(1);
        let kernel = Arc::new(build_corner_kernel(params)?);
        if self.opts.max_entries == 0 || kernel.byte_len() > self.opts.max_kernel_bytes {
            self.stats.uncacheable = self.stats.uncacheable.saturating_add(1);
            tracing::trace!(
                size = kernel.size(),
                bytes = kernel.byte_len(),
                "shadow kernel not cached"
            );
            return Ok(kernel);
        }
        self.insert(key, kernel.clone());
        Ok(kernel)
    }

    fn insert(&mut self, key: KernelKey, kernel: Arc<CornerKernel>) {
        self.entries.insert(key, kernel);
        self.touch(key);
        while self.lru.len() > self.opts.max_entries {
            if let Some(old) = self.lru.pop_front() {
                self.entries.remove(&old);
                self.stats.evictions = self.stats.evictions.saturating_add(1);
            }
        }
    }

    fn touch(&mut self, key: KernelKey) {
        if let Some(pos) = self.lru.iter().position(|k| *k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shadow/cache.rs"]
mod tests;
