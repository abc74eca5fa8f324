use resvg::tiny_skia::Pixmap;

use crate::foundation::error::{BoltzError, BoltzResult};

/// Pool configuration for cached drawing surfaces.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SurfacePoolOpts {
    /// Maximum number of idle surfaces kept for reuse.
    pub(crate) max_retained: usize,
}

impl Default for SurfacePoolOpts {
    fn default() -> Self {
        // One frame in flight at a time; a second slot covers a canvas change mid-run.
        Self { max_retained: 2 }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct SurfacePoolStats {
    pub(crate) retained_surfaces: usize,
    pub(crate) outstanding_leases: usize,
    pub(crate) alloc_surfaces: u64,
    pub(crate) reused_surfaces: u64,
    pub(crate) dropped_on_release: u64,
}

/// Small allocator for raster pixmaps.
///
/// Surfaces are only reachable through a [`SurfaceLease`], which hands the pixmap back when it is
/// dropped. Every exit path out of a draw call, including `?` on a failed render, returns its
/// surface.
pub(crate) struct SurfacePool {
    opts: SurfacePoolOpts,
    stats: SurfacePoolStats,
    idle: Vec<Pixmap>,
}

impl SurfacePool {
    pub(crate) fn new(opts: SurfacePoolOpts) -> Self {
        Self {
            opts,
            stats: SurfacePoolStats::default(),
            idle: Vec::new(),
        }
    }

    pub(crate) fn stats(&self) -> SurfacePoolStats {
        self.stats.clone()
    }

    /// Borrow a `width x height` surface. Its contents are unspecified.
    pub(crate) fn lease(&mut self, width: u32, height: u32) -> BoltzResult<SurfaceLease<'_>> {
        let pixmap = match self
            .idle
            .iter()
            .position(|p| p.width() == width && p.height() == height)
        {
            Some(i) => {
                self.stats.reused_surfaces = self.stats.reused_surfaces.saturating_add(1);
                self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_sub(1);
                self.idle.swap_remove(i)
            }
            None => {
                let p = Pixmap::new(width, height).ok_or_else(|| {
                    BoltzError::render(format!("failed to allocate {width}x{height} surface"))
                })?;
                self.stats.alloc_surfaces = self.stats.alloc_surfaces.saturating_add(1);
                p
            }
        };

        self.stats.outstanding_leases += 1;
        Ok(SurfaceLease {
            pool: self,
            pixmap: Some(pixmap),
        })
    }

    fn release(&mut self, pixmap: Pixmap) {
        self.stats.outstanding_leases = self.stats.outstanding_leases.saturating_sub(1);
        if self.idle.len() >= self.opts.max_retained {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        self.idle.push(pixmap);
        self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_add(1);
    }
}

/// Exclusive access to one pooled surface; returned to the pool on drop.
pub(crate) struct SurfaceLease<'a> {
    pool: &'a mut SurfacePool,
    pixmap: Option<Pixmap>,
}

impl SurfaceLease<'_> {
    pub(crate) fn pixmap(&self) -> &Pixmap {
        self.pixmap.as_ref().expect("lease holds a surface until dropped")
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        self.pixmap.as_mut().expect("lease holds a surface until dropped")
    }
}

impl Drop for SurfaceLease<'_> {
    fn drop(&mut self) {
        if let Some(p) = self.pixmap.take() {
            self.pool.release(p);
        }
    }
}
