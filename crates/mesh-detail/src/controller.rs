//! Level-of-detail controller.
//!
//! [`DetailController`] owns one source mesh and derives every displayed mesh
//! from it. The source is captured once and never modified; each derived mesh
//! is an independent copy.
//!
//! # Subdivision levels
//!
//! Level 1 is the source (or the simplified source) with no passes applied.
//! Raising the level walks up one level at a time: a level already in the
//! cache is displayed as is, otherwise the mesh at the level below is copied,
//! refined by one pass and stored. Lowering the level walks down the same
//! way, displaying cached entries; reaching level 1 always displays the
//! source itself, never a cache entry. A level with no cache entry on the way
//! down leaves the display unchanged.
//!
//! Cache entries survive simplification and ratio changes. A level built
//! before a ratio change keeps showing the old geometry until `simplify` is
//! called again.
//!
//! # Simplification
//!
//! `simplify` rebuilds from the source every time: truncate at the stored
//! ratio, then apply `level - 1` passes. It does not read or write the cache.
//!
//! # Threading
//!
//! Commands run to completion on the calling thread. Level changes read and
//! then write the cache and the displayed slot, so concurrent callers must
//! serialize access to the whole controller, e.g. behind one `Mutex`.

use std::sync::Arc;

use tracing::warn;

use crate::events::{DetailEvent, EventCallback};
use crate::params::{
    DetailParams, MAX_LEVEL, MAX_RATIO, MIN_LEVEL, MIN_RATIO, clamp_level, clamp_ratio,
};
use crate::simplify::truncate_triangles;
use crate::subdivide::{MidpointSubdivider, Subdivider};
use crate::tracing_ext::{OperationTimer, log_mesh_stats};
use crate::{DetailError, DetailResult, GeometryModel, LevelCache};

/// Keeps a source mesh and serves simplified and subdivided versions of it.
///
/// # Example
/// ```
/// use mesh_detail::{DetailController, GeometryModel};
/// use nalgebra::Point3;
///
/// let source = GeometryModel::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![0, 1, 2],
/// )?;
///
/// let mut controller = DetailController::new();
/// controller.set_source_geometry(source)?;
///
/// controller.request_subdivision_level(3);
/// assert_eq!(controller.current_geometry().unwrap().triangle_count(), 16);
///
/// // Going back down is served from the cache
/// controller.request_subdivision_level(2);
/// assert_eq!(controller.current_geometry().unwrap().triangle_count(), 4);
/// # Ok::<(), mesh_detail::DetailError>(())
/// ```
pub struct DetailController<S: Subdivider = MidpointSubdivider> {
    subdivider: S,
    params: DetailParams,
    original: Option<Arc<GeometryModel>>,
    current: Option<Arc<GeometryModel>>,
    cache: LevelCache,
    simplified: bool,
    callback: Option<EventCallback>,
}

impl DetailController<MidpointSubdivider> {
    /// Create a controller with default params and midpoint subdivision.
    pub fn new() -> Self {
        Self::with_subdivider(MidpointSubdivider, DetailParams::default())
    }

    /// Create a controller with the given params and midpoint subdivision.
    pub fn with_params(params: DetailParams) -> Self {
        Self::with_subdivider(MidpointSubdivider, params)
    }
}

impl Default for DetailController<MidpointSubdivider> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Subdivider> DetailController<S> {
    /// Create a controller using a custom subdivision pass.
    ///
    /// Params are clamped into their supported ranges.
    pub fn with_subdivider(subdivider: S, params: DetailParams) -> Self {
        Self {
            subdivider,
            params: params.validated(),
            original: None,
            current: None,
            cache: LevelCache::new(),
            simplified: false,
            callback: None,
        }
    }

    /// Install an observer that receives every emitted event.
    pub fn set_event_callback(&mut self, callback: EventCallback) {
        self.callback = Some(callback);
    }

    /// Remove the event observer.
    pub fn clear_event_callback(&mut self) {
        self.callback = None;
    }

    // ---------------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------------

    /// The mesh to display. Shared and read-only.
    pub fn current_geometry(&self) -> Option<Arc<GeometryModel>> {
        self.current.clone()
    }

    /// The source mesh as captured.
    pub fn original_geometry(&self) -> Option<Arc<GeometryModel>> {
        self.original.clone()
    }

    /// Current subdivision level.
    #[inline]
    pub fn subdivision_level(&self) -> u32 {
        self.params.subdivision_level
    }

    /// Ratio used by the next [`simplify`](Self::simplify).
    #[inline]
    pub fn simplification_ratio(&self) -> f64 {
        self.params.simplification_ratio
    }

    /// Whether the displayed mesh derives from a simplified source.
    #[inline]
    pub fn is_simplified(&self) -> bool {
        self.simplified
    }

    /// Levels with cached geometry, ascending.
    pub fn cached_levels(&self) -> Vec<u32> {
        self.cache.levels()
    }

    #[inline]
    pub fn params(&self) -> &DetailParams {
        &self.params
    }

    /// The subdivision pass in use.
    #[inline]
    pub fn subdivider(&self) -> &S {
        &self.subdivider
    }

    // ---------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------

    /// Capture `mesh` as the source and display it.
    ///
    /// The mesh is validated and its derived attributes recomputed. Any
    /// previous source, cache and simplification are discarded. If the
    /// configured level is above 1 it is rebuilt on the new source right
    /// away, which emits an additional `LevelChanged` event.
    ///
    /// Returns an error, leaving all state untouched, if the mesh violates
    /// [`GeometryModel::validate`].
    pub fn set_source_geometry(&mut self, mut mesh: GeometryModel) -> DetailResult<DetailEvent> {
        mesh.validate()?;
        mesh.recompute_derived();
        log_mesh_stats(&mesh, "source");

        let event = DetailEvent::SourceSet {
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
        };

        let original = Arc::new(mesh);
        self.current = Some(Arc::clone(&original));
        self.original = Some(original);
        self.cache.clear();
        self.simplified = false;

        let configured = self.params.subdivision_level;
        self.params.subdivision_level = MIN_LEVEL;
        let event = self.emit(event);

        if configured > MIN_LEVEL {
            self.request_subdivision_level(configured);
        }

        Ok(event)
    }

    /// Drop the source, the cache and the displayed mesh.
    ///
    /// The stored ratio is kept; the level returns to 1.
    pub fn reset(&mut self) -> DetailEvent {
        self.original = None;
        self.current = None;
        self.cache.clear();
        self.simplified = false;
        self.params.subdivision_level = MIN_LEVEL;
        self.emit(DetailEvent::Reset)
    }

    /// Move to subdivision level `level`.
    ///
    /// Levels outside [`MIN_LEVEL`, `MAX_LEVEL`] are clamped, with a warning.
    /// Without a source this is a no-op reported as a warning.
    pub fn request_subdivision_level(&mut self, level: u32) -> DetailEvent {
        let target = clamp_level(level);
        if target != level {
            self.emit(DetailEvent::Warning(DetailError::LevelOutOfRange {
                requested: level,
                min: MIN_LEVEL,
                max: MAX_LEVEL,
            }));
        }

        if self.original.is_none() {
            return self.emit(DetailEvent::Warning(DetailError::missing_source(
                "subdivide",
            )));
        }

        let from = self.params.subdivision_level;
        if target == from {
            return self.emit(DetailEvent::LevelUnchanged { level: target });
        }

        let (levels_built, levels_reused) = if target > from {
            self.raise_level(from, target)
        } else {
            self.lower_level(from, target)
        };
        self.params.subdivision_level = target;

        let triangles = self.current.as_ref().map_or(0, |m| m.triangle_count());
        self.emit(DetailEvent::LevelChanged {
            from,
            to: target,
            triangles,
            levels_built,
            levels_reused,
        })
    }

    /// Store the ratio used by the next [`simplify`](Self::simplify).
    ///
    /// Ratios outside [`MIN_RATIO`, `MAX_RATIO`] are clamped with a warning;
    /// NaN is ignored with a warning. The displayed mesh and the cache are
    /// not touched.
    pub fn request_simplification_ratio(&mut self, ratio: f64) -> DetailEvent {
        let out_of_range = DetailError::RatioOutOfRange {
            requested: ratio,
            min: MIN_RATIO,
            max: MAX_RATIO,
        };

        let Some(clamped) = clamp_ratio(ratio) else {
            return self.emit(DetailEvent::Warning(out_of_range));
        };
        if clamped != ratio {
            self.emit(DetailEvent::Warning(out_of_range));
        }

        let from = self.params.simplification_ratio;
        self.params.simplification_ratio = clamped;
        self.emit(DetailEvent::RatioChanged { from, to: clamped })
    }

    /// Display a truncated copy of the source at the current level.
    ///
    /// The source is copied, truncated at the stored ratio, refined by
    /// `level - 1` passes and displayed. The cache is neither consulted nor
    /// updated.
    pub fn simplify(&mut self) -> DetailEvent {
        let Some(original) = self.original.clone() else {
            return self.emit(DetailEvent::Warning(DetailError::missing_source(
                "simplify",
            )));
        };

        let ratio = self.params.simplification_ratio;
        let level = self.params.subdivision_level;

        let mut mesh = {
            let _timer = OperationTimer::with_context(
                "simplify",
                original.triangle_count(),
                original.vertex_count(),
            );

            let mut mesh = GeometryModel::clone(&original);
            truncate_triangles(&mut mesh, ratio);
            for _ in MIN_LEVEL..level {
                self.subdivider.subdivide_pass(&mut mesh);
            }
            mesh
        };
        mesh.recompute_derived();
        log_mesh_stats(&mesh, "simplified");

        let triangles = mesh.triangle_count();
        self.current = Some(Arc::new(mesh));
        self.simplified = true;

        self.emit(DetailEvent::Simplified {
            ratio,
            level,
            triangles,
        })
    }

    /// Display the source again after [`simplify`](Self::simplify).
    ///
    /// Besides redisplaying the source and clearing the simplified flag, this
    /// also resets the stored level to 1 so that
    /// [`subdivision_level`](Self::subdivision_level) matches the displayed
    /// mesh. A later level request walks up from 1, reusing cached levels.
    ///
    /// Without a source, or when not simplified, this is a no-op reported as
    /// a warning.
    pub fn restore_original(&mut self) -> DetailEvent {
        let Some(original) = self.original.clone() else {
            return self.emit(DetailEvent::Warning(DetailError::missing_source(
                "restore",
            )));
        };
        if !self.simplified {
            return self.emit(DetailEvent::Warning(DetailError::InvalidRestoreRequest));
        }

        let triangles = original.triangle_count();
        self.current = Some(original);
        self.simplified = false;
        self.params.subdivision_level = MIN_LEVEL;

        self.emit(DetailEvent::Restored { triangles })
    }

    // ---------------------------------------------------------------------
    // Level transitions
    // ---------------------------------------------------------------------

    /// Walk up from `from` to `to`. Returns (levels built, levels reused).
    fn raise_level(&mut self, from: u32, to: u32) -> (usize, usize) {
        let mut built = 0;
        let mut reused = 0;

        for level in (from + 1)..=to {
            if let Some(cached) = self.cache.get(level).cloned() {
                self.current = Some(cached);
                reused += 1;
                continue;
            }

            let Some(prior) = self.current.as_ref() else {
                warn!(target: "mesh_detail::events", level, "No mesh to subdivide");
                break;
            };

            let _timer =
                OperationTimer::with_context("subdivide", prior.triangle_count(), prior.vertex_count());
            let mut next = GeometryModel::clone(prior);
            self.subdivider.subdivide_pass(&mut next);
            next.recompute_derived();
            log_mesh_stats(&next, "subdivided");

            self.current = Some(self.cache.insert(level, next));
            built += 1;
        }

        (built, reused)
    }

    /// Walk down from `from` to `to`. Returns (0, levels reused).
    fn lower_level(&mut self, from: u32, to: u32) -> (usize, usize) {
        let mut reused = 0;

        for level in (to..from).rev() {
            if level == MIN_LEVEL {
                self.current = self.original.clone();
                self.simplified = false;
            } else if let Some(cached) = self.cache.get(level).cloned() {
                self.current = Some(cached);
                reused += 1;
            } else {
                self.emit(DetailEvent::Warning(DetailError::CacheMissOnDecrease {
                    level,
                }));
            }
        }

        (0, reused)
    }

    /// Log `event`, pass it to the observer and hand it back.
    fn emit(&self, event: DetailEvent) -> DetailEvent {
        event.log();
        if let Some(callback) = &self.callback {
            callback(&event);
        }
        event
    }
}

impl<S: Subdivider + std::fmt::Debug> std::fmt::Debug for DetailController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailController")
            .field("subdivider", &self.subdivider)
            .field("params", &self.params)
            .field("has_source", &self.original.is_some())
            .field("cached_levels", &self.cache.levels())
            .field("simplified", &self.simplified)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}
