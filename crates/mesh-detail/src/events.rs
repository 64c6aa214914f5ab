//! Notifications emitted by the controller.
//!
//! Every controller command returns exactly one [`DetailEvent`]. A command
//! may emit additional events alongside it: a clamp warning or a cache-miss
//! warning ahead of `LevelChanged`, or the `LevelChanged` that follows
//! `SourceSet` when a level above 1 is configured. Every emitted event is
//! logged through `tracing` and passed to the optional [`EventCallback`].
//!
//! ```ignore
//! use mesh_detail::{DetailController, EventCallback};
//!
//! let callback: EventCallback = Box::new(|event| println!("{event}"));
//! let mut controller = DetailController::new();
//! controller.set_event_callback(callback);
//! ```

use tracing::{debug, info, warn};

use crate::DetailError;

/// Observer for controller notifications.
pub type EventCallback = Box<dyn Fn(&DetailEvent) + Send + Sync>;

/// What a controller command did.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailEvent {
    /// A new source mesh was captured and displayed.
    SourceSet { vertices: usize, triangles: usize },

    /// All state was cleared.
    Reset,

    /// The subdivision level changed.
    LevelChanged {
        from: u32,
        to: u32,
        /// Triangles in the displayed mesh afterwards.
        triangles: usize,
        /// Levels computed by this change.
        levels_built: usize,
        /// Levels served from the cache by this change.
        levels_reused: usize,
    },

    /// The requested level equals the current level.
    LevelUnchanged { level: u32 },

    /// The stored simplification ratio changed.
    RatioChanged { from: f64, to: f64 },

    /// A simplified mesh was built and displayed.
    Simplified {
        ratio: f64,
        level: u32,
        triangles: usize,
    },

    /// The original mesh is displayed again.
    Restored { triangles: usize },

    /// A command could not be carried out, or was adjusted.
    Warning(DetailError),
}

impl DetailEvent {
    #[inline]
    pub fn is_warning(&self) -> bool {
        matches!(self, DetailEvent::Warning(_))
    }

    /// The warning carried by this event, if any.
    pub fn warning(&self) -> Option<&DetailError> {
        match self {
            DetailEvent::Warning(err) => Some(err),
            _ => None,
        }
    }

    /// Emit this event through `tracing`.
    pub(crate) fn log(&self) {
        match self {
            DetailEvent::Warning(err) => {
                warn!(target: "mesh_detail::events", code = %err.code(), "{}", self)
            }
            DetailEvent::LevelUnchanged { .. } | DetailEvent::RatioChanged { .. } => {
                debug!(target: "mesh_detail::events", "{}", self)
            }
            _ => info!(target: "mesh_detail::events", "{}", self),
        }
    }
}

impl std::fmt::Display for DetailEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailEvent::SourceSet {
                vertices,
                triangles,
            } => write!(
                f,
                "Source mesh set: {} vertices, {} triangles",
                vertices, triangles
            ),
            DetailEvent::Reset => write!(f, "Detail state reset"),
            DetailEvent::LevelChanged {
                from,
                to,
                triangles,
                levels_built,
                levels_reused,
            } => write!(
                f,
                "Subdivision level {} → {}: {} triangles ({} built, {} cached)",
                from, to, triangles, levels_built, levels_reused
            ),
            DetailEvent::LevelUnchanged { level } => {
                write!(f, "Subdivision level already {}", level)
            }
            DetailEvent::RatioChanged { from, to } => {
                write!(f, "Simplification ratio {:.2} → {:.2}", from, to)
            }
            DetailEvent::Simplified {
                ratio,
                level,
                triangles,
            } => write!(
                f,
                "Simplified at ratio {:.2}, level {}: {} triangles",
                ratio, level, triangles
            ),
            DetailEvent::Restored { triangles } => {
                write!(f, "Original mesh restored: {} triangles", triangles)
            }
            DetailEvent::Warning(err) => write!(f, "Warning [{}]: {}", err.code(), err),
        }
    }
}
