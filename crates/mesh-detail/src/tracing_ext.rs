//! Tracing extensions for level-of-detail operations.
//!
//! Targets used by this crate:
//!
//! - `mesh_detail::timing`: operation durations
//! - `mesh_detail::mesh_state`: model statistics
//! - `mesh_detail::events`: controller notifications
//! - `mesh_detail::subdivide`, `mesh_detail::simplify`: per-pass detail
//!
//! Install any `tracing` subscriber in the host application to see them, e.g.
//! `RUST_LOG=mesh_detail=debug` with `tracing_subscriber::EnvFilter`.

use std::time::Instant;
use tracing::span::EnteredSpan;
use tracing::{Span, debug, info};

use crate::GeometryModel;

/// A performance timer that logs duration on drop.
///
/// The timer's span is entered for the timer's lifetime, so events logged
/// while it is alive (per-pass subdivision logs, model stats) nest under it.
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: EnteredSpan,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("detail_operation", operation = name);
        debug!(target: "mesh_detail::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span: span.entered(),
        }
    }

    /// Create a timer with mesh size fields.
    pub fn with_context(name: &'static str, triangle_count: usize, vertex_count: usize) -> Self {
        let span = tracing::info_span!(
            "detail_operation",
            operation = name,
            triangles = triangle_count,
            vertices = vertex_count
        );
        debug!(
            target: "mesh_detail::timing",
            operation = name,
            triangles = triangle_count,
            vertices = vertex_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span: span.entered(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "mesh_detail::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log model statistics at debug level.
pub fn log_mesh_stats(mesh: &GeometryModel, context: &str) {
    let dims = mesh
        .bounds()
        .map(|b| b.size())
        .unwrap_or_else(nalgebra::Vector3::zeros);

    debug!(
        target: "mesh_detail::mesh_state",
        context = context,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        dimensions = format!("{:.2} x {:.2} x {:.2}", dims.x, dims.y, dims.z),
        "Mesh state"
    );
}
