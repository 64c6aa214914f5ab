//! Level-of-detail control for triangle meshes.
//!
//! This crate keeps a source mesh untouched and derives displayable versions
//! of it at different levels of detail:
//!
//! - **Subdivision**: every triangle is split into four through shared edge
//!   midpoints, so adjacent triangles stay stitched together. Each level is
//!   built once and cached, making moves back down the level ladder instant.
//! - **Simplification**: a prefix of the triangle list is kept according to a
//!   ratio. This is plain truncation, not an error-driven decimator.
//!
//! # Quick Start
//!
//! ```
//! use mesh_detail::{DetailController, DetailEvent, GeometryModel};
//! use nalgebra::Point3;
//!
//! let source = GeometryModel::from_parts(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![0, 1, 2, 0, 2, 3],
//! )?;
//!
//! let mut controller = DetailController::new();
//! controller.set_source_geometry(source)?;
//!
//! // Two passes: 2 -> 8 -> 32 triangles
//! let event = controller.request_subdivision_level(3);
//! assert!(matches!(event, DetailEvent::LevelChanged { triangles: 32, .. }));
//!
//! // Keep half of the source triangles, then subdivide to the current level
//! controller.request_simplification_ratio(0.5);
//! controller.simplify();
//! assert_eq!(controller.current_geometry().unwrap().triangle_count(), 16);
//!
//! controller.restore_original();
//! assert_eq!(controller.current_geometry().unwrap().triangle_count(), 2);
//! # Ok::<(), mesh_detail::DetailError>(())
//! ```
//!
//! # Standalone Operations
//!
//! The engines behind the controller are usable on their own:
//!
//! ```
//! use mesh_detail::{GeometryModel, SimplifyParams, SubdivideParams, simplify_mesh, subdivide_mesh};
//! use nalgebra::Point3;
//!
//! let mesh = GeometryModel::from_parts(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![0, 1, 2],
//! )?;
//!
//! let fine = subdivide_mesh(&mesh, &SubdivideParams::with_iterations(2));
//! println!("{}", fine);
//!
//! let coarse = simplify_mesh(&fine.mesh, &SimplifyParams::with_ratio(0.25));
//! assert_eq!(coarse.final_triangles, 4);
//! # Ok::<(), mesh_detail::DetailError>(())
//! ```
//!
//! # Error Handling
//!
//! Controller commands never fail. Conditions such as a missing source or a
//! restore with nothing to restore leave the displayed mesh unchanged and are
//! reported as [`DetailEvent::Warning`]. Only source validation returns
//! `DetailResult<T>`, which is `Result<T, DetailError>`.
//!
//! # Logging
//!
//! All operations log through `tracing` under the `mesh_detail` target. See
//! [`tracing_ext`] for the target list.

mod cache;
mod controller;
mod error;
mod events;
mod midpoint;
mod params;
mod types;

pub mod simplify;
pub mod subdivide;
pub mod tracing_ext;

// Re-export core types at crate root
pub use error::{DetailError, DetailResult, ErrorCode};
pub use types::{Aabb, GeometryModel, Triangle};

pub use cache::LevelCache;
pub use controller::DetailController;
pub use events::{DetailEvent, EventCallback};
pub use midpoint::{MidpointIndex, edge_key};
pub use params::{
    DetailParams, MAX_LEVEL, MAX_RATIO, MIN_LEVEL, MIN_RATIO, clamp_level, clamp_ratio,
};
pub use simplify::{
    SimplifyParams, SimplifyResult, simplify_mesh, truncate_triangles, truncation_index_count,
};
pub use subdivide::{
    MidpointSubdivider, SubdivideParams, SubdivideResult, Subdivider, subdivide_mesh,
    subdivide_once,
};
