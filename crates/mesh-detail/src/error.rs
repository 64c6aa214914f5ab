//! Error types for level-of-detail operations.
//!
//! Two kinds of failure exist in this crate:
//!
//! - **Advisory** conditions raised by the controller (no source mesh, nothing
//!   to restore, a level that was never cached). These never abort a command;
//!   they are reported through [`DetailEvent::Warning`](crate::DetailEvent) and
//!   the displayed mesh is left as it was.
//! - **Input** errors raised while validating source geometry or parameters.
//!   These are returned as `Err` from the functions that validate.
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `DETAIL-XXXX`:
//! - `DETAIL-1xxx`: Controller state errors (advisory)
//! - `DETAIL-2xxx`: Parameter errors
//! - `DETAIL-3xxx`: Geometry errors

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for level-of-detail operations.
pub type DetailResult<T> = Result<T, DetailError>;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // State errors (1xxx)
    /// DETAIL-1001: No source geometry has been set
    MissingSource = 1001,
    /// DETAIL-1002: Restore requested while the mesh is not simplified
    InvalidRestoreRequest = 1002,
    /// DETAIL-1003: Decreasing to a level that was never built
    CacheMissOnDecrease = 1003,

    // Parameter errors (2xxx)
    /// DETAIL-2001: Subdivision level outside the supported range
    LevelOutOfRange = 2001,
    /// DETAIL-2002: Simplification ratio outside the supported range
    RatioOutOfRange = 2002,

    // Geometry errors (3xxx)
    /// DETAIL-3001: Triangle index list length not divisible by three
    InvalidIndexCount = 3001,
    /// DETAIL-3002: Triangle references a vertex that does not exist
    InvalidVertexIndex = 3002,
    /// DETAIL-3003: Vertex has a NaN or infinite coordinate
    InvalidCoordinate = 3003,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `DETAIL-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingSource => "DETAIL-1001",
            ErrorCode::InvalidRestoreRequest => "DETAIL-1002",
            ErrorCode::CacheMissOnDecrease => "DETAIL-1003",
            ErrorCode::LevelOutOfRange => "DETAIL-2001",
            ErrorCode::RatioOutOfRange => "DETAIL-2002",
            ErrorCode::InvalidIndexCount => "DETAIL-3001",
            ErrorCode::InvalidVertexIndex => "DETAIL-3002",
            ErrorCode::InvalidCoordinate => "DETAIL-3003",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during level-of-detail operations.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum DetailError {
    /// No source geometry is available.
    #[error("no source geometry available for {operation}")]
    #[diagnostic(
        code(mesh_detail::state::missing_source),
        help("Call `set_source_geometry` before requesting detail changes.")
    )]
    MissingSource { operation: &'static str },

    /// Restore requested while the current mesh is not simplified.
    #[error("nothing to restore: current mesh is not simplified")]
    #[diagnostic(
        code(mesh_detail::state::invalid_restore),
        help("Restore is only available after `simplify`.")
    )]
    InvalidRestoreRequest,

    /// A level decrease reached a level with no cached geometry.
    #[error("no cached geometry for subdivision level {level}")]
    #[diagnostic(
        code(mesh_detail::state::cache_miss),
        help("The displayed mesh was left unchanged. Request level 1 to return to the original.")
    )]
    CacheMissOnDecrease { level: u32 },

    /// Requested subdivision level is outside the supported range.
    #[error("subdivision level {requested} is outside [{min}, {max}]")]
    #[diagnostic(
        code(mesh_detail::params::level),
        help("The level was clamped to the nearest supported value.")
    )]
    LevelOutOfRange { requested: u32, min: u32, max: u32 },

    /// Requested simplification ratio is outside the supported range.
    #[error("simplification ratio {requested} is outside [{min}, {max}]")]
    #[diagnostic(
        code(mesh_detail::params::ratio),
        help("Finite ratios are clamped to the nearest supported value; NaN is ignored.")
    )]
    RatioOutOfRange { requested: f64, min: f64, max: f64 },

    /// Flat triangle index list is not a whole number of triangles.
    #[error("triangle index count {count} is not divisible by 3")]
    #[diagnostic(
        code(mesh_detail::geometry::index_count),
        help("Each triangle needs exactly three indices.")
    )]
    InvalidIndexCount { count: usize },

    /// Triangle index references a vertex that does not exist.
    #[error(
        "invalid vertex index: index {position} references vertex {vertex_index}, but mesh only has {vertex_count} vertices"
    )]
    #[diagnostic(
        code(mesh_detail::geometry::vertex_index),
        help("Check the index buffer of the source geometry.")
    )]
    InvalidVertexIndex {
        position: usize,
        vertex_index: u32,
        vertex_count: usize,
    },

    /// Vertex coordinate is NaN or infinite.
    #[error("invalid coordinate at vertex {vertex_index}: {value}")]
    #[diagnostic(
        code(mesh_detail::geometry::coordinate),
        help("Source positions must be finite.")
    )]
    InvalidCoordinate { vertex_index: usize, value: f64 },
}

impl DetailError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            DetailError::MissingSource { .. } => ErrorCode::MissingSource,
            DetailError::InvalidRestoreRequest => ErrorCode::InvalidRestoreRequest,
            DetailError::CacheMissOnDecrease { .. } => ErrorCode::CacheMissOnDecrease,
            DetailError::LevelOutOfRange { .. } => ErrorCode::LevelOutOfRange,
            DetailError::RatioOutOfRange { .. } => ErrorCode::RatioOutOfRange,
            DetailError::InvalidIndexCount { .. } => ErrorCode::InvalidIndexCount,
            DetailError::InvalidVertexIndex { .. } => ErrorCode::InvalidVertexIndex,
            DetailError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
        }
    }

    /// Whether this error is reported as a warning rather than returned.
    ///
    /// Advisory errors leave the displayed mesh unchanged.
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            DetailError::MissingSource { .. }
                | DetailError::InvalidRestoreRequest
                | DetailError::CacheMissOnDecrease { .. }
                | DetailError::LevelOutOfRange { .. }
                | DetailError::RatioOutOfRange { .. }
        )
    }

    // Constructor helpers

    /// Create a missing-source error for the named operation.
    pub fn missing_source(operation: &'static str) -> Self {
        DetailError::MissingSource { operation }
    }

    /// Create an invalid vertex index error.
    pub fn invalid_vertex_index(position: usize, vertex_index: u32, vertex_count: usize) -> Self {
        DetailError::InvalidVertexIndex {
            position,
            vertex_index,
            vertex_count,
        }
    }
}
