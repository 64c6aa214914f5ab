//! Detail configuration.
//!
//! With the `config` feature enabled, [`DetailParams`] can be saved and loaded
//! as JSON:
//!
//! ```ignore
//! use mesh_detail::DetailParams;
//!
//! let params = DetailParams::from_json(r#"{ "subdivision_level": 3, "simplification_ratio": 0.25 }"#)?;
//! let json = params.to_json()?;
//! ```

/// Lowest subdivision level (no passes applied).
pub const MIN_LEVEL: u32 = 1;
/// Highest subdivision level.
pub const MAX_LEVEL: u32 = 4;
/// Lowest accepted simplification ratio. Inclusive: 0.1 itself is accepted
/// unchanged and anything below it is raised to it.
pub const MIN_RATIO: f64 = 0.1;
/// Highest simplification ratio (keep everything).
pub const MAX_RATIO: f64 = 1.0;

/// Detail settings driving the controller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DetailParams {
    /// Target subdivision level in [`MIN_LEVEL`, `MAX_LEVEL`].
    /// Level 1 means the unsubdivided mesh.
    /// Default: 1
    pub subdivision_level: u32,

    /// Fraction of triangles kept by `simplify`, in [`MIN_RATIO`, `MAX_RATIO`].
    /// Default: 0.5
    pub simplification_ratio: f64,
}

impl Default for DetailParams {
    fn default() -> Self {
        Self {
            subdivision_level: MIN_LEVEL,
            simplification_ratio: 0.5,
        }
    }
}

impl DetailParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subdivision level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.subdivision_level = level;
        self
    }

    /// Set the simplification ratio.
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.simplification_ratio = ratio;
        self
    }

    /// Copy with both settings clamped into their supported ranges.
    ///
    /// A NaN ratio falls back to the default.
    pub fn validated(&self) -> Self {
        Self {
            subdivision_level: clamp_level(self.subdivision_level),
            simplification_ratio: clamp_ratio(self.simplification_ratio)
                .unwrap_or(Self::default().simplification_ratio),
        }
    }

    /// Parse params from JSON. Missing fields take their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize params to pretty-printed JSON.
    #[cfg(feature = "config")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Clamp a level into [`MIN_LEVEL`, `MAX_LEVEL`].
#[inline]
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

/// Clamp a ratio into the closed range [`MIN_RATIO`, `MAX_RATIO`]. None for NaN.
#[inline]
pub fn clamp_ratio(ratio: f64) -> Option<f64> {
    if ratio.is_nan() {
        None
    } else {
        Some(ratio.clamp(MIN_RATIO, MAX_RATIO))
    }
}
