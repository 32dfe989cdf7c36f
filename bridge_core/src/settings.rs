//! # Engine Settings
//!
//! Project-wide settings that change derived values without being part of
//! the form: which design code factors loads, how far the wearing coat is
//! held back from the deck edge, and the unit weights of deck concrete and
//! girder steel.
//!
//! Every field has a default, so a settings file only needs the values it
//! overrides:
//!
//! ```rust
//! use bridge_core::settings::EngineSettings;
//!
//! let settings: EngineSettings = serde_json::from_str(r#"{"concrete_density": 24.0}"#).unwrap();
//! assert_eq!(settings.concrete_density, 24.0);
//! assert_eq!(settings.steel_density, 78.5);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::limits::{
    DEFAULT_CONCRETE_DENSITY, DEFAULT_OVERLAY_EDGE_CLEARANCE, DEFAULT_STEEL_DENSITY,
};
use crate::codes::DesignCodeId;
use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Code used to factor loads
    pub design_code: DesignCodeId,

    /// Gap between deck edge and wearing coat on each side (m)
    pub overlay_edge_clearance_m: f64,

    /// Unit weight of deck and footpath concrete (kN/m³)
    pub concrete_density: f64,

    /// Unit weight of girder steel (kN/m³)
    pub steel_density: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            design_code: DesignCodeId::default(),
            overlay_edge_clearance_m: DEFAULT_OVERLAY_EDGE_CLEARANCE,
            concrete_density: DEFAULT_CONCRETE_DENSITY,
            steel_density: DEFAULT_STEEL_DENSITY,
        }
    }
}

impl EngineSettings {
    /// Read settings from a JSON file and check their values
    pub fn from_json_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EngineError::file_error("read", path.display().to_string(), e.to_string())
        })?;
        let settings: EngineSettings =
            serde_json::from_str(&contents).map_err(|e| EngineError::SerializationError {
                reason: format!("{}: {}", path.display(), e),
            })?;
        settings.check()?;
        tracing::debug!(path = %path.display(), code = %settings.design_code, "settings loaded");
        Ok(settings)
    }

    /// Densities must be finite and positive, the clearance finite and not negative.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidSetting` naming the first offending value.
    pub fn check(&self) -> EngineResult<()> {
        for (setting, value) in [
            ("concrete_density", self.concrete_density),
            ("steel_density", self.steel_density),
        ] {
            if !value.is_finite() || value <= 0.0 {
                let reason = "must be a positive unit weight";
                return Err(EngineError::invalid_setting(setting, value, reason));
            }
        }
        let clearance = self.overlay_edge_clearance_m;
        if !clearance.is_finite() || clearance < 0.0 {
            return Err(EngineError::invalid_setting(
                "overlay_edge_clearance_m",
                clearance,
                "must be zero or a positive distance",
            ));
        }
        Ok(())
    }
}
