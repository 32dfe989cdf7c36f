//! # Design Files
//!
//! The `DesignFile` struct is the saved form of one bridge design: the raw
//! inputs as entered, the settings they were evaluated under, and the last
//! validation and derivation. Design files serialize to `.bdf` files as
//! human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! DesignFile
//! ├── meta: DesignMetadata (version, id, engineer, timestamps)
//! ├── settings: EngineSettings (design code, densities)
//! ├── inputs: InputMap (raw form values)
//! ├── validation: Option<ValidationResult>
//! └── derived: Option<DerivedResult>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::input::InputMap;
//! use bridge_core::project::DesignFile;
//! use bridge_core::settings::EngineSettings;
//!
//! let inputs = InputMap::new().with("span", 30.0);
//! let design = DesignFile::new("Jane Engineer", EngineSettings::default(), inputs);
//! let json = serde_json::to_string_pretty(&design).unwrap();
//! assert!(json.contains("Jane Engineer"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::derivation::DerivedResult;
use crate::input::InputMap;
use crate::session::Snapshot;
use crate::settings::EngineSettings;
use crate::validator::ValidationResult;

/// Current schema version for .bdf files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root container serialized to `.bdf` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignFile {
    pub meta: DesignMetadata,

    /// Settings the results were derived under
    #[serde(default)]
    pub settings: EngineSettings,

    /// Raw form values, exactly as submitted
    pub inputs: InputMap,

    /// Absent until the inputs have been validated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived: Option<DerivedResult>,
}

impl DesignFile {
    /// Create a design holding unvalidated inputs.
    pub fn new(engineer: impl Into<String>, settings: EngineSettings, inputs: InputMap) -> Self {
        let now = Utc::now();
        DesignFile {
            meta: DesignMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                engineer: engineer.into(),
                created: now,
                modified: now,
            },
            settings,
            inputs,
            validation: None,
            derived: None,
        }
    }

    /// Create a design from a session snapshot, carrying its results along.
    pub fn from_snapshot(
        engineer: impl Into<String>,
        settings: EngineSettings,
        snapshot: &Snapshot,
    ) -> Self {
        let mut design = DesignFile::new(engineer, settings, snapshot.inputs.clone());
        design.record(snapshot);
        design
    }

    /// Replace inputs and results with those of a newer snapshot.
    pub fn record(&mut self, snapshot: &Snapshot) {
        self.inputs = snapshot.inputs.clone();
        self.validation = Some(snapshot.validation.clone());
        self.derived = snapshot.derived.clone();
        self.touch();
    }

    /// Whether the stored results passed validation
    pub fn is_valid(&self) -> bool {
        self.validation.as_ref().is_some_and(|v| v.ok)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for DesignFile {
    fn default() -> Self {
        DesignFile::new("", EngineSettings::default(), InputMap::new())
    }
}

/// Metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Stable identity across saves
    pub id: Uuid,

    /// Name of the responsible engineer
    pub engineer: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::bridge::sample_input;
    use crate::session::Engine;

    #[test]
    fn test_design_creation() {
        let design = DesignFile::new("John Doe", EngineSettings::default(), InputMap::new());
        assert_eq!(design.meta.engineer, "John Doe");
        assert_eq!(design.meta.version, SCHEMA_VERSION);
        assert_eq!(design.meta.created, design.meta.modified);
        assert!(design.validation.is_none());
        assert!(!design.is_valid());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(DesignFile::default().meta.id, DesignFile::default().meta.id);
    }

    #[test]
    fn test_design_serialization() {
        let design = DesignFile::new("Jane Engineer", EngineSettings::default(), sample_input());
        let json = serde_json::to_string_pretty(&design).unwrap();

        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("IRC:6-2017"));
        assert!(json.contains("ISMB 600"));
        assert!(!json.contains("\"derived\""));

        let roundtrip: DesignFile = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, design);
    }

    #[test]
    fn test_from_snapshot() {
        let engine = Engine::bridge(EngineSettings::default()).unwrap();
        let snapshot = engine.submit(sample_input()).unwrap();
        let design = DesignFile::from_snapshot("Engineer", EngineSettings::default(), &snapshot);

        assert!(design.is_valid());
        assert_eq!(design.inputs, sample_input());
        assert_eq!(design.derived, snapshot.derived);
    }

    #[test]
    fn test_record_replaces_results() {
        let engine = Engine::bridge(EngineSettings::default()).unwrap();
        let good = engine.submit(sample_input()).unwrap();
        let mut design = DesignFile::from_snapshot("Engineer", EngineSettings::default(), &good);

        let mut broken = sample_input();
        broken.remove("span");
        let bad = engine.submit(broken).unwrap();
        design.record(&bad);

        assert!(!design.is_valid());
        assert!(design.derived.is_none());
        assert!(design.meta.modified >= design.meta.created);
    }

    #[test]
    fn test_missing_settings_use_defaults() {
        let json = r#"{
            "meta": {
                "version": "0.1.0",
                "id": "6f2c1b9e-8a41-4a7d-9c55-1c0d4f2e9a10",
                "engineer": "",
                "created": "2025-01-01T00:00:00Z",
                "modified": "2025-01-01T00:00:00Z"
            },
            "inputs": {"span": 30}
        }"#;
        let design: DesignFile = serde_json::from_str(json).unwrap();
        assert_eq!(design.settings, EngineSettings::default());
        assert!(design.validation.is_none());
    }
}
