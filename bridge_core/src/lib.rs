//! # bridge_core - Plate Girder Bridge Input Engine
//!
//! `bridge_core` validates the basic and additional inputs of a highway
//! steel plate-girder bridge and derives the quantities the later design
//! stages need: cross-section layout, girder arrangement, section
//! properties, material strengths and permanent loads. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Schema-Driven**: Every field and cross-field rule lives in one checked [`schema::Schema`]
//! - **Errors as Data**: User mistakes come back in a [`validator::ValidationResult`],
//!   never as `Err`
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Typed Units**: Lengths, stresses and loads are newtypes, not bare floats
//!
//! ## Quick Start
//!
//! ```rust
//! use bridge_core::input::InputMap;
//! use bridge_core::session::Engine;
//! use bridge_core::settings::EngineSettings;
//!
//! let engine = Engine::bridge(EngineSettings::default()).unwrap();
//! let snapshot = engine.submit(InputMap::new().with("span", 60.0)).unwrap();
//!
//! assert!(!snapshot.validation.ok);
//! assert_eq!(snapshot.validation.field_errors["span"].kind.as_str(), "out of range");
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - Field specs, cross-field rules and the bridge form
//! - [`validator`] - Per-field coercion and rule evaluation
//! - [`derivation`] - Derived quantities with provenance
//! - [`session`] - The engine and its current snapshot
//! - [`catalog`] - Material grades, rolled sections and code limits
//! - [`geometry`] - Cross-section layout, girder count and load placement
//! - [`sections`] - Plate girder section properties
//! - [`codes`] - Design code load factors
//! - [`settings`] - Engine settings
//! - [`project`] - Design file container
//! - [`file_io`] - Design file operations with atomic saves and locking
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod catalog;
pub mod codes;
pub mod derivation;
pub mod errors;
pub mod file_io;
pub mod geometry;
pub mod input;
pub mod project;
pub mod schema;
pub mod sections;
pub mod session;
pub mod settings;
pub mod units;
pub mod validator;

// Re-export commonly used types at crate root for convenience
pub use catalog::Catalog;
pub use derivation::{derive, Derivation, DerivedResult, DerivedValue, GirderBridgeDerivation};
pub use errors::{EngineError, EngineResult};
pub use file_io::{load_design, save_design, FileLock};
pub use input::{FieldValue, InputMap, RawValue, ValidatedInputs};
pub use project::DesignFile;
pub use schema::{bridge_schema, CrossFieldRule, FieldKind, FieldSpec, RuleContext, Schema};
pub use session::{Engine, Snapshot};
pub use settings::EngineSettings;
pub use validator::{validate, FieldError, FieldErrorKind, GlobalError, ValidationResult};
