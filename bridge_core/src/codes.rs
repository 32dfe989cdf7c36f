//! # Design Codes
//!
//! Load factoring depends on the design code in force. The engine asks the
//! selected [`DesignCode`] for its factors rather than hard-coding them, so a
//! later code revision is a new implementation and a new [`DesignCodeId`].

use serde::{Deserialize, Serialize};

use crate::units::KnPerM2;

/// Load factoring rules of a bridge design code
pub trait DesignCode: Send + Sync {
    /// Citation shown with derived values (e.g., "IRC:6-2017")
    fn code_name(&self) -> &'static str;

    /// Ultimate limit state factor on permanent loads
    fn permanent_load_factor(&self) -> f64;

    /// Factored permanent load
    fn factored_load(&self, load: KnPerM2) -> KnPerM2 {
        load * self.permanent_load_factor()
    }
}

/// IRC:6-2017, Standard Specifications and Code of Practice for Road Bridges,
/// Section II (Loads and Load Combinations)
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Irc6_2017;

impl DesignCode for Irc6_2017 {
    fn code_name(&self) -> &'static str {
        "IRC:6-2017"
    }

    fn permanent_load_factor(&self) -> f64 {
        1.5
    }
}

/// Serializable selector for the design code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DesignCodeId {
    #[allow(non_camel_case_types)]
    #[default]
    #[serde(rename = "IRC:6-2017")]
    Irc6_2017,
}

impl DesignCodeId {
    pub fn code(&self) -> &'static dyn DesignCode {
        match self {
            DesignCodeId::Irc6_2017 => &Irc6_2017,
        }
    }
}

impl std::fmt::Display for DesignCodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code().code_name())
    }
}
