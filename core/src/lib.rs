//! libkeyboarding-core
//!
//! Keyboard registry, identifier resolution and the keyboard controller shared
//! by the subsystem-specific adaptor crates (libxkb, libibus).
//!
//! The controller unifies the keyboards offered by several input subsystems
//! into one addressable model, dispatches activation to the adaptor that owns
//! a keyboard, and keeps resolving the identifier formats older configuration
//! was written with.
//!
//! Public API:
//! - `KeyboardDefinition` - One selectable keyboard, keyed by `(layout, locale)`
//! - `KeyboardRegistry` - Indexed collection of definitions
//! - `RetrievingAdaptor` - Contract implemented per input subsystem
//! - `KeyboardController` - Owns the adaptors, the registry and the active keyboard
//! - `resolver` / `legacy` - Identifier and legacy writing-system resolution
//! - `Config` - Controller behaviour flags
use serde::{Deserialize, Serialize};

pub mod definition;
pub use definition::{AdaptorId, Category, InputLanguage, KeyboardDefinition};

pub mod registry;
pub use registry::KeyboardRegistry;

pub mod adaptor;
pub use adaptor::{run_program, RetrievingAdaptor, SetupApplication};

pub mod error;
pub use error::{AdaptorError, KeyboardError, Result};

pub mod resolver;

pub mod legacy;
pub use legacy::{WritingSystem, WritingSystemDefinition};

pub mod lcid;

pub mod focus;
pub use focus::{EventHandler, FocusEvent, FocusListener, FocusTarget};

pub mod report;
pub use report::{MemoryReporter, Reporter, TracingReporter};

pub mod controller;
pub use controller::{Activation, KeyboardController};

/// Controller configuration.
///
/// Adaptor-specific options (program paths, neutral engines, ...) live in
/// `XkbConfig` and `IbusConfig` in their respective crates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Tell the user (once per identifier) when a requested keyboard cannot
    /// be found or fails to activate.
    pub notify_unresolved: bool,

    /// Ask the primary adaptor for the host's current keyboard when no
    /// keyboard has been activated through the controller yet.
    pub query_host_active: bool,

    /// Consult obsolete writing-system fields (LCID, keyboard name) when a
    /// writing system has no keyboard of its own.
    pub legacy_lookup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notify_unresolved: true,
            query_host_active: true,
            legacy_lookup: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Utility helpers.
pub mod utils {
    /// NFC-normalize a string. Keys from different subsystems are compared in
    /// this form.
    pub fn nfc(s: &str) -> String {
        use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};
        match is_nfc_quick(s.chars()) {
            IsNormalized::Yes => s.to_string(),
            _ => s.nfc().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_and_partial_toml() {
        let config = Config::from_toml_str("notify_unresolved = false").unwrap();
        assert!(!config.notify_unresolved);
        assert!(config.query_host_active);
        assert!(config.legacy_lookup);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = Config {
            legacy_lookup: false,
            ..Config::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_nfc() {
        assert_eq!(utils::nfc("c\u{327}"), "\u{e7}");
        assert_eq!(utils::nfc("plain"), "plain");
    }
}
