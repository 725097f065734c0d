//! IBus-specific configuration.
//!
//! This configuration includes:
//! - The `ibus` program used to list and switch engines
//! - The engine selected when an input method is deactivated
//! - Whether IBus' own XKB engines are offered as keyboards
//! - The program offered to the user for configuring input methods

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IbusConfig {
    pub program: String,

    /// Engine that passes keys through unchanged.
    pub neutral_engine: String,

    /// Offer `xkb:` engines too. They duplicate the system layouts served by
    /// the primary adaptor, so they are skipped by default.
    pub include_xkb_engines: bool,

    pub setup_program: Option<String>,
}

impl Default for IbusConfig {
    fn default() -> Self {
        Self {
            program: "ibus".to_string(),
            neutral_engine: "xkb:us::eng".to_string(),
            include_xkb_engines: false,
            setup_program: Some("ibus-setup".to_string()),
        }
    }
}

impl IbusConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> libkeyboarding_core::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
