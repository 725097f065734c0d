//! XKB-specific configuration.
//!
//! This configuration includes:
//! - The `setxkbmap` program used to query and switch layouts
//! - The rules list the available layouts are read from
//! - Locale overrides for layouts the built-in table gets wrong or lacks
//! - The program offered to the user for configuring layouts
//!
//! # Example
//!
//! ```rust
//! use libxkb::XkbConfig;
//!
//! let config = XkbConfig::from_toml_str(r#"
//!     [locale_overrides]
//!     "us(chr)" = "chr-US"
//! "#).unwrap();
//! assert_eq!(config.program, "setxkbmap");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct XkbConfig {
    pub program: String,

    /// XKB rules list (`evdev.lst` or `base.lst`).
    pub rules_path: PathBuf,

    /// Layout name (`de` or `de(nodeadkeys)`) to locale. A full name takes
    /// precedence over its base layout code.
    pub locale_overrides: BTreeMap<String, String>,

    /// Program to configure layouts; `None` offers nothing.
    pub setup_program: Option<String>,
    pub setup_arguments: Vec<String>,
}

impl Default for XkbConfig {
    fn default() -> Self {
        Self {
            program: "setxkbmap".to_string(),
            rules_path: PathBuf::from("/usr/share/X11/xkb/rules/evdev.lst"),
            locale_overrides: BTreeMap::new(),
            setup_program: Some("gnome-control-center".to_string()),
            setup_arguments: vec!["region".to_string()],
        }
    }
}

impl XkbConfig {
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
