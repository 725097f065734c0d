//! kbdctl configuration file.
//!
//! One TOML file configures the controller and both adaptors:
//!
//! ```toml
//! [controller]
//! notify_unresolved = false
//!
//! [xkb]
//! rules_path = "/usr/share/X11/xkb/rules/base.lst"
//!
//! [ibus]
//! include_xkb_engines = true
//! ```

use anyhow::{Context, Result};
use libibus::IbusConfig;
use libkeyboarding_core::Config;
use libxkb::XkbConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KbdctlConfig {
    pub controller: Config,
    pub xkb: XkbConfig,
    pub ibus: IbusConfig,
}

impl KbdctlConfig {
    /// Read `path`, or use defaults when no file was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_optional() {
        let config = KbdctlConfig::from_toml_str("[ibus]\ninclude_xkb_engines = true\n").unwrap();
        assert!(config.ibus.include_xkb_engines);
        assert_eq!(config.ibus.program, "ibus");
        assert_eq!(config.xkb, XkbConfig::default());
        assert_eq!(config.controller, Config::default());
    }

    #[test]
    fn test_no_file_means_defaults() {
        assert_eq!(KbdctlConfig::load(None).unwrap(), KbdctlConfig::default());
    }
}
