//! Access to the X keyboard extension.
//!
//! The adaptor only talks to XKB through [`XkbHost`], so tests can substitute
//! a scripted host for the real `setxkbmap`.

use crate::config::XkbConfig;
use libkeyboarding_core::{run_program, AdaptorError};
use std::path::PathBuf;

pub trait XkbHost: Send {
    /// Whether an X display with XKB is reachable.
    fn is_present(&self) -> bool;

    /// Contents of the rules list.
    fn rules(&self) -> Result<String, AdaptorError>;

    /// Raw `setxkbmap -query` output.
    fn query(&self) -> Result<String, AdaptorError>;

    fn set_layout(&mut self, code: &str, variant: Option<&str>) -> Result<(), AdaptorError>;
}

/// The real host: runs `setxkbmap` and reads the rules list from disk.
#[derive(Debug, Clone)]
pub struct SystemHost {
    program: String,
    rules_path: PathBuf,
}

impl SystemHost {
    pub fn new(config: &XkbConfig) -> Self {
        Self {
            program: config.program.clone(),
            rules_path: config.rules_path.clone(),
        }
    }
}

impl XkbHost for SystemHost {
    fn is_present(&self) -> bool {
        std::env::var_os("DISPLAY").is_some()
            && self.rules_path.exists()
            && run_program(&self.program, &["-version"]).is_ok()
    }

    fn rules(&self) -> Result<String, AdaptorError> {
        Ok(std::fs::read_to_string(&self.rules_path)?)
    }

    fn query(&self) -> Result<String, AdaptorError> {
        run_program(&self.program, &["-query"])
    }

    fn set_layout(&mut self, code: &str, variant: Option<&str>) -> Result<(), AdaptorError> {
        // An empty variant clears the one left by the previous layout.
        let args = ["-layout", code, "-variant", variant.unwrap_or("")];
        run_program(&self.program, &args).map(|_| ())
    }
}
