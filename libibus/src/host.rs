//! Access to the IBus daemon through its command line client.

use crate::config::IbusConfig;
use libkeyboarding_core::{run_program, AdaptorError};

pub trait IbusHost: Send {
    /// Whether the `ibus` client works, i.e. a daemon is reachable.
    fn is_present(&self) -> bool;

    /// Raw `ibus list-engine` output.
    fn list_engines(&self) -> Result<String, AdaptorError>;

    /// Name of the engine in use.
    fn current_engine(&self) -> Result<String, AdaptorError>;

    fn set_engine(&mut self, name: &str) -> Result<(), AdaptorError>;
}

#[derive(Debug, Clone)]
pub struct SystemHost {
    program: String,
}

impl SystemHost {
    pub fn new(config: &IbusConfig) -> Self {
        Self {
            program: config.program.clone(),
        }
    }
}

impl IbusHost for SystemHost {
    fn is_present(&self) -> bool {
        run_program(&self.program, &["version"]).is_ok()
    }

    fn list_engines(&self) -> Result<String, AdaptorError> {
        run_program(&self.program, &["list-engine"])
    }

    fn current_engine(&self) -> Result<String, AdaptorError> {
        let name = run_program(&self.program, &["engine"])?.trim().to_string();
        if name.is_empty() {
            return Err(AdaptorError::Parse("ibus reported no engine".to_string()));
        }
        Ok(name)
    }

    fn set_engine(&mut self, name: &str) -> Result<(), AdaptorError> {
        run_program(&self.program, &["engine", name]).map(|_| ())
    }
}
