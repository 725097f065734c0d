//! libibus crate root
//!
//! Secondary-category retrieving adaptor for `libkeyboarding-core` over the
//! IBus input-method framework, driven through the `ibus` command line client.
//!
//! Public API exported here:
//! - `IbusAdaptor` from `adaptor`
//! - `IbusHost` and `SystemHost` from `host`
//! - `IbusConfig` from `config`
//! - `IbusEngine` and the engine-list parser from `engines`

pub mod adaptor;
pub mod config;
pub mod engines;
pub mod host;

pub use adaptor::{IbusAdaptor, IBUS};
pub use config::IbusConfig;
pub use engines::IbusEngine;
pub use host::{IbusHost, SystemHost};
