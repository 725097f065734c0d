//! libxkb crate root
//!
//! Primary-category retrieving adaptor for `libkeyboarding-core` over the X
//! keyboard extension. Layouts are read from the XKB rules list and switched
//! with `setxkbmap`.
//!
//! Public API exported here:
//! - `XkbAdaptor` from `adaptor`
//! - `XkbHost` and `SystemHost` from `host`
//! - `XkbConfig` from `config`
//! - rules-list and query parsers from `rules`

pub mod adaptor;
pub mod config;
pub mod host;
pub mod locales;
pub mod rules;

pub use adaptor::{XkbAdaptor, XKB};
pub use config::XkbConfig;
pub use host::{SystemHost, XkbHost};
pub use rules::{XkbLayout, XkbQuery};
