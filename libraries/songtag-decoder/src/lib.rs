//! Songtag Decoder
//!
//! Decoder plugins and the ordered plugin registry used to select them.
//!
//! Two plugins are built in:
//! - [`LoftyPlugin`] reads tags from files and streams with lofty
//! - [`SymphoniaPlugin`] probes streams with Symphonia's format readers
//!
//! Plugins are tried in registration order; see [`DecoderRegistry`].

#![forbid(unsafe_code)]

pub mod dictionary;
pub mod lofty_plugin;
pub mod registry;
pub mod symphonia_plugin;

pub use dictionary::scan_dictionary;
pub use lofty_plugin::LoftyPlugin;
pub use registry::{DecoderRegistry, PluginRef};
pub use symphonia_plugin::{SymphoniaConfig, SymphoniaPlugin};
