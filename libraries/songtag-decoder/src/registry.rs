//! Decoder plugin registry
//!
//! The registry is a fixed, ordered list of plugins. Selection never scores
//! plugins: the first registered plugin that supports a resource is tried
//! first, and callers continue with the next one when it misses.

use crate::lofty_plugin::LoftyPlugin;
use crate::symphonia_plugin::{SymphoniaConfig, SymphoniaPlugin};
use songtag_core::{DecoderPlugin, Result, TagError};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a registered plugin
pub type PluginRef = Arc<dyn DecoderPlugin>;

/// Ordered set of decoder plugins
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    plugins: Vec<PluginRef>,
}

impl DecoderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in plugins: lofty first, then symphonia
    pub fn with_defaults(symphonia: SymphoniaConfig) -> Self {
        Self::new()
            .with_plugin(Arc::new(LoftyPlugin::new()))
            .with_plugin(Arc::new(SymphoniaPlugin::new(symphonia)))
    }

    /// Append a plugin; it will be tried after every plugin registered before it
    pub fn register(&mut self, plugin: PluginRef) {
        self.plugins.push(plugin);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_plugin(mut self, plugin: PluginRef) -> Self {
        self.register(plugin);
        self
    }

    /// All plugins in registry order
    pub fn plugins(&self) -> &[PluginRef] {
        &self.plugins
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// First plugin supporting the suffix
    pub fn first_plugin(&self, suffix: &str) -> Option<&PluginRef> {
        self.plugins.iter().find(|p| p.supports_suffix(suffix))
    }

    /// Next plugin after `after` supporting the suffix
    ///
    /// Returns `None` when the candidates are exhausted or `after` is not
    /// part of this registry.
    pub fn next_plugin(&self, suffix: &str, after: &PluginRef) -> Option<&PluginRef> {
        let start = self.plugins.iter().position(|p| Arc::ptr_eq(p, after))? + 1;
        self.plugins[start..]
            .iter()
            .find(|p| p.supports_suffix(suffix))
    }

    /// True if any plugin supports the suffix
    pub fn supports_suffix(&self, suffix: &str) -> bool {
        self.first_plugin(suffix).is_some()
    }

    /// Lazily iterate the plugins supporting the suffix or the MIME type
    ///
    /// Every call rescans the registry from the start.
    ///
    /// # Errors
    /// Returns `TagError::Unsupported` if neither a suffix nor a MIME type is
    /// available.
    pub fn plugins_supporting<'a>(
        &'a self,
        suffix: Option<&'a str>,
        mime: Option<&'a str>,
    ) -> Result<impl Iterator<Item = &'a PluginRef> + 'a> {
        if suffix.is_none() && mime.is_none() {
            return Err(TagError::unsupported("resource has neither suffix nor MIME type"));
        }

        Ok(self.plugins.iter().filter(move |plugin| {
            mime.is_some_and(|m| plugin.supports_mime_type(m))
                || suffix.is_some_and(|s| plugin.supports_suffix(s))
        }))
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name()))
            .finish()
    }
}
