//! Engine configuration
//!
//! Configuration is optional: every field has a default, and an engine built
//! with `EngineConfig::default()` behaves as documented on each field.
//! Files are TOML, conventionally named `.adaptmap.toml`.

mod loader;

pub use loader::{directory_ancestors, discover, load_from_path, CONFIG_FILE_NAME};

use serde::{Deserialize, Serialize};

use crate::errors::{AdaptError, Result};

/// What to do when an adapter declares no capability pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InertAdapterPolicy {
    /// Register silently
    Ignore,
    /// Register and log a warning
    #[default]
    Warn,
    /// Refuse with `AdaptError::InvalidArgument`
    Reject,
}

/// Runtime knobs for an `AdapterEngine`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Handling of zero-capability registrations
    pub inert_adapters: InertAdapterPolicy,
    /// Memoize candidate lists per (source, target) pair
    ///
    /// Turning this off recomputes the ranking on every call; the hierarchy
    /// and invoker caches still apply.
    pub cache_candidates: bool,
    /// Enable the process-wide timing collector when the engine is built
    pub profiling: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inert_adapters: InertAdapterPolicy::default(),
            cache_candidates: true,
            profiling: false,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML source
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str::<Self>(contents)
            .map_err(|e| AdaptError::config(format!("Failed to parse config: {}", e), None))
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AdaptError::config(format!("Failed to render config: {}", e), None))
    }

    pub fn with_inert_adapters(mut self, policy: InertAdapterPolicy) -> Self {
        self.inert_adapters = policy;
        self
    }

    pub fn with_candidate_cache(mut self, enabled: bool) -> Self {
        self.cache_candidates = enabled;
        self
    }

    pub fn with_profiling(mut self, enabled: bool) -> Self {
        self.profiling = enabled;
        self
    }
}
