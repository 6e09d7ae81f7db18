//! Error types for adapter registration and adaptation

use std::path::PathBuf;
use thiserror::Error;

use crate::types::TypeKey;

/// Main error type for adaptmap operations
///
/// "No adapter found" is not an error: the facade reports it as `Ok(None)`.
/// Only malformed registration input, contract violations and failures raised
/// by adapters themselves surface here.
#[derive(Debug, Error)]
pub enum AdaptError {
    /// Absent adapter, malformed hierarchy declaration, or a registration the
    /// configured policy refuses
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A capability pair whose invoker cannot be built or does not match the
    /// adapter handle it was registered with
    #[error("Invalid adapter shape {from} -> {to}: {reason}")]
    InvalidAdapterShape {
        from: &'static str,
        to: &'static str,
        reason: String,
    },

    /// Failure raised by a fallible adapter while converting
    #[error("Adapter {adapter} failed")]
    Adapter {
        adapter: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration file errors
    #[error("Configuration error in {}: {message}", display_path(.path))]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AdaptError {
    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an invalid-shape error for a capability pair
    pub fn invalid_shape(from: TypeKey, to: TypeKey, reason: impl Into<String>) -> Self {
        Self::InvalidAdapterShape {
            from: from.name(),
            to: to.name(),
            reason: reason.into(),
        }
    }

    /// Wrap a failure raised by an adapter
    pub fn adapter(adapter: &'static str, source: anyhow::Error) -> Self {
        Self::Adapter { adapter, source }
    }

    /// Create a configuration error, optionally tied to the file it came from
    pub fn config(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path,
        }
    }

    /// Whether the error signals a programming error in registration code
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::InvalidAdapterShape { .. }
        )
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map_or_else(|| "<inline>".to_string(), |p| p.display().to_string())
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, AdaptError>;
