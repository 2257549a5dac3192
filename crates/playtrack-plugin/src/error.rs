//! Registration failure taxonomy.

use thiserror::Error;

/// Why a plugin was not admitted into an engine.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The engine has already been destroyed.
    #[error("engine has been destroyed")]
    Destroyed,
    /// The factory returned an error or panicked.
    #[error("plugin construction failed: {reason}")]
    Construction {
        /// Factory label.
        factory: String,
        /// Failure description.
        reason: String,
    },
    /// The constructed value does not satisfy the plugin contract.
    #[error("plugin failed contract validation")]
    Validation {
        /// Factory label.
        factory: String,
    },
    /// The plugin's name or version could not be read after validation.
    #[error("plugin identity unavailable")]
    Identity {
        /// Plugin name, when it could be read.
        name: Option<String>,
    },
    /// The generated id is already registered.
    #[error("plugin id '{id}' is already registered")]
    IdCollision {
        /// The colliding id.
        id: String,
    },
}

impl RegistrationError {
    /// Best identifying detail available for diagnostics.
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::Destroyed => None,
            Self::Construction { factory, .. } | Self::Validation { factory } => {
                Some(factory.as_str())
            }
            Self::Identity { name } => name.as_deref(),
            Self::IdCollision { id } => Some(id.as_str()),
        }
    }
}
