//! Failure taxonomy of the behavior engine.
//!
//! None of these errors reaches the host as a failure. Each one is logged where
//! it occurs and the engine continues with the documented fallback.

use std::path::PathBuf;

use bestiary_core::{AssetError, EntityId, ErrorSeverity, GameError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BestiaryError>;

#[derive(Debug, Error)]
pub enum BestiaryError {
    /// An entity referenced an id the registry does not know.
    /// Fallback: placeholder appearance and the default strategy.
    #[error("definition '{id}' is not registered")]
    DefinitionMissing { id: String },

    /// One definition source could not be read or parsed.
    /// Fallback: the source contributes nothing; other sources still load.
    #[error("source '{owner}' ({document}) failed to load: {reason}")]
    SourceRead {
        owner: String,
        document: PathBuf,
        reason: String,
    },

    /// An appearance asset failed to load. Cached for the entry's lifetime.
    /// Fallback: placeholder appearance.
    #[error("appearance of '{id}' failed to load")]
    AssetLoad {
        id: String,
        #[source]
        source: AssetError,
    },

    /// A creature's coordinates became non-finite.
    /// Fallback: snapped near the target with zero velocity.
    #[error("entity {entity} has non-finite position or velocity")]
    CorruptPosition { entity: EntityId },

    /// An id was registered twice. Fallback: the newer entry wins.
    #[error("definition '{id}' from '{owner}' replaces the one from '{previous_owner}'")]
    RegistrationConflict {
        id: String,
        owner: String,
        previous_owner: String,
    },
}

impl GameError for BestiaryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SourceRead { .. } | Self::AssetLoad { .. } => ErrorSeverity::Recoverable,
            Self::DefinitionMissing { .. } | Self::RegistrationConflict { .. } => {
                ErrorSeverity::Validation
            }
            Self::CorruptPosition { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DefinitionMissing { .. } => "BESTIARY_DEFINITION_MISSING",
            Self::SourceRead { .. } => "BESTIARY_SOURCE_READ_FAILURE",
            Self::AssetLoad { .. } => "BESTIARY_ASSET_LOAD_FAILURE",
            Self::CorruptPosition { .. } => "BESTIARY_CORRUPT_POSITION_STATE",
            Self::RegistrationConflict { .. } => "BESTIARY_REGISTRATION_CONFLICT",
        }
    }
}
