//! Appearance asset seam.
//!
//! The engine never decodes textures. A host-supplied [`AssetLoader`] turns an
//! [`Appearance`] into an opaque handle that the registry caches per entry and
//! disposes when the entry is replaced or cleared.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::definition::Appearance;
use crate::error::{ErrorSeverity, GameError};

/// Loaded appearance resource owned by one registry entry.
pub trait AppearanceAsset: fmt::Debug + Send + Sync {
    /// Human-readable origin, for diagnostics.
    fn describe(&self) -> String;

    /// Releases host resources. Called exactly once by the owning entry.
    fn dispose(&self) {}
}

/// Resolves appearances for the definitions of one source.
pub trait AssetLoader: Send + Sync {
    /// Loads `appearance`, resolving source-relative paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] when the texture cannot be located or decoded.
    /// Callers substitute [`Appearance::placeholder`] and never retry.
    fn load(
        &self,
        base_dir: &Path,
        appearance: &Appearance,
    ) -> Result<Arc<dyn AppearanceAsset>, AssetError>;
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("texture file {path} not found")]
    FileNotFound { path: PathBuf },

    #[error("texture file {path} could not be read: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("engine content '{key}' is not known to the content pipeline")]
    UnknownContent { key: String },

    #[error("appearance has an empty texture reference")]
    EmptyTexture,

    #[error("invalid frame size {width}x{height}")]
    InvalidFrameSize { width: u32, height: u32 },
}

impl GameError for AssetError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::FileNotFound { .. } | Self::Unreadable { .. } | Self::UnknownContent { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::EmptyTexture | Self::InvalidFrameSize { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "ASSET_FILE_NOT_FOUND",
            Self::Unreadable { .. } => "ASSET_UNREADABLE",
            Self::UnknownContent { .. } => "ASSET_UNKNOWN_CONTENT",
            Self::EmptyTexture => "ASSET_EMPTY_TEXTURE",
            Self::InvalidFrameSize { .. } => "ASSET_INVALID_FRAME_SIZE",
        }
    }
}
