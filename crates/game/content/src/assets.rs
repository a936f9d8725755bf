//! Appearance asset resolution.
//!
//! [`FileAssetLoader`] implements the two resolution modes: a texture with a
//! file extension is read from disk relative to its source's base directory,
//! anything else is handed to the host's [`ContentPipeline`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bestiary_core::{Appearance, AppearanceAsset, AssetError, AssetLoader, AssetSource};
use tracing::trace;

/// Host content pipeline for engine-global textures.
pub trait ContentPipeline: Send + Sync {
    /// Resolves an engine content key such as `Characters/Monsters/Bat`.
    fn load(&self, key: &str, appearance: &Appearance) -> Result<TextureAsset, AssetError>;
}

/// Where a loaded texture came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureOrigin {
    File(PathBuf),
    Content(String),
}

/// Texture handle with the metadata the engine cares about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureAsset {
    pub origin: TextureOrigin,
    pub frame_width: u32,
    pub frame_height: u32,
    pub byte_len: usize,
}

impl AppearanceAsset for TextureAsset {
    fn describe(&self) -> String {
        match &self.origin {
            TextureOrigin::File(path) => format!("file {}", path.display()),
            TextureOrigin::Content(key) => format!("content {key}"),
        }
    }

    fn dispose(&self) {
        trace!(target: "bestiary::assets", texture = %self.describe(), "disposed texture");
    }
}

/// Pipeline that knows a fixed set of content keys.
#[derive(Clone, Debug, Default)]
pub struct StaticContentPipeline {
    keys: BTreeSet<String>,
}

impl StaticContentPipeline {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Pipeline that only knows the built-in placeholder.
    pub fn with_placeholder() -> Self {
        Self::new([Appearance::PLACEHOLDER_TEXTURE])
    }
}

impl ContentPipeline for StaticContentPipeline {
    fn load(&self, key: &str, appearance: &Appearance) -> Result<TextureAsset, AssetError> {
        if !self.keys.contains(key) {
            return Err(AssetError::UnknownContent {
                key: key.to_owned(),
            });
        }
        Ok(TextureAsset {
            origin: TextureOrigin::Content(key.to_owned()),
            frame_width: appearance.frame_width,
            frame_height: appearance.frame_height,
            byte_len: 0,
        })
    }
}

/// [`AssetLoader`] backed by the file system and a content pipeline.
#[derive(Clone, Debug, Default)]
pub struct FileAssetLoader<P> {
    pipeline: P,
}

impl<P: ContentPipeline> FileAssetLoader<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    fn load_file(
        &self,
        path: PathBuf,
        appearance: &Appearance,
    ) -> Result<TextureAsset, AssetError> {
        if !path.is_file() {
            return Err(AssetError::FileNotFound { path });
        }
        let bytes = std::fs::read(&path).map_err(|e| AssetError::Unreadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(TextureAsset {
            origin: TextureOrigin::File(path),
            frame_width: appearance.frame_width,
            frame_height: appearance.frame_height,
            byte_len: bytes.len(),
        })
    }
}

impl<P: ContentPipeline> AssetLoader for FileAssetLoader<P> {
    fn load(
        &self,
        base_dir: &Path,
        appearance: &Appearance,
    ) -> Result<Arc<dyn AppearanceAsset>, AssetError> {
        if appearance.texture.trim().is_empty() {
            return Err(AssetError::EmptyTexture);
        }
        if appearance.frame_width == 0 || appearance.frame_height == 0 {
            return Err(AssetError::InvalidFrameSize {
                width: appearance.frame_width,
                height: appearance.frame_height,
            });
        }
        let texture = match appearance.source() {
            AssetSource::SourceRelative(relative) => {
                self.load_file(base_dir.join(relative), appearance)?
            }
            AssetSource::EngineContent(key) => self.pipeline.load(key, appearance)?,
        };
        trace!(target: "bestiary::assets", texture = %texture.describe(), "loaded texture");
        Ok(Arc::new(texture))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn loader() -> FileAssetLoader<StaticContentPipeline> {
        FileAssetLoader::new(StaticContentPipeline::new(["Characters/Monsters/Bat"]))
    }

    #[test]
    fn source_relative_file_is_read_from_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/imp.png"), [0u8; 32]).unwrap();

        let asset = loader()
            .load(dir.path(), &Appearance::new("assets/imp.png", 16, 24))
            .unwrap();
        assert!(asset.describe().ends_with("imp.png"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader()
            .load(dir.path(), &Appearance::new("assets/ghost.png", 16, 24))
            .unwrap_err();
        assert!(matches!(err, AssetError::FileNotFound { .. }));
    }

    #[test]
    fn content_keys_go_through_the_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let ok = loader().load(dir.path(), &Appearance::new("Characters/Monsters/Bat", 16, 24));
        assert!(ok.is_ok());
        let err = loader()
            .load(dir.path(), &Appearance::new("Characters/Monsters/Nope", 16, 24))
            .unwrap_err();
        assert_eq!(
            err,
            AssetError::UnknownContent {
                key: "Characters/Monsters/Nope".into()
            }
        );
    }

    #[test]
    fn zero_frame_size_is_rejected() {
        let err = loader()
            .load(Path::new("."), &Appearance::new("Characters/Monsters/Bat", 0, 24))
            .unwrap_err();
        assert!(matches!(err, AssetError::InvalidFrameSize { .. }));
    }
}
