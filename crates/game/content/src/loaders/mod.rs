//! Content loaders for reading creature data from files.
//!
//! Every loader returns [`LoadResult`] with the offending path in the error
//! context, so the reload protocol can report one failing source and move on.

pub mod config;
pub mod definitions;

pub use config::ConfigLoader;
pub use definitions::{DefinitionLoader, DefinitionSource, parse_source_list};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Serialization format of a document, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Ron,
    Toml,
}

impl DocumentFormat {
    pub const EXTENSIONS: [&'static str; 3] = ["json", "ron", "toml"];

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "ron" => Some(Self::Ron),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Deserializes `content` in this format.
    pub fn parse<T>(self, content: &str) -> LoadResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let value = match self {
            Self::Json => serde_json::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse JSON: {}", e))?,
            Self::Ron => {
                ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse RON: {}", e))?
            }
            Self::Toml => toml::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?,
        };
        Ok(value)
    }
}
