//! Data-driven creature content and its loaders.
//!
//! This crate turns files into `bestiary-core` types:
//! - Definition documents keyed by local id (JSON, RON, or TOML by extension)
//! - Engine configuration (TOML)
//! - Appearance assets, either source-relative files or engine content keys
//!
//! Content is consumed by the runtime registry and never appears in creature state.

pub mod assets;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use assets::{
    ContentPipeline, FileAssetLoader, StaticContentPipeline, TextureAsset, TextureOrigin,
};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, DefinitionLoader, DefinitionSource, DocumentFormat, LoadResult,
    parse_source_list,
};
