//! Creature definition documents.
//!
//! A document maps short local ids to [`MonsterDefinition`] records. Each
//! document belongs to one source (an owner such as a content pack id) and the
//! registry key of a record is `"{owner}_{local}"`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bestiary_core::MonsterDefinition;

use crate::loaders::{DocumentFormat, LoadResult, read_file};

/// File stem looked up when a source points at a directory.
pub const DEFAULT_DOCUMENT_STEM: &str = "monsters";

/// Loader for definition documents.
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Load a definition document, picking the format from the extension.
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, MonsterDefinition>> {
        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported definition document {} (expected .json, .ron or .toml)",
                path.display()
            )
        })?;
        let content = read_file(path)?;
        format
            .parse(&content)
            .map_err(|e| e.context(format!("in {}", path.display())))
    }
}

/// One independent provider of definitions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefinitionSource {
    /// Owner identifier, prefixed to every local id.
    pub owner: String,
    /// Directory that source-relative appearance paths resolve against.
    pub base_dir: PathBuf,
    /// The definition document.
    pub document: PathBuf,
}

impl DefinitionSource {
    /// Source whose document is `path`.
    ///
    /// A directory resolves to the first `monsters.{json,ron,toml}` inside it;
    /// if none exists the JSON name is kept and the read fails at load time.
    pub fn new(owner: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let document = if path.is_dir() {
            DocumentFormat::EXTENSIONS
                .iter()
                .map(|ext| path.join(format!("{DEFAULT_DOCUMENT_STEM}.{ext}")))
                .find(|candidate| candidate.is_file())
                .unwrap_or_else(|| path.join(format!("{DEFAULT_DOCUMENT_STEM}.json")))
        } else {
            path
        };
        let base_dir = document
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            owner: owner.into(),
            base_dir,
            document,
        }
    }

    /// Registry key of a record in this source.
    pub fn unique_id(&self, local_id: &str) -> String {
        format!("{}_{}", self.owner, local_id)
    }

    /// Reads the document and returns `(unique id, definition)` pairs.
    pub fn load(&self) -> LoadResult<Vec<(String, MonsterDefinition)>> {
        let records = DefinitionLoader::load(&self.document)
            .map_err(|e| e.context(format!("source '{}'", self.owner)))?;
        Ok(records
            .into_iter()
            .map(|(local, definition)| (self.unique_id(&local), definition))
            .collect())
    }
}

/// Parses `owner=path;owner=path` into sources. Blank entries are skipped.
pub fn parse_source_list(list: &str) -> LoadResult<Vec<DefinitionSource>> {
    list.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (owner, path) = entry
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Source entry '{}' is not owner=path", entry))?;
            let owner = owner.trim();
            if owner.is_empty() {
                anyhow::bail!("Source entry '{}' has an empty owner", entry);
            }
            Ok(DefinitionSource::new(owner, path.trim()))
        })
        .collect()
}
