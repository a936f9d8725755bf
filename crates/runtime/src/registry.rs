//! Definition registry.
//!
//! The [`DefinitionRegistry`] maps globally unique creature ids to
//! [`RegisteredEntry`] values and is the only place definitions are cached.
//!
//! # Design
//!
//! - **Whole-entry replacement**: entries are never mutated in place; a second
//!   registration under the same id disposes the old entry and warns
//! - **Lazy appearance**: the asset is loaded on first request and cached,
//!   including a failed load, which is never retried
//! - **Explicit teardown**: [`DefinitionRegistry::clear`] disposes every entry
//!   before emptying the map, so world reloads release all asset handles

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use bestiary_core::{AppearanceAsset, AssetLoader, GameError, MonsterDefinition};
use tracing::{debug, warn};

use crate::BestiaryError;

/// Owning source of a registered definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRef {
    pub owner: String,
    /// Directory that source-relative appearance paths resolve against.
    pub base_dir: PathBuf,
}

impl SourceRef {
    pub fn new(owner: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            owner: owner.into(),
            base_dir: base_dir.into(),
        }
    }

    /// Source for definitions registered from code.
    pub fn builtin() -> Self {
        Self::new("builtin", PathBuf::new())
    }
}

/// Resolved appearance handed to live creatures.
#[derive(Clone, Debug)]
pub enum AppearanceRef {
    Loaded(Arc<dyn AppearanceAsset>),
    /// The fixed built-in placeholder.
    Placeholder,
}

impl AppearanceRef {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Loaded(asset) => asset.describe(),
            Self::Placeholder => bestiary_core::Appearance::PLACEHOLDER_TEXTURE.to_owned(),
        }
    }
}

/// One registered definition with its source and lazily loaded appearance.
#[derive(Debug)]
pub struct RegisteredEntry {
    definition: Arc<MonsterDefinition>,
    source: SourceRef,
    /// `Some(None)` caches a failed load.
    asset: OnceLock<Option<Arc<dyn AppearanceAsset>>>,
    disposed: AtomicBool,
}

impl RegisteredEntry {
    pub fn new(definition: MonsterDefinition, source: SourceRef) -> Self {
        Self {
            definition: Arc::new(definition),
            source,
            asset: OnceLock::new(),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn definition(&self) -> &Arc<MonsterDefinition> {
        &self.definition
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    /// True once the appearance has been requested, whatever the outcome.
    pub fn is_asset_resolved(&self) -> bool {
        self.asset.get().is_some()
    }

    /// Returns the cached appearance, loading it on first use.
    ///
    /// A failed load is logged once and cached as the placeholder. A disposed
    /// entry always yields the placeholder.
    pub fn appearance(&self, id: &str, loader: &dyn AssetLoader) -> AppearanceRef {
        if self.disposed.load(Ordering::Acquire) {
            return AppearanceRef::Placeholder;
        }
        let cached = self.asset.get_or_init(|| {
            match loader.load(&self.source.base_dir, &self.definition.appearance) {
                Ok(asset) => Some(asset),
                Err(source) => {
                    let error = BestiaryError::AssetLoad {
                        id: id.to_owned(),
                        source,
                    };
                    warn!(
                        target: "bestiary::assets",
                        id,
                        owner = %self.source.owner,
                        code = error.error_code(),
                        reason = %error,
                        "using placeholder appearance"
                    );
                    None
                }
            }
        });
        match cached {
            Some(asset) => AppearanceRef::Loaded(Arc::clone(asset)),
            None => AppearanceRef::Placeholder,
        }
    }

    /// Releases the appearance asset. Only the first call has an effect.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(Some(asset)) = self.asset.get() {
            asset.dispose();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

/// Process-scoped mapping from unique id to registered entry.
///
/// Constructed explicitly by the host and passed to whatever needs it.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    entries: HashMap<String, RegisteredEntry>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry` under `id`.
    ///
    /// An existing entry under the same id is disposed and replaced; the
    /// conflict is logged at warn level and returned.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        entry: RegisteredEntry,
    ) -> Option<BestiaryError> {
        let id = id.into();
        let owner = entry.source.owner.clone();
        let previous = self.entries.insert(id.clone(), entry)?;
        previous.dispose();
        let conflict = BestiaryError::RegistrationConflict {
            id,
            owner,
            previous_owner: previous.source.owner.clone(),
        };
        warn!(
            target: "bestiary::registry",
            code = conflict.error_code(),
            "{conflict}"
        );
        Some(conflict)
    }

    /// Shorthand for registering a definition created in code.
    pub fn register_definition(
        &mut self,
        id: impl Into<String>,
        definition: MonsterDefinition,
    ) -> Option<BestiaryError> {
        self.register(id, RegisteredEntry::new(definition, SourceRef::builtin()))
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredEntry> {
        self.entries.get(id)
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered ids in unspecified order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Registered ids, sorted.
    pub fn sorted_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.ids().collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegisteredEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Disposes every entry, then empties the map.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        for entry in self.entries.values() {
            entry.dispose();
        }
        self.entries.clear();
        debug!(target: "bestiary::registry", count, "cleared registry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestiary_core::{Appearance, AssetError};
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug)]
    struct CountingAsset {
        disposed: Arc<AtomicUsize>,
    }

    impl AppearanceAsset for CountingAsset {
        fn describe(&self) -> String {
            "counting".into()
        }

        fn dispose(&self) {
            self.disposed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct CountingLoader {
        loads: AtomicUsize,
        disposed: Arc<AtomicUsize>,
        fail: bool,
    }

    impl AssetLoader for CountingLoader {
        fn load(
            &self,
            _base_dir: &Path,
            _appearance: &Appearance,
        ) -> std::result::Result<Arc<dyn AppearanceAsset>, AssetError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AssetError::EmptyTexture);
            }
            Ok(Arc::new(CountingAsset {
                disposed: Arc::clone(&self.disposed),
            }))
        }
    }

    fn entry(owner: &str, name: &str) -> RegisteredEntry {
        RegisteredEntry::new(MonsterDefinition::new(name), SourceRef::new(owner, ""))
    }

    #[test]
    fn reregistering_disposes_prior_asset_exactly_once() {
        let loader = CountingLoader::default();
        let mut registry = DefinitionRegistry::new();
        registry.register("pack_Imp", entry("pack", "Old Imp"));
        let first = registry.get("pack_Imp").unwrap().appearance("pack_Imp", &loader);
        assert!(!first.is_placeholder());

        let conflict = registry.register("pack_Imp", entry("pack", "New Imp"));
        assert!(matches!(
            conflict,
            Some(BestiaryError::RegistrationConflict { .. })
        ));
        assert_eq!(loader.disposed.load(Ordering::SeqCst), 1);
        assert_eq!(registry.get("pack_Imp").unwrap().definition().name, "New Imp");
        assert_eq!(registry.len(), 1);

        registry.clear();
        // the replaced entry is gone; only the new (never loaded) one was cleared
        assert_eq!(loader.disposed.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn failed_load_is_cached_and_not_retried() {
        let loader = CountingLoader {
            fail: true,
            ..CountingLoader::default()
        };
        let mut registry = DefinitionRegistry::new();
        registry.register("pack_Bat", entry("pack", "Bat"));
        let entry = registry.get("pack_Bat").unwrap();
        for _ in 0..5 {
            assert!(entry.appearance("pack_Bat", &loader).is_placeholder());
        }
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_disposes_every_loaded_entry() {
        let loader = CountingLoader::default();
        let mut registry = DefinitionRegistry::new();
        for id in ["a_One", "a_Two", "b_Three"] {
            registry.register(id, entry("a", id));
            registry.get(id).unwrap().appearance(id, &loader);
        }
        registry.clear();
        assert_eq!(loader.disposed.load(Ordering::SeqCst), 3);
        assert!(!registry.is_registered("a_One"));
    }

    #[test]
    fn dispose_is_idempotent_and_blocks_later_loads() {
        let loader = CountingLoader::default();
        let entry = entry("a", "One");
        entry.appearance("a_One", &loader);
        entry.dispose();
        entry.dispose();
        assert_eq!(loader.disposed.load(Ordering::SeqCst), 1);
        assert!(entry.appearance("a_One", &loader).is_placeholder());
    }

    #[test]
    fn sorted_ids_are_stable() {
        let mut registry = DefinitionRegistry::new();
        registry.register_definition("z_Slime", MonsterDefinition::new("Slime"));
        registry.register_definition("a_Bat", MonsterDefinition::new("Bat"));
        assert_eq!(registry.sorted_ids(), vec!["a_Bat", "z_Slime"]);
    }
}
