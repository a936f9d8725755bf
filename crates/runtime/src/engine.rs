//! Bestiary facade and builder.
//!
//! [`Bestiary`] bundles the explicitly constructed registry, behavior factory,
//! spawn injector, and asset loader. Hosts build one per process and pass it to
//! every entity constructor; nothing here is ambient global state.

use std::sync::Arc;

use bestiary_content::{DefinitionSource, FileAssetLoader, StaticContentPipeline};
use bestiary_core::{AssetLoader, EngineConfig};

use crate::behavior::{Behavior, BehaviorFactory};
use crate::registry::DefinitionRegistry;
use crate::reload::{ReloadReport, reload_all};
use crate::spawn::SpawnInjector;

pub struct Bestiary {
    config: EngineConfig,
    registry: DefinitionRegistry,
    factory: BehaviorFactory,
    injector: SpawnInjector,
    assets: Arc<dyn AssetLoader>,
}

impl Bestiary {
    pub fn builder() -> BestiaryBuilder {
        BestiaryBuilder::default()
    }

    /// Built-in strategies, default configuration, and a loader that only
    /// resolves source-relative files and the placeholder content key.
    pub fn with_defaults() -> Self {
        Self::builder().build()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DefinitionRegistry {
        &mut self.registry
    }

    pub fn factory(&self) -> &BehaviorFactory {
        &self.factory
    }

    /// Registers an additional strategy under `key`.
    pub fn register_behavior(&mut self, key: &str, behavior: impl Behavior + 'static) {
        self.factory.register(key, behavior);
    }

    pub fn injector(&self) -> &SpawnInjector {
        &self.injector
    }

    pub fn assets(&self) -> &dyn AssetLoader {
        self.assets.as_ref()
    }

    /// World-load boundary: clears the registry and re-registers every source.
    pub fn reload(&mut self, sources: &[DefinitionSource]) -> ReloadReport {
        reload_all(&mut self.registry, sources)
    }
}

impl Default for Bestiary {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[derive(Default)]
pub struct BestiaryBuilder {
    config: Option<EngineConfig>,
    factory: Option<BehaviorFactory>,
    assets: Option<Arc<dyn AssetLoader>>,
}

impl BestiaryBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn factory(mut self, factory: BehaviorFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn assets(mut self, assets: Arc<dyn AssetLoader>) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn build(self) -> Bestiary {
        let config = self.config.unwrap_or_default();
        let assets = self.assets.unwrap_or_else(|| {
            Arc::new(FileAssetLoader::new(StaticContentPipeline::with_placeholder()))
        });
        Bestiary {
            injector: SpawnInjector::new(config.spawn.clone()),
            registry: DefinitionRegistry::new(),
            factory: self.factory.unwrap_or_else(BehaviorFactory::with_builtins),
            assets,
            config,
        }
    }
}
