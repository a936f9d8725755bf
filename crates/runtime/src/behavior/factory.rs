//! Behavior factory for resolving strategy keys.
//!
//! The [`BehaviorFactory`] implements the Registry pattern over shared strategy
//! instances, much like a provider registry:
//!
//! ```text
//! BehaviorFactory
//! ├── behaviors: HashMap<lower-cased key, Arc<dyn Behavior>>
//! └── default: Arc<dyn Behavior>   (chase; returned for empty or unknown keys)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use strum::{AsRefStr, EnumIter, IntoEnumIterator};
use tracing::{debug, trace};

use super::Behavior;
use super::strategies::{
    AerialStrategy, BurrowStrategy, ChaseStrategy, FeignDeathStrategy, HoverStrategy,
    JumperStrategy, ShellStrategy, SkirmisherStrategy,
};

/// Keys registered by [`BehaviorFactory::with_builtins`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum BuiltinBehavior {
    Default,
    Stalker,
    Bat,
    Ghost,
    Duggy,
    Skeleton,
    Mummy,
    RockCrab,
    Slime,
}

impl BuiltinBehavior {
    /// Strategy instance for this key. `Default` and `Stalker` share the
    /// factory's default chase instance and return `None` here.
    fn strategy(self) -> Option<Arc<dyn Behavior>> {
        let strategy: Arc<dyn Behavior> = match self {
            Self::Default | Self::Stalker => return None,
            Self::Bat => Arc::new(AerialStrategy),
            Self::Ghost => Arc::new(HoverStrategy),
            Self::Duggy => Arc::new(BurrowStrategy),
            Self::Skeleton => Arc::new(SkirmisherStrategy),
            Self::Mummy => Arc::new(FeignDeathStrategy),
            Self::RockCrab => Arc::new(ShellStrategy),
            Self::Slime => Arc::new(JumperStrategy),
        };
        Some(strategy)
    }
}

/// Case-insensitive mapping from behavior key to one shared strategy instance.
pub struct BehaviorFactory {
    behaviors: HashMap<String, Arc<dyn Behavior>>,
    default: Arc<dyn Behavior>,
}

impl BehaviorFactory {
    pub const DEFAULT_KEY: &'static str = "default";

    /// Factory with only the default chase strategy.
    pub fn new() -> Self {
        let default: Arc<dyn Behavior> = Arc::new(ChaseStrategy);
        let mut behaviors = HashMap::new();
        behaviors.insert(Self::DEFAULT_KEY.to_owned(), Arc::clone(&default));
        Self { behaviors, default }
    }

    /// Factory with every built-in strategy registered.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        for builtin in BuiltinBehavior::iter() {
            match builtin.strategy() {
                Some(strategy) => factory.register_arc(builtin.as_ref(), strategy),
                None => {
                    let default = Arc::clone(&factory.default);
                    factory.register_arc(builtin.as_ref(), default);
                }
            }
        }
        factory
    }

    /// Registers `behavior` under the lower-cased `key`, replacing any previous one.
    pub fn register(&mut self, key: &str, behavior: impl Behavior + 'static) {
        self.register_arc(key, Arc::new(behavior));
    }

    pub fn register_arc(&mut self, key: &str, behavior: Arc<dyn Behavior>) {
        let key = normalize(key);
        if key == Self::DEFAULT_KEY {
            self.default = Arc::clone(&behavior);
        }
        debug!(
            target: "bestiary::factory",
            key = %key,
            strategy = behavior.key(),
            "registered behavior"
        );
        self.behaviors.insert(key, behavior);
    }

    /// Strategy for `key`; empty or unknown keys resolve to the default.
    pub fn get(&self, key: &str) -> Arc<dyn Behavior> {
        let key = normalize(key);
        if key.is_empty() {
            return Arc::clone(&self.default);
        }
        match self.behaviors.get(&key) {
            Some(behavior) => Arc::clone(behavior),
            None => {
                trace!(
                    target: "bestiary::factory",
                    key = %key,
                    "unknown behavior key, using default"
                );
                Arc::clone(&self.default)
            }
        }
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.behaviors.contains_key(&normalize(key))
    }

    pub fn default_behavior(&self) -> &Arc<dyn Behavior> {
        &self.default
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.behaviors.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for BehaviorFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}
