//! Creature behavior runtime.
//!
//! This crate wires definitions, strategies, and live creatures together:
//! - [`registry`] caches registered definitions and their lazily loaded appearance
//! - [`behavior`] holds the strategy contract, the factory, and the built-in strategies
//! - [`monster`] is the entity runtime with the damage and death protocol
//! - [`spawn`] injects creatures into freshly entered tiered areas
//! - [`reload`] implements the clear-then-reregister world-load protocol
//! - [`sim`] is an in-memory host used by tests and the command line
pub mod behavior;
pub mod engine;
pub mod monster;
pub mod registry;
pub mod reload;
pub mod sim;
pub mod spawn;

mod error;
mod random;

pub use behavior::{Behavior, BehaviorFactory, BuiltinBehavior, Hit};
pub use engine::{Bestiary, BestiaryBuilder};
pub use error::{BestiaryError, Result};
pub use monster::{DamageOutcome, Monster};
pub use random::StdRandom;
pub use registry::{AppearanceRef, DefinitionRegistry, RegisteredEntry, SourceRef};
pub use reload::{ReloadReport, reload_all};
pub use sim::SimArea;
pub use spawn::{SpawnInjector, SpawnPlacement};
