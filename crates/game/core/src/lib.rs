//! Data model and host seams for the pluggable creature behavior engine.
//!
//! `bestiary-core` defines creature definitions, the per-instance runtime state
//! strategies mutate, and the traits a host implements to run creatures
//! ([`env::World`], [`env::AreaMap`], [`env::AssetLoader`]). It performs no
//! I/O; loaders live in `bestiary-content` and dispatch in `bestiary-runtime`.
pub mod config;
pub mod definition;
pub mod env;
pub mod error;
pub mod geometry;
pub mod state;

pub use config::{EngineConfig, SpawnConfig};
pub use definition::{
    Appearance, AssetSource, CombatStats, CustomFields, DropRule, MonsterDefinition, SpawnRule,
};
pub use env::{
    AppearanceAsset, AreaDimensions, AreaInfo, AreaKind, AreaMap, AssetError, AssetLoader,
    EffectKind, FixedRandom, LightCommand, PcgRng, RandomSource, SoundCue, TileFlags, World,
    WorldCommand,
};
pub use error::{ErrorSeverity, GameError};
pub use geometry::{Facing, TilePos, Vec2, angle_delta, wrap_angle};
pub use state::{Creature, EntityId, EntityRefs, FloatVars, RuntimeState, countdown};
