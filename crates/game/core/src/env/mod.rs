//! Traits describing the host world a creature lives in.
//!
//! The engine owns no world state. Strategies see the host only through the
//! [`World`] trait: the target position, lookups of other creatures by id, a
//! random source, configuration, and a command sink for side effects. The
//! spawn injector additionally reads static layout through [`AreaMap`].
mod assets;
mod commands;
mod map;
mod rng;

pub use assets::{AppearanceAsset, AssetError, AssetLoader};
pub use commands::{EffectKind, LightCommand, SoundCue, WorldCommand};
pub use map::{AreaDimensions, AreaInfo, AreaKind, AreaMap, TileFlags};
pub use rng::{FixedRandom, PcgRng, RandomSource};

use crate::config::EngineConfig;
use crate::geometry::Vec2;
use crate::state::{Creature, EntityId};

/// Host services available to a creature while its hooks run.
///
/// The creature being dispatched is lent out of the world for the duration of
/// the call, so `creature`/`creature_mut` never return it. Every reference
/// obtained from an [`EntityRefs`](crate::state::EntityRefs) store must be
/// re-validated through [`World::is_alive`] before use.
pub trait World {
    fn config(&self) -> &EngineConfig;

    /// Position of the creature's target (the player), if one is present.
    fn target(&self) -> Option<Vec2>;

    fn rng(&mut self) -> &mut dyn RandomSource;

    fn creature(&self, id: EntityId) -> Option<&Creature>;

    fn creature_mut(&mut self, id: EntityId) -> Option<&mut Creature>;

    /// Ids of live creatures whose position lies within `radius` px of `center`.
    fn creatures_within(&self, center: Vec2, radius: f32) -> Vec<EntityId>;

    /// Queues a side effect for the host.
    fn push(&mut self, command: WorldCommand);

    /// True if `id` names a creature that is still alive in this area.
    fn is_alive(&self, id: EntityId) -> bool {
        self.creature(id).is_some_and(Creature::is_alive)
    }

    /// Host movement primitive. The default walks in a straight line.
    fn move_toward(&mut self, creature: &mut Creature, destination: Vec2, elapsed: f32) {
        let ticks = self.config().ticks(elapsed);
        let speed = creature.speed;
        creature.step_toward(destination, speed, ticks);
    }

    /// Where to put a creature whose coordinates became non-finite.
    fn safe_position_near_target(&self) -> Vec2 {
        let tile = self.config().tile_size;
        self.target()
            .map(|target| target + Vec2::new(tile, 0.0))
            .unwrap_or(Vec2::ZERO)
    }

    fn tile_size(&self) -> f32 {
        self.config().tile_size
    }

    /// Convenience for the common "target within N tiles" check.
    fn target_within_tiles(&self, from: Vec2, tiles: f32) -> Option<Vec2> {
        let range = tiles * self.tile_size();
        self.target().filter(|target| target.distance(from) <= range)
    }
}
