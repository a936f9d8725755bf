//! Entity runtime: one live creature bound to a definition and a strategy.
//!
//! A [`Monster`] owns its [`Creature`] body and delegates every lifecycle
//! event to the strategy selected by the creature's cached behavior key.
//!
//! # Damage protocol
//!
//! ```text
//! take_damage(hit)
//!   ├─ invincible_override set      → Rejected (hook never runs)
//!   ├─ hook returns <= 0 for hit > 0 → Suppressed (no reaction, no sound)
//!   └─ otherwise                     → health -= max(1, damage - defense)
//!                                      HitReaction + Hit sound, death at 0
//! ```

use std::sync::Arc;

use bestiary_core::{
    Creature, EntityId, GameError, MonsterDefinition, SoundCue, Vec2, World, WorldCommand,
};
use tracing::{debug, warn};

use crate::BestiaryError;
use crate::behavior::{Behavior, Hit};
use crate::engine::Bestiary;
use crate::registry::AppearanceRef;

/// What happened to one damage event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The creature is already dead or the hit carried no damage.
    Ignored,
    /// Rejected by the invincibility override before the strategy ran.
    Rejected,
    /// The strategy cancelled a positive hit.
    Suppressed,
    Applied { damage: i32, killed: bool },
}

impl DamageOutcome {
    pub fn applied(&self) -> i32 {
        match self {
            Self::Applied { damage, .. } => *damage,
            _ => 0,
        }
    }

    pub fn killed(&self) -> bool {
        matches!(self, Self::Applied { killed: true, .. })
    }
}

pub struct Monster {
    creature: Creature,
    behavior: Arc<dyn Behavior>,
    appearance: AppearanceRef,
    dead: bool,
}

impl std::fmt::Debug for Monster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monster")
            .field("id", &self.creature.id)
            .field("definition", &self.creature.state.definition_id)
            .field("behavior", &self.behavior.key())
            .field("dead", &self.dead)
            .finish()
    }
}

impl Monster {
    /// Creates a creature and immediately loads its definition.
    pub fn spawn(
        id: EntityId,
        definition_id: impl Into<String>,
        position: Vec2,
        bestiary: &Bestiary,
        world: &mut dyn World,
    ) -> Self {
        let creature = Creature::new(id, definition_id, position);
        let mut monster = Self {
            creature,
            behavior: Arc::clone(bestiary.factory().default_behavior()),
            appearance: AppearanceRef::Placeholder,
            dead: false,
        };
        monster.load(bestiary, world, true);
        monster
    }

    /// (Re)loads the definition named by the creature's definition id.
    ///
    /// An unknown id keeps the creature in play with the default definition,
    /// the default strategy, and the placeholder appearance. Named stores are
    /// cleared on a fresh load or when the behavior key changes; in the latter
    /// case the outgoing strategy unloads first.
    pub fn load(&mut self, bestiary: &Bestiary, world: &mut dyn World, fresh: bool) {
        let id = self.creature.state.definition_id.clone();
        let previous_key = self.creature.state.behavior_key.clone();

        let (definition, appearance) = match bestiary.registry().get(&id) {
            Some(entry) => (
                Arc::clone(entry.definition()),
                entry.appearance(&id, bestiary.assets()),
            ),
            None => {
                let missing = BestiaryError::DefinitionMissing { id: id.clone() };
                warn!(
                    target: "bestiary::monster",
                    entity = %self.creature.id,
                    code = missing.error_code(),
                    "{missing}"
                );
                (
                    Arc::new(MonsterDefinition::new(id.clone())),
                    AppearanceRef::Placeholder,
                )
            }
        };

        let key_changed = !previous_key.eq_ignore_ascii_case(definition.behavior.trim());
        if key_changed && !fresh {
            self.behavior.on_unload(&mut self.creature, world);
        }

        self.creature.apply_definition(definition, fresh);
        self.appearance = appearance;
        self.behavior = bestiary.factory().get(&self.creature.state.behavior_key);

        if fresh || key_changed {
            self.creature.state.clear_stores();
        }
        self.behavior.initialize(&mut self.creature, world);
        debug!(
            target: "bestiary::monster",
            entity = %self.creature.id,
            definition = %id,
            behavior = self.behavior.key(),
            fresh,
            "loaded definition"
        );
    }

    /// Re-resolves the definition after the id changed, e.g. when replicated
    /// from a peer. A wounded creature keeps its health.
    pub fn set_definition_id(
        &mut self,
        definition_id: impl Into<String>,
        bestiary: &Bestiary,
        world: &mut dyn World,
    ) {
        let definition_id = definition_id.into();
        if definition_id == self.creature.state.definition_id {
            return;
        }
        self.creature.state.definition_id = definition_id;
        self.load(bestiary, world, false);
    }

    pub fn id(&self) -> EntityId {
        self.creature.id
    }

    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    pub fn creature_mut(&mut self) -> &mut Creature {
        &mut self.creature
    }

    pub fn behavior(&self) -> &Arc<dyn Behavior> {
        &self.behavior
    }

    pub fn appearance(&self) -> &AppearanceRef {
        &self.appearance
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// One simulation tick.
    pub fn update(&mut self, world: &mut dyn World, elapsed: f32) {
        if self.dead || !elapsed.is_finite() || elapsed < 0.0 {
            return;
        }
        self.recover_position(world);
        self.creature.state.refs.retain_live(|id| world.is_alive(id));
        self.behavior.update(&mut self.creature, world, elapsed);
        self.recover_position(world);
    }

    pub fn animation_tick(&self, world: &mut dyn World, elapsed: f32) {
        if !self.dead {
            self.behavior.on_animation_tick(&self.creature, world, elapsed);
        }
    }

    /// Runs the damage protocol for one hit.
    pub fn take_damage(&mut self, world: &mut dyn World, hit: Hit) -> DamageOutcome {
        if self.dead || !self.creature.is_alive() {
            return DamageOutcome::Ignored;
        }
        if self.creature.state.invincible_override {
            return DamageOutcome::Rejected;
        }

        let damage = self.behavior.on_take_damage(&mut self.creature, world, hit);
        if hit.damage > 0 && damage <= 0 {
            debug!(
                target: "bestiary::monster",
                entity = %self.creature.id,
                raw = hit.damage,
                "hit suppressed by strategy"
            );
            return DamageOutcome::Suppressed;
        }
        if damage <= 0 {
            return DamageOutcome::Ignored;
        }

        let applied = damage.saturating_sub(self.creature.defense).max(1);
        self.creature.health = self.creature.health.saturating_sub(applied).max(0);
        world.push(WorldCommand::HitReaction {
            entity: self.creature.id,
            damage: applied,
        });
        world.push(WorldCommand::PlaySound {
            cue: SoundCue::Hit,
            position: self.creature.position,
        });

        let killed = self.creature.health == 0;
        if killed {
            self.die(world);
        }
        DamageOutcome::Applied {
            damage: applied,
            killed,
        }
    }

    /// Kills the creature outright, running the full death path.
    pub fn kill(&mut self, world: &mut dyn World) {
        if !self.dead {
            self.creature.health = 0;
            self.die(world);
        }
    }

    fn die(&mut self, world: &mut dyn World) {
        self.dead = true;
        self.behavior.on_death(&mut self.creature, world);

        let definition = Arc::clone(self.creature.definition_arc());
        let position = self.creature.position;
        for rule in &definition.drops {
            if let Some(stack) = rule.roll(world.rng()) {
                world.push(WorldCommand::DropItem {
                    item_id: rule.item_id.clone(),
                    stack,
                    position,
                });
            }
        }

        world.push(WorldCommand::Died {
            entity: self.creature.id,
            experience: self.creature.experience,
        });
        world.push(WorldCommand::PlaySound {
            cue: SoundCue::Death,
            position,
        });
        debug!(target: "bestiary::monster", entity = %self.creature.id, "died");
    }

    fn recover_position(&mut self, world: &dyn World) {
        if self.creature.position.is_finite() && self.creature.velocity.is_finite() {
            return;
        }
        let corrupt = BestiaryError::CorruptPosition {
            entity: self.creature.id,
        };
        warn!(
            target: "bestiary::monster",
            code = corrupt.error_code(),
            "{corrupt}; snapping near target"
        );
        self.creature.position = world.safe_position_near_target();
        self.creature.halt();
    }
}
