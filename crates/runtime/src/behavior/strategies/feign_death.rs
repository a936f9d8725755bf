//! Creature that collapses instead of dying and revives after a while.
//!
//! Only area damage can finish it off while it lies collapsed.

use bestiary_core::{Creature, EffectKind, SoundCue, World, WorldCommand};

use super::{advance_cycle, enter_state, tiles};
use crate::behavior::{Behavior, Hit};

pub const UPRIGHT: i32 = 0;
pub const COLLAPSED: i32 = 1;

/// Reported for the fatal area hit so the built-in path always kills.
pub const FATAL_DAMAGE: i32 = i32::MAX / 2;

const COLLAPSED_FRAME: usize = 16;

#[derive(Debug, Clone, Copy, Default)]
pub struct FeignDeathStrategy;

impl FeignDeathStrategy {
    fn collapse(&self, creature: &mut Creature, world: &mut dyn World) {
        creature.health = creature.max_health;
        creature.contact_damage = 0;
        creature.halt();
        creature.frame = COLLAPSED_FRAME;
        creature.state.state_timer = creature.fields().f32_or("ReviveTime", 10.0);
        enter_state(creature, self.key(), COLLAPSED);
        world.push(WorldCommand::PlaySound {
            cue: SoundCue::Collapse,
            position: creature.position,
        });
    }

    fn revive(&self, creature: &mut Creature, world: &mut dyn World) {
        creature.contact_damage = creature.base_stats().damage;
        creature.frame = 0;
        enter_state(creature, self.key(), UPRIGHT);
        world.push(WorldCommand::PlaySound {
            cue: SoundCue::Revive,
            position: creature.position,
        });
    }
}

impl Behavior for FeignDeathStrategy {
    fn key(&self) -> &'static str {
        "feign_death"
    }

    fn update(&self, creature: &mut Creature, world: &mut dyn World, elapsed: f32) {
        if creature.state.ai_state == COLLAPSED {
            creature.halt();
            if creature.state.tick_state_timer(elapsed) {
                self.revive(creature, world);
            }
            return;
        }

        let Some(target) = world.target() else {
            creature.halt();
            return;
        };
        let range = tiles(world, creature.fields().f32_or("DetectionRange", 8.0));
        if creature.distance_to(target) <= range {
            world.move_toward(creature, target, elapsed);
            let ticks = world.config().ticks(elapsed);
            let cycle = advance_cycle(creature, 0.1, ticks);
            creature.frame = creature.walk_frame(cycle);
        } else {
            creature.halt();
        }
    }

    fn on_animation_tick(&self, creature: &Creature, world: &mut dyn World, _elapsed: f32) {
        if creature.state.ai_state != COLLAPSED {
            return;
        }
        let warning = creature.fields().f32_or("ReviveWarning", 2.0);
        if creature.state.state_timer <= warning {
            world.push(WorldCommand::VisualEffect {
                kind: EffectKind::ReviveWarning,
                position: creature.position,
            });
        }
    }

    fn on_take_damage(&self, creature: &mut Creature, world: &mut dyn World, hit: Hit) -> i32 {
        if creature.state.ai_state == COLLAPSED {
            if hit.is_area {
                creature.health = 0;
                return FATAL_DAMAGE;
            }
            return 0;
        }
        if hit.damage <= 0 {
            return hit.damage;
        }
        let applied = (hit.damage - creature.defense).max(1);
        if creature.health - applied <= 0 {
            self.collapse(creature, world);
            return 0;
        }
        hit.damage
    }
}
