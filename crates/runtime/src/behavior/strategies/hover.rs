//! Floating pursuer with inertia and an attached light source.

use bestiary_core::{Creature, LightCommand, Vec2, World, WorldCommand};

use super::advance_cycle;
use crate::behavior::Behavior;

pub const CRUISING: i32 = 0;

const LIGHT_ATTACHED: &str = "light";

/// Key of the light owned by `creature`; stable across reloads.
pub fn light_key(creature: &Creature) -> String {
    format!("bestiary-light-{}", creature.id.0)
}

fn release_light(creature: &mut Creature, world: &mut dyn World) {
    if creature.state.vars.flag(LIGHT_ATTACHED) {
        creature.state.vars.set_flag(LIGHT_ATTACHED, false);
        world.push(WorldCommand::Light(LightCommand::Remove {
            key: light_key(creature),
        }));
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HoverStrategy;

impl Behavior for HoverStrategy {
    fn key(&self) -> &'static str {
        "hover"
    }

    fn initialize(&self, creature: &mut Creature, world: &mut dyn World) {
        creature.state.ai_state = CRUISING;
        let fields = creature.fields();
        let enabled = fields.bool_or("LightEnabled", true);
        let radius = fields.f32_or("LightRadius", 1.0);
        let attached = creature.state.vars.flag(LIGHT_ATTACHED);
        if !enabled {
            release_light(creature, world);
        } else if !attached {
            creature.state.vars.set_flag(LIGHT_ATTACHED, true);
            world.push(WorldCommand::Light(LightCommand::Attach {
                key: light_key(creature),
                position: creature.position,
                radius,
            }));
        }
    }

    fn update(&self, creature: &mut Creature, world: &mut dyn World, elapsed: f32) {
        let ticks = world.config().ticks(elapsed);
        let inertia = creature.fields().f32_or("Inertia", 0.05).clamp(0.0, 1.0);
        let desired = match world.target() {
            Some(target) => (target - creature.position).normalized() * creature.speed,
            None => Vec2::ZERO,
        };
        let blend = (inertia * ticks).min(1.0);
        creature.velocity = creature.velocity + (desired - creature.velocity) * blend;
        creature.integrate(ticks);
        creature.face_velocity();
        let cycle = advance_cycle(creature, 0.1, ticks);
        creature.frame = creature.walk_frame(cycle);
    }

    fn on_animation_tick(&self, creature: &Creature, world: &mut dyn World, _elapsed: f32) {
        if creature.state.vars.flag(LIGHT_ATTACHED) {
            world.push(WorldCommand::Light(LightCommand::Move {
                key: light_key(creature),
                position: creature.position,
            }));
        }
    }

    fn on_death(&self, creature: &mut Creature, world: &mut dyn World) {
        release_light(creature, world);
    }

    fn on_unload(&self, creature: &mut Creature, world: &mut dyn World) {
        release_light(creature, world);
    }
}
