//! Underground ambusher.
//!
//! Hidden, the creature is invisible, harmless, and immune; its body is parked
//! off-screen while a home point (kept in the float store) is used for the
//! range check. When the target comes close it teleports onto the target and
//! runs a fixed surface sequence before burrowing again.

use bestiary_core::{Creature, EffectKind, SoundCue, Vec2, World, WorldCommand};

use super::enter_state;
use crate::behavior::{Behavior, Hit};

pub const HIDDEN: i32 = 0;
pub const SURFACED: i32 = 1;

pub const EMERGE_TIME: f32 = 0.5;
pub const ATTACK_TIME: f32 = 1.4;
pub const RETREAT_TIME: f32 = 0.5;
pub const SURFACE_TIME: f32 = EMERGE_TIME + ATTACK_TIME + RETREAT_TIME;

/// Tiles the parked body is moved away from the origin while hidden.
const PARK_DISTANCE_TILES: f32 = 1000.0;

const EMERGE_FRAMES: usize = 4;
const ATTACK_FRAMES: usize = 3;
const RETREAT_FRAMES: usize = 4;
const ATTACK_LOOP_TIME: f32 = 0.35;

/// Seconds underground before another ambush is possible.
pub const REBURROW_DELAY: f32 = 1.5;

const HOME_X: &str = "home_x";
const HOME_Y: &str = "home_y";
const RESTING: &str = "resting";

fn home(creature: &Creature) -> Vec2 {
    Vec2::new(
        creature.state.vars.get(HOME_X),
        creature.state.vars.get(HOME_Y),
    )
}

fn set_home(creature: &mut Creature, point: Vec2) {
    creature.state.vars.set(HOME_X, point.x);
    creature.state.vars.set(HOME_Y, point.y);
}

/// Frame for the surface sequence at `elapsed` seconds since surfacing.
pub fn surface_frame(elapsed: f32) -> usize {
    if elapsed < EMERGE_TIME {
        (elapsed / EMERGE_TIME * EMERGE_FRAMES as f32) as usize
    } else if elapsed < EMERGE_TIME + ATTACK_TIME {
        let looped = (elapsed - EMERGE_TIME) % ATTACK_LOOP_TIME;
        EMERGE_FRAMES + (looped / ATTACK_LOOP_TIME * ATTACK_FRAMES as f32) as usize
    } else {
        let retreat = ((elapsed - EMERGE_TIME - ATTACK_TIME) / RETREAT_TIME).min(0.999);
        EMERGE_FRAMES + ATTACK_FRAMES + (retreat * RETREAT_FRAMES as f32) as usize
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BurrowStrategy;

impl BurrowStrategy {
    fn hide(&self, creature: &mut Creature, world: &dyn World) {
        enter_state(creature, self.key(), HIDDEN);
        creature.visible = false;
        creature.contact_damage = 0;
        creature.health = creature.max_health;
        creature.frame = 0;
        creature.halt();
        let park = PARK_DISTANCE_TILES * world.tile_size();
        creature.position = Vec2::new(-park, -park);
    }
}

impl Behavior for BurrowStrategy {
    fn key(&self) -> &'static str {
        "burrow"
    }

    fn initialize(&self, creature: &mut Creature, world: &mut dyn World) {
        // a resync keeps the stores, and the body may already be parked
        let point = if creature.state.vars.contains(HOME_X) {
            home(creature)
        } else {
            creature.position
        };
        set_home(creature, point);
        self.hide(creature, world);
    }

    fn on_unload(&self, creature: &mut Creature, _world: &mut dyn World) {
        if creature.state.ai_state == HIDDEN {
            creature.position = home(creature);
        }
        creature.visible = true;
    }

    fn update(&self, creature: &mut Creature, world: &mut dyn World, elapsed: f32) {
        match creature.state.ai_state {
            SURFACED => {
                let since = SURFACE_TIME - creature.state.state_timer;
                creature.frame = surface_frame(since.max(0.0));
                if creature.state.tick_state_timer(elapsed) {
                    set_home(creature, creature.position);
                    creature.state.vars.set(RESTING, REBURROW_DELAY);
                    world.push(WorldCommand::PlaySound {
                        cue: SoundCue::Burrow,
                        position: creature.position,
                    });
                    self.hide(creature, world);
                }
            }
            _ => {
                creature.health = creature.max_health;
                creature.state.vars.countdown(RESTING, elapsed);
                if creature.state.vars.is_running(RESTING) {
                    return;
                }
                let range = creature.fields().f32_or("AmbushRange", 2.0);
                let Some(target) = world.target_within_tiles(home(creature), range) else {
                    return;
                };
                creature.position = target;
                creature.visible = true;
                creature.contact_damage = creature.base_stats().damage;
                creature.state.state_timer = SURFACE_TIME;
                creature.frame = 0;
                enter_state(creature, self.key(), SURFACED);
                world.push(WorldCommand::PlaySound {
                    cue: SoundCue::Surface,
                    position: target,
                });
                world.push(WorldCommand::VisualEffect {
                    kind: EffectKind::Dust,
                    position: target,
                });
            }
        }
    }

    fn on_take_damage(&self, creature: &mut Creature, _world: &mut dyn World, hit: Hit) -> i32 {
        if creature.state.ai_state == HIDDEN {
            0
        } else {
            hit.damage
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::strategies::testing::{TICK, TestWorld, creature};
    use bestiary_core::{CombatStats, MonsterDefinition};

    fn duggy(world: &mut TestWorld) -> Creature {
        let definition = MonsterDefinition::new("Duggy")
            .with_stats(CombatStats::new(30, 8, 0, 4, 0.0));
        let mut duggy = creature(2, Vec2::new(320.0, 320.0), definition);
        BurrowStrategy.initialize(&mut duggy, world);
        duggy
    }

    #[test]
    fn hidden_is_invisible_harmless_and_immune() {
        let mut world = TestWorld::new();
        let mut duggy = duggy(&mut world);
        duggy.health = 5;
        BurrowStrategy.update(&mut duggy, &mut world, TICK);
        assert!(!duggy.visible);
        assert_eq!(duggy.contact_damage, 0);
        assert_eq!(duggy.health, 30);
        assert_eq!(BurrowStrategy.on_take_damage(&mut duggy, &mut world, Hit::melee(10)), 0);
    }

    #[test]
    fn ambush_surfaces_on_target_then_reburrows() {
        let mut world = TestWorld::new().with_target(Vec2::new(350.0, 330.0));
        let mut duggy = duggy(&mut world);

        BurrowStrategy.update(&mut duggy, &mut world, TICK);
        assert_eq!(duggy.state.ai_state, SURFACED);
        assert_eq!(duggy.position, Vec2::new(350.0, 330.0));
        assert!(duggy.visible);
        assert_eq!(duggy.contact_damage, 8);
        assert_eq!(BurrowStrategy.on_take_damage(&mut duggy, &mut world, Hit::melee(10)), 10);

        let mut frames = Vec::new();
        for _ in 0..200 {
            BurrowStrategy.update(&mut duggy, &mut world, TICK);
            if duggy.state.ai_state == HIDDEN {
                break;
            }
            frames.push(duggy.frame);
        }
        assert_eq!(duggy.state.ai_state, HIDDEN);
        // 2.4 s at 60 ticks per second
        assert!((142..=145).contains(&frames.len()));
        assert!(frames.windows(2).take(30).all(|w| w[0] <= w[1]));
        assert!(duggy.position.x < -10_000.0);
        assert!(!duggy.visible);

        // still resting underground right after burrowing
        BurrowStrategy.update(&mut duggy, &mut world, TICK);
        assert_eq!(duggy.state.ai_state, HIDDEN);
    }

    #[test]
    fn reinitializing_while_parked_keeps_the_ambush_point() {
        let mut world = TestWorld::new();
        let mut duggy = duggy(&mut world);
        BurrowStrategy.update(&mut duggy, &mut world, TICK);
        assert!(duggy.position.x < -10_000.0);

        BurrowStrategy.initialize(&mut duggy, &mut world);
        assert_eq!(home(&duggy), Vec2::new(320.0, 320.0));

        world.target = Some(Vec2::new(330.0, 320.0));
        BurrowStrategy.update(&mut duggy, &mut world, TICK);
        assert_eq!(duggy.state.ai_state, SURFACED);
    }

    #[test]
    fn unloading_a_hidden_burrower_returns_it_home() {
        let mut world = TestWorld::new();
        let mut duggy = duggy(&mut world);
        BurrowStrategy.on_unload(&mut duggy, &mut world);
        assert_eq!(duggy.position, Vec2::new(320.0, 320.0));
        assert!(duggy.visible);
    }

    #[test]
    fn surface_frames_cover_each_phase() {
        assert_eq!(surface_frame(0.0), 0);
        assert_eq!(surface_frame(EMERGE_TIME), EMERGE_FRAMES);
        assert!(surface_frame(SURFACE_TIME) < EMERGE_FRAMES + ATTACK_FRAMES + RETREAT_FRAMES);
    }
}
