//! Shelled creature that hides, wakes when struck, and flees once its shell breaks.
//!
//! A broken shell stays broken for the creature's lifetime: defense stays at
//! zero and the flight lasts `FleeTime` seconds, after which the creature
//! settles back into its hidden pose.

use bestiary_core::{Creature, EffectKind, SoundCue, World, WorldCommand};

use super::{advance_cycle, enter_state, tiles};
use crate::behavior::{Behavior, Hit};

pub const HIDDEN: i32 = 0;
pub const WAKING: i32 = 1;
pub const ACTIVE: i32 = 2;
pub const SHELL_BROKEN: i32 = 3;

/// Distance of the flee waypoint; only the direction matters.
const FLEE_REACH: f32 = 10_000.0;

const BROKEN: &str = "shell_broken";
const FLEEING: &str = "flee";

#[derive(Debug, Clone, Copy, Default)]
pub struct ShellStrategy;

impl ShellStrategy {
    fn hide(&self, creature: &mut Creature) {
        creature.contact_damage = 0;
        creature.frame = 0;
        creature.halt();
        enter_state(creature, self.key(), HIDDEN);
    }
}

impl Behavior for ShellStrategy {
    fn key(&self) -> &'static str {
        "hide_wake_flee"
    }

    fn initialize(&self, creature: &mut Creature, _world: &mut dyn World) {
        self.hide(creature);
        if creature.state.vars.flag(BROKEN) {
            creature.defense = 0;
            if creature.state.vars.is_running(FLEEING) {
                enter_state(creature, self.key(), SHELL_BROKEN);
            }
        }
    }

    fn update(&self, creature: &mut Creature, world: &mut dyn World, elapsed: f32) {
        let ticks = world.config().ticks(elapsed);
        match creature.state.ai_state {
            WAKING => {
                creature.halt();
                if creature.state.tick_state_timer(elapsed) {
                    let damage = creature
                        .fields()
                        .i32_or("ActiveDamage", creature.base_stats().damage);
                    creature.contact_damage = damage.max(0);
                    enter_state(creature, self.key(), ACTIVE);
                }
            }
            ACTIVE => {
                let disengage = tiles(world, creature.fields().f32_or("DisengageRange", 10.0));
                match world.target() {
                    Some(target) if creature.distance_to(target) <= disengage => {
                        world.move_toward(creature, target, elapsed);
                        let cycle = advance_cycle(creature, 0.15, ticks);
                        creature.frame = 1 + creature.walk_frame(cycle);
                    }
                    _ => self.hide(creature),
                }
            }
            SHELL_BROKEN => {
                creature.contact_damage = 0;
                if creature.state.vars.countdown(FLEEING, elapsed) {
                    self.hide(creature);
                    return;
                }
                let Some(target) = world.target() else {
                    creature.halt();
                    return;
                };
                let away = (creature.position - target).normalized();
                let multiplier = creature.fields().f32_or("FleeSpeedMultiplier", 2.0);
                let waypoint = creature.position + away * FLEE_REACH;
                let speed = creature.speed * multiplier;
                creature.step_toward(waypoint, speed, ticks);
                let cycle = advance_cycle(creature, 0.3, ticks);
                creature.frame = 1 + creature.walk_frame(cycle);
            }
            _ => {
                creature.halt();
                creature.frame = 0;
            }
        }
    }

    fn on_take_damage(&self, creature: &mut Creature, world: &mut dyn World, hit: Hit) -> i32 {
        let state = creature.state.ai_state;
        let broken = creature.state.vars.flag(BROKEN);
        if hit.is_area && broken {
            return hit.damage;
        }
        if hit.is_area {
            creature.defense = 0;
            creature.contact_damage = 0;
            creature.state.vars.set_flag(BROKEN, true);
            let flee_time = creature.fields().f32_or("FleeTime", 6.0).max(f32::EPSILON);
            creature.state.vars.set(FLEEING, flee_time);
            enter_state(creature, self.key(), SHELL_BROKEN);
            world.push(WorldCommand::PlaySound {
                cue: SoundCue::ShellBreak,
                position: creature.position,
            });
            world.push(WorldCommand::VisualEffect {
                kind: EffectKind::ShellShards,
                position: creature.position,
            });
            return hit.damage;
        }
        match state {
            HIDDEN => {
                if hit.damage > 0 {
                    creature.state.state_timer = creature.fields().f32_or("WakeTime", 0.5);
                    enter_state(creature, self.key(), WAKING);
                    world.push(WorldCommand::PlaySound {
                        cue: SoundCue::Wake,
                        position: creature.position,
                    });
                }
                0
            }
            WAKING => 0,
            _ => hit.damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::strategies::testing::{TICK, TestWorld, creature};
    use bestiary_core::{CombatStats, MonsterDefinition, Vec2};

    fn crab(world: &mut TestWorld) -> Creature {
        let definition = MonsterDefinition::new("Rock Crab")
            .with_stats(CombatStats::new(25, 6, 3, 5, 1.5))
            .with_field("WakeTime", 0.2);
        let mut crab = creature(6, Vec2::ZERO, definition);
        ShellStrategy.initialize(&mut crab, world);
        crab
    }

    #[test]
    fn melee_while_hidden_wakes_without_damage() {
        let mut world = TestWorld::new().with_target(Vec2::new(100.0, 0.0));
        let mut crab = crab(&mut world);
        assert_eq!(crab.contact_damage, 0);
        assert_eq!(ShellStrategy.on_take_damage(&mut crab, &mut world, Hit::melee(8)), 0);
        assert_eq!(crab.state.ai_state, WAKING);
        assert_eq!(ShellStrategy.on_take_damage(&mut crab, &mut world, Hit::melee(8)), 0);

        for _ in 0..15 {
            ShellStrategy.update(&mut crab, &mut world, TICK);
        }
        assert_eq!(crab.state.ai_state, ACTIVE);
        assert_eq!(crab.contact_damage, 6);
        assert_eq!(ShellStrategy.on_take_damage(&mut crab, &mut world, Hit::melee(8)), 8);
    }

    #[test]
    fn area_damage_breaks_shell_and_applies() {
        let mut world = TestWorld::new().with_target(Vec2::new(100.0, 0.0));
        let mut crab = crab(&mut world);
        assert_eq!(ShellStrategy.on_take_damage(&mut crab, &mut world, Hit::area(10)), 10);
        assert_eq!(crab.state.ai_state, SHELL_BROKEN);
        assert_eq!(crab.defense, 0);

        ShellStrategy.update(&mut crab, &mut world, TICK);
        assert!(crab.position.x < 0.0);
        assert!((crab.velocity.length() - 3.0).abs() < 1e-3);
        assert_eq!(crab.contact_damage, 0);
    }

    #[test]
    fn active_rehides_beyond_disengage_range() {
        let mut world = TestWorld::new().with_target(Vec2::new(100.0, 0.0));
        let mut crab = crab(&mut world);
        ShellStrategy.on_take_damage(&mut crab, &mut world, Hit::melee(1));
        for _ in 0..15 {
            ShellStrategy.update(&mut crab, &mut world, TICK);
        }
        assert_eq!(crab.state.ai_state, ACTIVE);

        world.target = Some(Vec2::new(5000.0, 0.0));
        ShellStrategy.update(&mut crab, &mut world, TICK);
        assert_eq!(crab.state.ai_state, HIDDEN);
        assert_eq!(crab.contact_damage, 0);
    }

    #[test]
    fn broken_shell_stops_fleeing_when_the_flight_expires() {
        let mut world = TestWorld::new().with_target(Vec2::new(100.0, 0.0));
        let definition = MonsterDefinition::new("Rock Crab")
            .with_stats(CombatStats::new(25, 6, 3, 5, 1.5))
            .with_field("FleeTime", 0.5);
        let mut crab = creature(6, Vec2::ZERO, definition);
        ShellStrategy.initialize(&mut crab, &mut world);
        ShellStrategy.on_take_damage(&mut crab, &mut world, Hit::area(4));

        for _ in 0..40 {
            ShellStrategy.update(&mut crab, &mut world, TICK);
        }
        assert_eq!(crab.state.ai_state, HIDDEN);
        assert_eq!(crab.velocity, Vec2::ZERO);
        assert_eq!(crab.defense, 0);
        // the shell cannot break twice, area hits just land
        assert_eq!(ShellStrategy.on_take_damage(&mut crab, &mut world, Hit::area(4)), 4);
        assert_eq!(crab.state.ai_state, HIDDEN);
    }

    #[test]
    fn reinitializing_keeps_a_broken_shell_fleeing() {
        let mut world = TestWorld::new().with_target(Vec2::new(100.0, 0.0));
        let mut crab = crab(&mut world);
        ShellStrategy.on_take_damage(&mut crab, &mut world, Hit::area(4));
        crab.defense = 3;
        crab.state.ai_state = HIDDEN;

        ShellStrategy.initialize(&mut crab, &mut world);
        assert_eq!(crab.state.ai_state, SHELL_BROKEN);
        assert_eq!(crab.defense, 0);
    }
}
