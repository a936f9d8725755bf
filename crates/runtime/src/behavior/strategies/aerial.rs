//! Flying evader with an optional charge attack.
//!
//! Two sub-machines run side by side. Being hit starts a flee timer during
//! which the heading (kept in `scratch_float`) spirals away from the target,
//! with the turning direction latched by a hysteresis band in `scratch_flag`.
//! Independently, a charge cycles through wind-up, charging, and deceleration;
//! while any charge phase is active normal flight is suppressed.

use std::f32::consts::{FRAC_PI_8, PI, TAU};

use bestiary_core::{Creature, SoundCue, Vec2, World, WorldCommand, angle_delta, wrap_angle};

use super::{advance_cycle, enter_state};
use crate::behavior::{Behavior, Hit};

pub const CRUISING: i32 = 0;
pub const SPIRAL_FLEE: i32 = 1;
pub const CHARGE_WINDUP: i32 = 2;
pub const CHARGING: i32 = 3;
pub const DECELERATING: i32 = 4;

/// Heading change per simulation tick.
pub const TURN_STEP: f32 = PI / 64.0;
/// Above this delta the flee turn reverses direction.
pub const REVERSE_THRESHOLD: f32 = 7.0 * PI / 8.0;
/// Below this delta the turn locks back onto the desired heading.
pub const LOCK_THRESHOLD: f32 = FRAC_PI_8;
/// Velocity kept per tick while decelerating after a charge.
pub const DECELERATION: f32 = 0.9;

const FLEE: &str = "flee";
const CHARGE_COOLDOWN: &str = "charge_cooldown";

struct Tuning {
    flee_duration: f32,
    charge_enabled: bool,
    charge_range: f32,
    charge_speed: f32,
    charge_windup: f32,
    charge_duration: f32,
    charge_cooldown: f32,
}

impl Tuning {
    fn read(creature: &Creature) -> Self {
        let fields = creature.fields();
        Self {
            flee_duration: fields.f32_or("FleeDuration", 1.5),
            charge_enabled: fields.bool_or("ChargeEnabled", false),
            charge_range: fields.f32_or("ChargeRange", 5.0),
            charge_speed: fields.f32_or("ChargeSpeed", 10.0),
            charge_windup: fields.f32_or("ChargeWindup", 0.6),
            charge_duration: fields.f32_or("ChargeDuration", 0.5),
            charge_cooldown: fields.f32_or("ChargeCooldown", 4.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AerialStrategy;

impl AerialStrategy {
    /// Runs the charge sub-machine. Returns true if it owns movement this tick.
    fn update_charge(
        &self,
        creature: &mut Creature,
        world: &mut dyn World,
        tuning: &Tuning,
        elapsed: f32,
        ticks: f32,
    ) -> bool {
        match creature.state.ai_state {
            CHARGE_WINDUP => {
                creature.velocity = creature.velocity * DECELERATION.powf(ticks);
                if creature.state.tick_state_timer(elapsed) {
                    let heading = match world.target() {
                        Some(target) => (target - creature.position).normalized(),
                        None => Vec2::from_angle(creature.state.scratch_float),
                    };
                    creature.velocity = heading * tuning.charge_speed;
                    creature.face_velocity();
                    creature.state.state_timer = tuning.charge_duration;
                    enter_state(creature, self.key(), CHARGING);
                    world.push(WorldCommand::PlaySound {
                        cue: SoundCue::Charge,
                        position: creature.position,
                    });
                }
                true
            }
            CHARGING => {
                creature.integrate(ticks);
                if creature.state.tick_state_timer(elapsed) {
                    enter_state(creature, self.key(), DECELERATING);
                }
                true
            }
            DECELERATING => {
                creature.integrate(ticks);
                creature.velocity = creature.velocity * DECELERATION.powf(ticks);
                if creature.velocity.length() < Creature::REST_EPSILON {
                    creature.halt();
                    creature.state.vars.set(CHARGE_COOLDOWN, tuning.charge_cooldown);
                    enter_state(creature, self.key(), CRUISING);
                }
                true
            }
            _ => {
                creature.state.vars.countdown(CHARGE_COOLDOWN, elapsed);
                if !tuning.charge_enabled || creature.state.vars.is_running(CHARGE_COOLDOWN) {
                    return false;
                }
                if world
                    .target_within_tiles(creature.position, tuning.charge_range)
                    .is_some()
                {
                    creature.state.state_timer = tuning.charge_windup;
                    enter_state(creature, self.key(), CHARGE_WINDUP);
                    return true;
                }
                false
            }
        }
    }

    /// Steers the heading toward (or, while fleeing, away from) the target.
    fn steer(&self, creature: &mut Creature, target: Option<Vec2>, fleeing: bool, ticks: f32) {
        let rotation = creature.state.scratch_float;
        let Some(target) = target else {
            return;
        };
        let mut desired = (target - creature.position).angle();
        if fleeing {
            desired += PI;
        }
        let delta = angle_delta(rotation, desired);
        let step = TURN_STEP * ticks;

        let next = if fleeing {
            if delta.abs() > REVERSE_THRESHOLD {
                creature.state.scratch_flag = true;
            } else if delta.abs() < LOCK_THRESHOLD {
                creature.state.scratch_flag = false;
            }
            if creature.state.scratch_flag {
                rotation - delta.signum() * step
            } else {
                rotation + delta.signum() * step
            }
        } else {
            creature.state.scratch_flag = false;
            rotation + delta.signum() * step.min(delta.abs())
        };
        creature.state.scratch_float = wrap_angle(next);
    }
}

impl Behavior for AerialStrategy {
    fn key(&self) -> &'static str {
        "aerial"
    }

    fn initialize(&self, creature: &mut Creature, world: &mut dyn World) {
        creature.state.scratch_float = world.rng().range_f32(0.0, TAU);
        creature.state.scratch_flag = false;
    }

    fn update(&self, creature: &mut Creature, world: &mut dyn World, elapsed: f32) {
        let tuning = Tuning::read(creature);
        let ticks = world.config().ticks(elapsed);
        let fleeing = {
            creature.state.vars.countdown(FLEE, elapsed);
            creature.state.vars.is_running(FLEE)
        };

        if self.update_charge(creature, world, &tuning, elapsed, ticks) {
            return;
        }

        self.steer(creature, world.target(), fleeing, ticks);
        creature.velocity = Vec2::from_angle(creature.state.scratch_float) * creature.speed;
        creature.integrate(ticks);
        creature.face_velocity();
        let cycle = advance_cycle(creature, 0.25, ticks);
        creature.frame = creature.walk_frame(cycle);
        enter_state(
            creature,
            self.key(),
            if fleeing { SPIRAL_FLEE } else { CRUISING },
        );
    }

    fn on_take_damage(&self, creature: &mut Creature, _world: &mut dyn World, hit: Hit) -> i32 {
        if hit.damage > 0 {
            let duration = creature.fields().f32_or("FleeDuration", 1.5);
            creature.state.vars.set(FLEE, duration);
        }
        hit.damage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::strategies::testing::{TICK, TestWorld, creature};
    use bestiary_core::MonsterDefinition;

    fn bat(definition: MonsterDefinition) -> (Creature, TestWorld) {
        let mut world = TestWorld::new().with_target(Vec2::new(640.0, 0.0));
        let mut bat = creature(1, Vec2::ZERO, definition);
        AerialStrategy.initialize(&mut bat, &mut world);
        (bat, world)
    }

    #[test]
    fn cruising_turns_toward_target_by_fixed_step() {
        let (mut bat, mut world) = bat(MonsterDefinition::new("Bat"));
        bat.state.scratch_float = PI / 2.0;
        AerialStrategy.update(&mut bat, &mut world, TICK);
        assert!((bat.state.scratch_float - (PI / 2.0 - TURN_STEP)).abs() < 1e-4);
        assert_eq!(bat.state.ai_state, CRUISING);
    }

    #[test]
    fn damage_starts_spiral_flee_with_hysteresis() {
        let (mut bat, mut world) = bat(MonsterDefinition::new("Bat"));
        // facing the target: the flee heading is a half turn away
        bat.state.scratch_float = 0.0;
        AerialStrategy.on_take_damage(&mut bat, &mut world, Hit::melee(3));
        AerialStrategy.update(&mut bat, &mut world, TICK);
        assert_eq!(bat.state.ai_state, SPIRAL_FLEE);
        assert!(bat.state.scratch_flag);

        for _ in 0..120 {
            AerialStrategy.update(&mut bat, &mut world, TICK);
        }
        assert_eq!(bat.state.ai_state, CRUISING);
        assert!(!bat.state.scratch_flag);
    }

    fn run_until(bat: &mut Creature, world: &mut TestWorld, state: i32) {
        for _ in 0..30 {
            AerialStrategy.update(bat, world, TICK);
            if bat.state.ai_state == state {
                return;
            }
        }
        panic!("state {state} not reached, stuck in {}", bat.state.ai_state);
    }

    #[test]
    fn charge_runs_windup_charge_and_deceleration() {
        let definition = MonsterDefinition::new("Bat")
            .with_field("ChargeEnabled", true)
            .with_field("ChargeWindup", 0.1)
            .with_field("ChargeDuration", 0.1)
            .with_field("ChargeCooldown", 2);
        let (mut bat, mut world) = bat(definition);
        world.target = Some(Vec2::new(128.0, 0.0));

        AerialStrategy.update(&mut bat, &mut world, TICK);
        assert_eq!(bat.state.ai_state, CHARGE_WINDUP);

        run_until(&mut bat, &mut world, CHARGING);
        assert!((bat.velocity.x - 10.0).abs() < 1e-3);
        let heading_before = bat.state.scratch_float;

        run_until(&mut bat, &mut world, DECELERATING);
        // charging suppresses normal steering
        assert_eq!(bat.state.scratch_float, heading_before);

        for _ in 0..120 {
            AerialStrategy.update(&mut bat, &mut world, TICK);
            if bat.state.ai_state != DECELERATING {
                break;
            }
        }
        assert_ne!(bat.state.ai_state, DECELERATING);
        assert!(bat.state.vars.get(CHARGE_COOLDOWN) > 0.0);
    }

    #[test]
    fn charge_disabled_by_default() {
        let (mut bat, mut world) = bat(MonsterDefinition::new("Bat"));
        world.target = Some(Vec2::new(64.0, 0.0));
        for _ in 0..30 {
            AerialStrategy.update(&mut bat, &mut world, TICK);
            assert!(bat.state.ai_state <= SPIRAL_FLEE);
        }
    }
}
