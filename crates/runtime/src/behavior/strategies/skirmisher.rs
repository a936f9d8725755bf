//! Ranged attacker firing projectile bursts.

use bestiary_core::{Creature, SoundCue, Vec2, World, WorldCommand};

use super::{advance_cycle, enter_state, tiles};
use crate::behavior::{Behavior, Hit};

pub const MOVING: i32 = 0;
pub const AIMING: i32 = 1;
pub const FIRING: i32 = 2;
pub const BURST_COOLDOWN: i32 = 3;

const BURST_LEFT: &str = "burst_left";
/// Minimum delay after being hit before the next shot.
const RECOVERY: &str = "recovery";

struct Tuning {
    attack_range: f32,
    aim_delay: f32,
    burst_count: u32,
    burst_interval: f32,
    burst_cooldown: f32,
    projectile_speed: f32,
    projectile_damage: i32,
}

impl Tuning {
    fn read(creature: &Creature) -> Self {
        let fields = creature.fields();
        Self {
            attack_range: fields.f32_or("AttackRange", 6.0),
            aim_delay: fields.f32_or("AimDelay", 0.75),
            burst_count: fields.u32_or("BurstCount", 3).max(1),
            burst_interval: fields.f32_or("BurstInterval", 0.25),
            burst_cooldown: fields.f32_or("BurstCooldown", 2.5),
            projectile_speed: fields.f32_or("ProjectileSpeed", 8.0),
            projectile_damage: fields.i32_or("ProjectileDamage", creature.contact_damage),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SkirmisherStrategy;

impl SkirmisherStrategy {
    /// Fires one shot and re-arms for the next shot or the burst cooldown.
    fn fire(&self, creature: &mut Creature, world: &mut dyn World, tuning: &Tuning) {
        let direction = match world.target() {
            Some(target) => (target - creature.position).normalized(),
            None => facing_vector(creature),
        };
        creature.face_toward(creature.position + direction);
        world.push(WorldCommand::SpawnProjectile {
            owner: creature.id,
            origin: creature.position,
            velocity: direction * tuning.projectile_speed,
            damage: tuning.projectile_damage,
        });
        world.push(WorldCommand::PlaySound {
            cue: SoundCue::Shoot,
            position: creature.position,
        });

        let left = creature.state.vars.get(BURST_LEFT) - 1.0;
        if left > 0.0 {
            creature.state.vars.set(BURST_LEFT, left);
            creature.state.state_timer = tuning.burst_interval;
            enter_state(creature, self.key(), FIRING);
        } else {
            creature.state.vars.remove(BURST_LEFT);
            creature.state.state_timer = tuning.burst_cooldown;
            enter_state(creature, self.key(), BURST_COOLDOWN);
        }
    }
}

fn facing_vector(creature: &Creature) -> Vec2 {
    use bestiary_core::Facing;
    match creature.facing {
        Facing::Up => Vec2::new(0.0, -1.0),
        Facing::Right => Vec2::new(1.0, 0.0),
        Facing::Down => Vec2::new(0.0, 1.0),
        Facing::Left => Vec2::new(-1.0, 0.0),
    }
}

impl Behavior for SkirmisherStrategy {
    fn key(&self) -> &'static str {
        "skirmisher"
    }

    fn initialize(&self, creature: &mut Creature, _world: &mut dyn World) {
        creature.state.vars.remove(BURST_LEFT);
        creature.state.vars.remove(RECOVERY);
    }

    fn update(&self, creature: &mut Creature, world: &mut dyn World, elapsed: f32) {
        let tuning = Tuning::read(creature);
        creature.state.vars.countdown(RECOVERY, elapsed);

        match creature.state.ai_state {
            AIMING => {
                if let Some(target) = world.target() {
                    creature.face_toward(target);
                }
                if creature.state.tick_state_timer(elapsed) {
                    creature.state.vars.set(BURST_LEFT, tuning.burst_count as f32);
                    self.fire(creature, world, &tuning);
                }
            }
            FIRING => {
                if creature.state.tick_state_timer(elapsed) {
                    self.fire(creature, world, &tuning);
                }
            }
            BURST_COOLDOWN => {
                if creature.state.tick_state_timer(elapsed) {
                    enter_state(creature, self.key(), MOVING);
                }
            }
            _ => {
                let Some(target) = world.target() else {
                    creature.halt();
                    return;
                };
                let range = tiles(world, tuning.attack_range);
                let recovering = creature.state.vars.is_running(RECOVERY);
                if creature.distance_to(target) <= range && !recovering {
                    creature.halt();
                    creature.face_toward(target);
                    creature.state.state_timer = tuning.aim_delay;
                    enter_state(creature, self.key(), AIMING);
                } else {
                    world.move_toward(creature, target, elapsed);
                    let ticks = world.config().ticks(elapsed);
                    let cycle = advance_cycle(creature, 0.1, ticks);
                    creature.frame = creature.walk_frame(cycle);
                }
            }
        }
    }

    fn on_take_damage(&self, creature: &mut Creature, _world: &mut dyn World, hit: Hit) -> i32 {
        if hit.damage <= 0 {
            return hit.damage;
        }
        if matches!(creature.state.ai_state, AIMING | FIRING) {
            creature.state.vars.remove(BURST_LEFT);
            creature.state.state_timer = 0.0;
            enter_state(creature, self.key(), MOVING);
        }
        let recovery = creature.fields().f32_or("HitRecovery", 1.0);
        creature.state.vars.set(RECOVERY, recovery);
        hit.damage
    }
}
