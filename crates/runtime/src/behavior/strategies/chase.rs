//! Default strategy: walk toward the target while it is in range.

use bestiary_core::{Creature, World};

use super::{advance_cycle, enter_state, tiles};
use crate::behavior::{Behavior, Hit};

pub const IDLE: i32 = 0;
pub const PURSUING: i32 = 1;

const DETECTION_RANGE: &str = "DetectionRange";
const DEFAULT_DETECTION_RANGE: f32 = 8.0;
/// Set once the creature has been hit; pursuit then ignores range.
const AGGRO: &str = "aggro";

/// Registered as `default` and `stalker`; resolved for every unknown key.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaseStrategy;

impl Behavior for ChaseStrategy {
    fn key(&self) -> &'static str {
        "chase"
    }

    fn update(&self, creature: &mut Creature, world: &mut dyn World, elapsed: f32) {
        let Some(target) = world.target() else {
            creature.halt();
            enter_state(creature, self.key(), IDLE);
            return;
        };

        let detection = creature
            .fields()
            .f32_or(DETECTION_RANGE, DEFAULT_DETECTION_RANGE);
        let range = tiles(world, detection);
        let forced = creature.state.vars.flag(AGGRO);
        if forced || creature.distance_to(target) <= range {
            enter_state(creature, self.key(), PURSUING);
            world.move_toward(creature, target, elapsed);
            let ticks = world.config().ticks(elapsed);
            let cycle = advance_cycle(creature, 0.1, ticks);
            creature.frame = creature.walk_frame(cycle);
        } else if creature.state.ai_state == PURSUING {
            creature.halt();
            enter_state(creature, self.key(), IDLE);
        }
    }

    fn on_take_damage(&self, creature: &mut Creature, _world: &mut dyn World, hit: Hit) -> i32 {
        if hit.damage > 0 {
            creature.state.vars.set_flag(AGGRO, true);
        }
        hit.damage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::strategies::testing::{TICK, TestWorld, creature};
    use bestiary_core::{MonsterDefinition, Vec2};

    fn stalker(position: Vec2) -> Creature {
        creature(1, position, MonsterDefinition::new("Stalker").with_field(DETECTION_RANGE, 2))
    }

    #[test]
    fn pursues_only_within_detection_range() {
        let mut world = TestWorld::new().with_target(Vec2::new(1000.0, 0.0));
        let mut imp = stalker(Vec2::ZERO);
        ChaseStrategy.update(&mut imp, &mut world, TICK);
        assert_eq!(imp.state.ai_state, IDLE);
        assert_eq!(imp.position, Vec2::ZERO);

        world.target = Some(Vec2::new(100.0, 0.0));
        ChaseStrategy.update(&mut imp, &mut world, TICK);
        assert_eq!(imp.state.ai_state, PURSUING);
        assert!(imp.position.x > 0.0);
    }

    #[test]
    fn leaving_range_halts_pursuit() {
        let mut world = TestWorld::new().with_target(Vec2::new(100.0, 0.0));
        let mut imp = stalker(Vec2::ZERO);
        ChaseStrategy.update(&mut imp, &mut world, TICK);
        world.target = Some(Vec2::new(5000.0, 0.0));
        ChaseStrategy.update(&mut imp, &mut world, TICK);
        assert_eq!(imp.state.ai_state, IDLE);
        assert_eq!(imp.velocity, Vec2::ZERO);
    }

    #[test]
    fn damage_forces_pursuit_out_of_range() {
        let mut world = TestWorld::new().with_target(Vec2::new(5000.0, 0.0));
        let mut imp = stalker(Vec2::ZERO);
        assert_eq!(ChaseStrategy.on_take_damage(&mut imp, &mut world, Hit::melee(4)), 4);
        ChaseStrategy.update(&mut imp, &mut world, TICK);
        assert_eq!(imp.state.ai_state, PURSUING);
        assert!(imp.position.x > 0.0);
    }
}
