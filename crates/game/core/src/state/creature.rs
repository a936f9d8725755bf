//! The live body of one creature: kinematics, combat numbers, and runtime state.

use std::sync::Arc;

use crate::definition::{CombatStats, CustomFields, MonsterDefinition};
use crate::geometry::{Facing, Vec2};

use super::{EntityId, RuntimeState};

/// Mutable per-instance data of a creature living in the host world.
///
/// Strategies receive `&mut Creature` for the entity they drive and may look
/// up other creatures through the world. The definition is shared, never
/// mutated; (re)loading swaps the whole `Arc`.
#[derive(Clone, Debug)]
pub struct Creature {
    pub id: EntityId,
    pub name: String,
    pub position: Vec2,
    /// Pixels per simulation tick.
    pub velocity: Vec2,
    pub facing: Facing,
    /// Sprite-sheet frame index chosen by the strategy.
    pub frame: usize,
    pub scale: f32,
    pub visible: bool,
    pub health: i32,
    pub max_health: i32,
    /// Damage dealt to the target on contact; strategies zero it while harmless.
    pub contact_damage: i32,
    pub defense: i32,
    pub experience: i32,
    /// Pixels per simulation tick.
    pub speed: f32,
    /// Ground friction divisor; higher values slide further.
    pub slipperiness: f32,
    definition: Arc<MonsterDefinition>,
    pub state: RuntimeState,
}

impl Creature {
    pub const DEFAULT_SLIPPERINESS: f32 = 2.0;
    /// Velocities below this magnitude snap to rest under friction.
    pub const REST_EPSILON: f32 = 0.1;

    /// Creates a creature bound to `definition_id` with placeholder stats.
    ///
    /// Health starts at zero so the first load treats it as a fresh spawn.
    pub fn new(id: EntityId, definition_id: impl Into<String>, position: Vec2) -> Self {
        let definition = Arc::new(MonsterDefinition::default());
        Self {
            id,
            name: String::new(),
            position,
            velocity: Vec2::ZERO,
            facing: Facing::default(),
            frame: 0,
            scale: 1.0,
            visible: true,
            health: 0,
            max_health: 0,
            contact_damage: 0,
            defense: 0,
            experience: 0,
            speed: 0.0,
            slipperiness: Self::DEFAULT_SLIPPERINESS,
            definition,
            state: RuntimeState::new(definition_id),
        }
    }

    pub fn definition(&self) -> &MonsterDefinition {
        &self.definition
    }

    pub fn definition_arc(&self) -> &Arc<MonsterDefinition> {
        &self.definition
    }

    pub fn fields(&self) -> &CustomFields {
        &self.definition.custom_fields
    }

    /// Baseline stats of the loaded definition.
    pub fn base_stats(&self) -> CombatStats {
        self.definition.stats.sanitized()
    }

    /// Copies definition data onto this creature.
    ///
    /// Resets the machine (AI state and state timer) and reinstates every stat.
    /// Health is set to max only when `fresh` or when the current value is
    /// invalid (non-positive or above the new maximum); a live creature that is
    /// re-synchronized mid-fight keeps its wounds.
    pub fn apply_definition(&mut self, definition: Arc<MonsterDefinition>, fresh: bool) {
        let stats = definition.stats.sanitized();
        self.name = definition.name.clone();
        self.max_health = stats.max_health;
        self.contact_damage = stats.damage;
        self.defense = stats.defense;
        self.experience = stats.experience;
        self.speed = stats.speed;
        self.slipperiness = Self::DEFAULT_SLIPPERINESS;
        self.visible = true;
        self.frame = 0;
        if fresh || self.health <= 0 || self.health > self.max_health {
            self.health = self.max_health;
        }
        self.definition = definition;
        self.state.behavior_key = self.definition.behavior.trim().to_owned();
        self.state.reset_machine();
    }

    /// Overrides the combat numbers without touching the definition, e.g. for
    /// offspring whose stats are derived from their parents. Health is refilled.
    pub fn apply_stats(&mut self, stats: CombatStats) {
        let stats = stats.sanitized();
        self.max_health = stats.max_health;
        self.health = stats.max_health;
        self.contact_damage = stats.damage;
        self.defense = stats.defense;
        self.experience = stats.experience;
        self.speed = stats.speed;
    }

    /// Current combat numbers as a stat block.
    pub fn current_stats(&self) -> CombatStats {
        CombatStats::new(
            self.max_health,
            self.contact_damage,
            self.defense,
            self.experience,
            self.speed,
        )
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.position.distance(point)
    }

    /// Stops all motion.
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn face_toward(&mut self, point: Vec2) {
        self.facing = Facing::from_velocity(point - self.position, self.facing);
    }

    /// Updates the facing from the current velocity.
    pub fn face_velocity(&mut self) {
        self.facing = Facing::from_velocity(self.velocity, self.facing);
    }

    /// Moves toward `destination` at `speed` px/tick for `ticks` ticks without
    /// overshooting. Velocity and facing follow the motion.
    pub fn step_toward(&mut self, destination: Vec2, speed: f32, ticks: f32) {
        let offset = destination - self.position;
        let distance = offset.length();
        let reach = speed * ticks;
        if distance <= f32::EPSILON || reach <= 0.0 {
            self.halt();
            return;
        }
        self.velocity = offset.normalized() * speed;
        self.face_velocity();
        if reach >= distance {
            self.position = destination;
        } else {
            self.position += offset.normalized() * reach;
        }
    }

    /// Integrates velocity over `ticks` ticks.
    pub fn integrate(&mut self, ticks: f32) {
        self.position += self.velocity * ticks;
    }

    /// Integrates velocity then decays it by slipperiness.
    ///
    /// Returns true once the creature is at rest.
    pub fn slide(&mut self, ticks: f32) -> bool {
        self.integrate(ticks);
        let slip = self.slipperiness.max(1.0);
        let keep = (1.0 - 1.0 / slip).max(0.0).powf(ticks.max(0.0));
        self.velocity = self.velocity * keep;
        if self.velocity.length() < Self::REST_EPSILON {
            self.halt();
            true
        } else {
            false
        }
    }

    /// Sprite frame within the current facing row, for four-frame walk cycles.
    pub fn walk_frame(&self, cycle: f32) -> usize {
        self.facing.row() * 4 + (cycle.max(0.0) as usize % 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(max_health: i32) -> Arc<MonsterDefinition> {
        Arc::new(
            MonsterDefinition::new("Imp")
                .with_behavior(" Bat ")
                .with_stats(CombatStats::new(max_health, 5, 1, 3, 2.0)),
        )
    }

    #[test]
    fn fresh_load_fills_health_and_caches_behavior_key() {
        let mut creature = Creature::new(EntityId(1), "imp", Vec2::ZERO);
        creature.apply_definition(definition(40), true);
        assert_eq!(creature.health, 40);
        assert_eq!(creature.contact_damage, 5);
        assert_eq!(creature.state.behavior_key, "Bat");
    }

    #[test]
    fn resync_never_heals_a_wounded_creature() {
        let mut creature = Creature::new(EntityId(1), "imp", Vec2::ZERO);
        creature.apply_definition(definition(40), true);
        creature.health = 12;
        creature.state.ai_state = 2;
        creature.state.state_timer = 1.0;

        creature.apply_definition(definition(40), false);
        assert_eq!(creature.health, 12);
        assert_eq!(creature.state.ai_state, 0);
        assert_eq!(creature.state.state_timer, 0.0);
    }

    #[test]
    fn resync_clamps_health_above_new_maximum() {
        let mut creature = Creature::new(EntityId(1), "imp", Vec2::ZERO);
        creature.apply_definition(definition(40), true);
        creature.apply_definition(definition(25), false);
        assert_eq!(creature.health, 25);
    }

    #[test]
    fn step_toward_never_overshoots() {
        let mut creature = Creature::new(EntityId(1), "imp", Vec2::ZERO);
        creature.step_toward(Vec2::new(3.0, 0.0), 2.0, 5.0);
        assert_eq!(creature.position, Vec2::new(3.0, 0.0));
        assert_eq!(creature.facing, Facing::Right);
    }

    #[test]
    fn slide_comes_to_rest() {
        let mut creature = Creature::new(EntityId(1), "imp", Vec2::ZERO);
        creature.velocity = Vec2::new(4.0, 0.0);
        let mut rested = false;
        for _ in 0..20 {
            rested = creature.slide(1.0);
            if rested {
                break;
            }
        }
        assert!(rested);
        assert_eq!(creature.velocity, Vec2::ZERO);
        assert!(creature.position.x > 4.0);
    }
}
