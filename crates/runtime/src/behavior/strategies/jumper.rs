//! Hopping creature that charges jumps and pairs up to breed.
//!
//! # Jumping
//!
//! Within vision range every tick has a small chance to start a jump charge.
//! The creature freezes while the compress animation plays, then launches
//! along the away-from-target vector divided by [`JUMP_DIVISOR`]. Slipperiness
//! is raised for the flight and restored once the creature has come to rest.
//!
//! # Mating
//!
//! With `MatingEnabled`, an expired cooldown lets the creature look for an
//! unpaired partner of the same definition. Pairing writes the `mate`
//! reference on both sides in the same tick; both then walk toward each other
//! and the first to arrive spawns one offspring and resets both partners.
//! A partner that died, left the area, or no longer points back clears the
//! pairing.

use bestiary_core::{
    CombatStats, Creature, EffectKind, EntityId, SoundCue, Vec2, World, WorldCommand,
};
use tracing::debug;

use super::{enter_state, tiles};
use crate::behavior::{Behavior, Hit};

pub const GROUNDED: i32 = 0;
pub const CHARGING_JUMP: i32 = 1;
pub const MATING_SEARCH: i32 = 2;
pub const MATING_APPROACH: i32 = 3;

/// Launch velocity is the away-from-target offset divided by this.
pub const JUMP_DIVISOR: f32 = 16.0;
pub const JUMP_SLIPPERINESS: f32 = 10.0;
/// Offspring scale relative to the parents' average.
pub const OFFSPRING_SCALE: f32 = 0.6;
/// Partners closer than this many tiles produce offspring.
pub const MATING_DISTANCE_TILES: f32 = 1.0;

const COMPRESS_FRAMES: usize = 4;
const AIRBORNE_FRAME: usize = 4;

pub const MATE: &str = "mate";
pub const MATE_COOLDOWN: &str = "mate_cooldown";
const AIRBORNE: &str = "airborne";

struct Tuning {
    vision_range: f32,
    jump_chance: f32,
    jump_charge_time: f32,
    mating_enabled: bool,
    mate_cooldown: f32,
    mate_search_radius: f32,
}

impl Tuning {
    fn read(creature: &Creature) -> Self {
        let fields = creature.fields();
        Self {
            vision_range: fields.f32_or("VisionRange", 6.0),
            jump_chance: fields.f32_or("JumpChance", 0.01),
            jump_charge_time: fields.f32_or("JumpChargeTime", 0.5).max(0.0),
            mating_enabled: fields.bool_or("MatingEnabled", false),
            mate_cooldown: fields.f32_or("MateCooldown", 30.0),
            mate_search_radius: fields.f32_or("MateSearchRadius", 4.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JumperStrategy;

impl JumperStrategy {
    /// Drops a pairing whose partner is gone or no longer points back.
    fn validate_mate(&self, creature: &mut Creature, world: &dyn World) {
        if let Some(mate) = creature.state.refs.get(MATE) {
            let points_back = world
                .creature(mate)
                .filter(|partner| partner.is_alive())
                .is_some_and(|partner| partner.state.refs.get(MATE) == Some(creature.id));
            if !points_back {
                debug!(
                    target: "bestiary::monster",
                    entity = %creature.id,
                    mate = %mate,
                    "pairing cleared"
                );
                creature.state.refs.remove(MATE);
            }
        }
        if creature.state.refs.get(MATE).is_none()
            && creature.state.ai_state == MATING_APPROACH
        {
            enter_state(creature, self.key(), GROUNDED);
        }
    }

    /// Nearest eligible partner; ties go to the lower id.
    fn find_partner(
        &self,
        creature: &Creature,
        world: &dyn World,
        radius: f32,
    ) -> Option<EntityId> {
        let mut best: Option<(f32, EntityId)> = None;
        for id in world.creatures_within(creature.position, radius) {
            if id == creature.id {
                continue;
            }
            let Some(other) = world.creature(id) else {
                continue;
            };
            let eligible = other.is_alive()
                && other.state.definition_id == creature.state.definition_id
                && other.state.behavior_key.eq_ignore_ascii_case(&creature.state.behavior_key)
                && other.state.refs.get(MATE).is_none()
                && !other.state.vars.is_running(MATE_COOLDOWN)
                && !other.state.vars.flag(AIRBORNE)
                && matches!(other.state.ai_state, GROUNDED | MATING_SEARCH);
            if !eligible {
                continue;
            }
            let distance = other.position.distance(creature.position);
            let closer = match best {
                None => true,
                Some((best_distance, best_id)) => {
                    distance < best_distance || (distance == best_distance && id < best_id)
                }
            };
            if closer {
                best = Some((distance, id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn update_mating(
        &self,
        creature: &mut Creature,
        world: &mut dyn World,
        tuning: &Tuning,
        elapsed: f32,
    ) -> bool {
        if !tuning.mating_enabled {
            return false;
        }
        creature.state.vars.countdown(MATE_COOLDOWN, elapsed);

        if creature.state.ai_state == MATING_APPROACH {
            let Some(mate) = creature.state.refs.get(MATE) else {
                return false;
            };
            let Some(partner_position) = world.creature(mate).map(|p| p.position) else {
                return false;
            };
            if creature.distance_to(partner_position) <= tiles(world, MATING_DISTANCE_TILES) {
                self.breed(creature, mate, world, tuning);
            } else {
                world.move_toward(creature, partner_position, elapsed);
            }
            return true;
        }

        if creature.state.vars.is_running(MATE_COOLDOWN)
            || !matches!(creature.state.ai_state, GROUNDED | MATING_SEARCH)
        {
            return false;
        }

        let radius = tiles(world, tuning.mate_search_radius);
        match self.find_partner(creature, world, radius) {
            Some(partner) => {
                let Some(other) = world.creature_mut(partner) else {
                    return false;
                };
                other.state.refs.set(MATE, creature.id);
                other.state.ai_state = MATING_APPROACH;
                creature.state.refs.set(MATE, partner);
                enter_state(creature, self.key(), MATING_APPROACH);
                debug!(
                    target: "bestiary::monster",
                    entity = %creature.id,
                    mate = %partner,
                    "paired"
                );
                true
            }
            None => {
                enter_state(creature, self.key(), MATING_SEARCH);
                false
            }
        }
    }

    fn breed(
        &self,
        creature: &mut Creature,
        mate: EntityId,
        world: &mut dyn World,
        tuning: &Tuning,
    ) {
        let Some(partner) = world.creature_mut(mate) else {
            return;
        };
        let mine = creature.current_stats();
        let theirs = partner.current_stats();
        let stats = CombatStats::new(
            (mine.max_health + theirs.max_health) / 2,
            (mine.damage + theirs.damage) / 2,
            (mine.defense + theirs.defense) / 2,
            (mine.experience + theirs.experience) / 2,
            (mine.speed + theirs.speed) / 2.0,
        );
        let scale = (creature.scale + partner.scale) / 2.0 * OFFSPRING_SCALE;
        let position = creature.position.midpoint(partner.position);

        partner.state.refs.remove(MATE);
        partner.state.vars.set(MATE_COOLDOWN, tuning.mate_cooldown);
        partner.state.ai_state = GROUNDED;
        creature.state.refs.remove(MATE);
        creature.state.vars.set(MATE_COOLDOWN, tuning.mate_cooldown);
        enter_state(creature, self.key(), GROUNDED);

        world.push(WorldCommand::SpawnOffspring {
            definition_id: creature.state.definition_id.clone(),
            position,
            scale,
            stats,
        });
        world.push(WorldCommand::VisualEffect {
            kind: EffectKind::Hearts,
            position,
        });
        world.push(WorldCommand::PlaySound {
            cue: SoundCue::Mate,
            position,
        });
    }

    fn launch(&self, creature: &mut Creature, world: &mut dyn World) {
        let away = match world.target() {
            Some(target) => creature.position - target,
            None => Vec2::ZERO,
        };
        creature.velocity = away * (1.0 / JUMP_DIVISOR);
        creature.slipperiness = JUMP_SLIPPERINESS;
        creature.state.vars.set_flag(AIRBORNE, true);
        creature.frame = AIRBORNE_FRAME;
        creature.face_velocity();
        enter_state(creature, self.key(), GROUNDED);
        world.push(WorldCommand::PlaySound {
            cue: SoundCue::Jump,
            position: creature.position,
        });
    }
}

impl Behavior for JumperStrategy {
    fn key(&self) -> &'static str {
        "jumper"
    }

    fn initialize(&self, creature: &mut Creature, _world: &mut dyn World) {
        let tuning = Tuning::read(creature);
        creature.state.vars.set_flag(AIRBORNE, false);
        creature.state.vars.set(MATE_COOLDOWN, tuning.mate_cooldown);
        creature.state.refs.remove(MATE);
    }

    fn update(&self, creature: &mut Creature, world: &mut dyn World, elapsed: f32) {
        let tuning = Tuning::read(creature);
        let ticks = world.config().ticks(elapsed);
        self.validate_mate(creature, world);

        if creature.state.vars.flag(AIRBORNE) {
            if creature.slide(ticks) {
                creature.slipperiness = Creature::DEFAULT_SLIPPERINESS;
                creature.state.vars.set_flag(AIRBORNE, false);
                creature.frame = 0;
            }
            return;
        }

        if creature.state.ai_state == CHARGING_JUMP {
            creature.halt();
            let charge_time = tuning.jump_charge_time.max(f32::EPSILON);
            let progress = 1.0 - creature.state.state_timer / charge_time;
            creature.frame = ((progress.clamp(0.0, 0.999)) * COMPRESS_FRAMES as f32) as usize;
            if creature.state.tick_state_timer(elapsed) || tuning.jump_charge_time <= 0.0 {
                self.launch(creature, world);
            }
            return;
        }

        if self.update_mating(creature, world, &tuning, elapsed) {
            return;
        }

        let Some(target) = world.target_within_tiles(creature.position, tuning.vision_range) else {
            creature.halt();
            return;
        };
        let per_tick = tuning.jump_chance.clamp(0.0, 1.0);
        let chance = 1.0 - (1.0 - per_tick).powf(ticks.max(0.0));
        if world.rng().chance(chance) {
            creature.halt();
            creature.state.state_timer = tuning.jump_charge_time;
            enter_state(creature, self.key(), CHARGING_JUMP);
        } else {
            world.move_toward(creature, target, elapsed);
        }
    }

    fn on_take_damage(&self, creature: &mut Creature, _world: &mut dyn World, hit: Hit) -> i32 {
        if hit.damage > 0 && creature.state.ai_state == CHARGING_JUMP {
            creature.state.state_timer = 0.0;
            creature.frame = 0;
            enter_state(creature, self.key(), GROUNDED);
        }
        hit.damage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::strategies::testing::{TICK, TestWorld, creature};
    use bestiary_core::MonsterDefinition;

    fn slime_definition() -> MonsterDefinition {
        MonsterDefinition::new("Slime")
            .with_behavior("slime")
            .with_stats(CombatStats::new(24, 4, 0, 3, 1.0))
            .with_field("MatingEnabled", true)
            .with_field("JumpChance", 0)
    }

    fn slime(id: u32, position: Vec2, world: &mut TestWorld) -> Creature {
        let mut slime = creature(id, position, slime_definition());
        JumperStrategy.initialize(&mut slime, world);
        slime.state.vars.set(MATE_COOLDOWN, 0.0);
        slime
    }

    #[test]
    fn eligible_pair_is_symmetric_after_one_tick() {
        let mut world = TestWorld::new();
        let partner = slime(8, Vec2::new(128.0, 0.0), &mut world);
        world.others.insert(partner.id, partner);
        let mut slime = slime(7, Vec2::ZERO, &mut world);

        JumperStrategy.update(&mut slime, &mut world, TICK);
        let partner = &world.others[&EntityId(8)];
        assert_eq!(slime.state.refs.get(MATE), Some(EntityId(8)));
        assert_eq!(partner.state.refs.get(MATE), Some(EntityId(7)));
        assert_eq!(slime.state.ai_state, MATING_APPROACH);
        assert_eq!(partner.state.ai_state, MATING_APPROACH);
    }

    #[test]
    fn nearest_partner_wins_with_lower_id_on_ties() {
        let mut world = TestWorld::new();
        for (id, x) in [(12, 100.0), (9, -100.0), (15, 60.0)] {
            let mut other = slime(id, Vec2::new(x, 0.0), &mut world);
            if id == 15 {
                other.state.vars.set(MATE_COOLDOWN, 5.0);
            }
            world.others.insert(other.id, other);
        }
        let mut slime = slime(7, Vec2::ZERO, &mut world);
        JumperStrategy.update(&mut slime, &mut world, TICK);
        assert_eq!(slime.state.refs.get(MATE), Some(EntityId(9)));
    }

    #[test]
    fn other_definitions_are_never_partners() {
        let mut world = TestWorld::new();
        let mut stranger = Creature::new(EntityId(8), "other_Slime", Vec2::new(64.0, 0.0));
        stranger.apply_definition(std::sync::Arc::new(slime_definition()), true);
        world.others.insert(stranger.id, stranger);
        let mut slime = slime(7, Vec2::ZERO, &mut world);
        JumperStrategy.update(&mut slime, &mut world, TICK);
        assert_eq!(slime.state.refs.get(MATE), None);
        assert_eq!(slime.state.ai_state, MATING_SEARCH);
    }

    #[test]
    fn close_partners_breed_once_and_reset() {
        let mut world = TestWorld::new();
        let mut partner = slime(8, Vec2::new(32.0, 0.0), &mut world);
        partner.max_health = 40;
        world.others.insert(partner.id, partner);
        let mut slime = slime(7, Vec2::ZERO, &mut world);

        JumperStrategy.update(&mut slime, &mut world, TICK);
        JumperStrategy.update(&mut slime, &mut world, TICK);

        let offspring: Vec<_> = world
            .commands
            .iter()
            .filter_map(|c| match c {
                WorldCommand::SpawnOffspring { stats, scale, .. } => Some((*stats, *scale)),
                _ => None,
            })
            .collect();
        assert_eq!(offspring.len(), 1);
        assert_eq!(offspring[0].0.max_health, 32);
        assert!((offspring[0].1 - OFFSPRING_SCALE).abs() < 1e-6);

        let partner = &world.others[&EntityId(8)];
        assert_eq!(slime.state.refs.get(MATE), None);
        assert_eq!(partner.state.refs.get(MATE), None);
        assert!(slime.state.vars.is_running(MATE_COOLDOWN));
        assert!(partner.state.vars.is_running(MATE_COOLDOWN));
    }

    #[test]
    fn vanished_partner_clears_pairing() {
        let mut world = TestWorld::new();
        let partner = slime(8, Vec2::new(200.0, 0.0), &mut world);
        world.others.insert(partner.id, partner);
        let mut slime = slime(7, Vec2::ZERO, &mut world);
        JumperStrategy.update(&mut slime, &mut world, TICK);
        assert_eq!(slime.state.ai_state, MATING_APPROACH);

        world.others.remove(&EntityId(8));
        slime.state.vars.set(MATE_COOLDOWN, 10.0);
        JumperStrategy.update(&mut slime, &mut world, TICK);
        assert_eq!(slime.state.refs.get(MATE), None);
        assert_ne!(slime.state.ai_state, MATING_APPROACH);
    }

    #[test]
    fn jump_launches_away_from_target_and_restores_slipperiness() {
        let mut world = TestWorld::new().with_target(Vec2::new(160.0, 0.0));
        let definition = MonsterDefinition::new("Slime").with_field("JumpChance", 1);
        let mut slime = creature(7, Vec2::ZERO, definition);
        JumperStrategy.initialize(&mut slime, &mut world);

        JumperStrategy.update(&mut slime, &mut world, TICK);
        assert_eq!(slime.state.ai_state, CHARGING_JUMP);

        let mut launched = false;
        for _ in 0..40 {
            JumperStrategy.update(&mut slime, &mut world, TICK);
            if slime.slipperiness == JUMP_SLIPPERINESS {
                launched = true;
                assert!(slime.velocity.x < 0.0);
                assert!((slime.velocity.x + 10.0).abs() < 1e-3);
                break;
            }
        }
        assert!(launched);

        for _ in 0..120 {
            JumperStrategy.update(&mut slime, &mut world, TICK);
            if slime.slipperiness == Creature::DEFAULT_SLIPPERINESS {
                break;
            }
        }
        assert_eq!(slime.slipperiness, Creature::DEFAULT_SLIPPERINESS);
        assert!(slime.position.x < 0.0);
    }

    #[test]
    fn damage_cancels_jump_charge() {
        let mut world = TestWorld::new().with_target(Vec2::new(160.0, 0.0));
        let definition = MonsterDefinition::new("Slime").with_field("JumpChance", 1);
        let mut slime = creature(7, Vec2::ZERO, definition);
        JumperStrategy.initialize(&mut slime, &mut world);
        JumperStrategy.update(&mut slime, &mut world, TICK);
        assert_eq!(slime.state.ai_state, CHARGING_JUMP);

        assert_eq!(JumperStrategy.on_take_damage(&mut slime, &mut world, Hit::melee(2)), 2);
        assert_eq!(slime.state.ai_state, GROUNDED);
        assert_eq!(slime.velocity, Vec2::ZERO);
    }
}
