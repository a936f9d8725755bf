//! In-memory host area.
//!
//! [`SimArea`] is a complete, headless host: a tile grid, the live monsters,
//! a target position, and a command queue it drains after every dispatch.
//! Integration tests and the CLI drive the engine through it.
//!
//! # Lending
//!
//! While one monster's hook runs it is removed from the map and handed the
//! area as its [`World`], so it can read and write every other creature but
//! never observe itself through the world.

use std::collections::BTreeMap;

use bestiary_core::{
    AreaDimensions, AreaInfo, AreaMap, Creature, EngineConfig, EntityId, LightCommand, PcgRng,
    RandomSource, TileFlags, TilePos, Vec2, World, WorldCommand,
};
use tracing::debug;

use crate::behavior::Hit;
use crate::engine::Bestiary;
use crate::monster::{DamageOutcome, Monster};

#[derive(Debug)]
pub struct SimArea {
    info: AreaInfo,
    dims: AreaDimensions,
    tiles: Vec<TileFlags>,
    config: EngineConfig,
    target: Option<Vec2>,
    rng: PcgRng,
    monsters: BTreeMap<EntityId, Monster>,
    pending: Vec<WorldCommand>,
    events: Vec<WorldCommand>,
    lights: BTreeMap<String, Vec2>,
    next_id: u32,
    projectiles: usize,
}

impl SimArea {
    /// Area with every tile open.
    pub fn new(info: AreaInfo, width: u32, height: u32, config: EngineConfig, seed: u64) -> Self {
        Self {
            info,
            dims: AreaDimensions::new(width, height),
            tiles: vec![TileFlags::OPEN; width as usize * height as usize],
            config,
            target: None,
            rng: PcgRng::new(seed),
            monsters: BTreeMap::new(),
            pending: Vec::new(),
            events: Vec::new(),
            lights: BTreeMap::new(),
            next_id: 1,
            projectiles: 0,
        }
    }

    fn index(&self, tile: TilePos) -> Option<usize> {
        self.dims
            .contains(tile)
            .then(|| tile.y as usize * self.dims.width as usize + tile.x as usize)
    }

    pub fn set_tile(&mut self, tile: TilePos, flags: TileFlags) {
        if let Some(index) = self.index(tile) {
            self.tiles[index] = flags;
        }
    }

    pub fn set_target(&mut self, target: Option<Vec2>) {
        self.target = target;
    }

    pub fn target_tile(&self) -> TilePos {
        self.target
            .map(|target| TilePos::from_world(target, self.config.tile_size))
            .unwrap_or(TilePos::ORIGIN)
    }

    /// World-space center of `tile`.
    pub fn tile_center(&self, tile: TilePos) -> Vec2 {
        let half = self.config.tile_size / 2.0;
        tile.to_world(self.config.tile_size) + Vec2::new(half, half)
    }

    // ===== population =====

    /// Constructs a monster of `definition_id` at `position`.
    pub fn spawn(&mut self, bestiary: &Bestiary, definition_id: &str, position: Vec2) -> EntityId {
        let id = self.insert(bestiary, definition_id, position);
        self.process_commands(bestiary);
        id
    }

    /// Constructs a monster and leaves its initial commands queued.
    fn insert(&mut self, bestiary: &Bestiary, definition_id: &str, position: Vec2) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let monster = Monster::spawn(id, definition_id, position, bestiary, self);
        self.monsters.insert(id, monster);
        id
    }

    /// Area-entered event: runs the spawn injector and constructs its placements.
    pub fn populate(&mut self, bestiary: &Bestiary) -> Vec<EntityId> {
        let hostiles_present = self.hostile_count() > 0;
        let target = self.target_tile();
        let mut rng = std::mem::take(&mut self.rng);
        let placements = bestiary.injector().populate(
            bestiary.registry(),
            self,
            target,
            hostiles_present,
            &mut rng,
        );
        self.rng = rng;

        placements
            .into_iter()
            .map(|placement| {
                let position = self.tile_center(placement.tile);
                self.spawn(bestiary, &placement.definition_id, position)
            })
            .collect()
    }

    /// Removes a creature without running its death hook. Lights it attached
    /// stay with the area until the host clears them.
    pub fn despawn(&mut self, id: EntityId) -> Option<Monster> {
        self.monsters.remove(&id)
    }

    // ===== lifecycle dispatch =====

    fn lend<R>(&mut self, id: EntityId, f: impl FnOnce(&mut Monster, &mut Self) -> R) -> Option<R> {
        let mut monster = self.monsters.remove(&id)?;
        let result = f(&mut monster, self);
        self.monsters.insert(id, monster);
        Some(result)
    }

    /// One simulation tick for every monster, in id order.
    pub fn tick(&mut self, bestiary: &Bestiary, elapsed: f32) {
        let ids: Vec<EntityId> = self.monsters.keys().copied().collect();
        for id in ids {
            self.lend(id, |monster, area| monster.update(area, elapsed));
            self.process_commands(bestiary);
        }
    }

    pub fn animation_tick(&mut self, bestiary: &Bestiary, elapsed: f32) {
        let ids: Vec<EntityId> = self.monsters.keys().copied().collect();
        for id in ids {
            self.lend(id, |monster, area| monster.animation_tick(area, elapsed));
        }
        self.process_commands(bestiary);
    }

    /// Damage-received event.
    pub fn damage(&mut self, bestiary: &Bestiary, id: EntityId, hit: Hit) -> Option<DamageOutcome> {
        let outcome = self.lend(id, |monster, area| monster.take_damage(area, hit));
        self.process_commands(bestiary);
        outcome
    }

    /// Entity-field-changed event for a replicated definition id.
    pub fn set_definition_id(&mut self, bestiary: &Bestiary, id: EntityId, definition_id: &str) {
        self.lend(id, |monster, area| {
            monster.set_definition_id(definition_id, bestiary, area)
        });
        self.process_commands(bestiary);
    }

    /// Drains queued commands until none remain, applying the ones the area models.
    /// Commands raised while applying a batch (an offspring's own setup) land
    /// in the next batch, after the command that caused them.
    pub fn process_commands(&mut self, bestiary: &Bestiary) {
        while !self.pending.is_empty() {
            let batch = std::mem::take(&mut self.pending);
            for command in batch {
                self.apply(bestiary, &command);
                self.events.push(command);
            }
        }
    }

    fn apply(&mut self, bestiary: &Bestiary, command: &WorldCommand) {
        match command {
            WorldCommand::Light(LightCommand::Attach { key, position, .. }) => {
                self.lights.insert(key.clone(), *position);
            }
            WorldCommand::Light(LightCommand::Move { key, position }) => {
                if let Some(slot) = self.lights.get_mut(key) {
                    *slot = *position;
                }
            }
            WorldCommand::Light(LightCommand::Remove { key }) => {
                self.lights.remove(key);
            }
            WorldCommand::SpawnProjectile { .. } => self.projectiles += 1,
            WorldCommand::SpawnOffspring {
                definition_id,
                position,
                scale,
                stats,
            } => {
                let id = self.insert(bestiary, definition_id, *position);
                if let Some(monster) = self.monsters.get_mut(&id) {
                    let creature = monster.creature_mut();
                    creature.apply_stats(*stats);
                    creature.scale = *scale;
                }
                debug!(
                    target: "bestiary::monster",
                    entity = %id,
                    definition = %definition_id,
                    "offspring spawned"
                );
            }
            WorldCommand::Died { entity, .. } => {
                self.monsters.remove(entity);
            }
            WorldCommand::PlaySound { .. }
            | WorldCommand::VisualEffect { .. }
            | WorldCommand::DropItem { .. }
            | WorldCommand::HitReaction { .. } => {}
        }
    }

    // ===== inspection =====

    pub fn monster(&self, id: EntityId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    pub fn monster_mut(&mut self, id: EntityId) -> Option<&mut Monster> {
        self.monsters.get_mut(&id)
    }

    pub fn monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn hostile_count(&self) -> usize {
        self.monsters
            .values()
            .filter(|monster| monster.creature().is_alive())
            .count()
    }

    /// Every command processed so far, in order.
    pub fn events(&self) -> &[WorldCommand] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<WorldCommand> {
        std::mem::take(&mut self.events)
    }

    pub fn lights(&self) -> &BTreeMap<String, Vec2> {
        &self.lights
    }

    pub fn projectiles_fired(&self) -> usize {
        self.projectiles
    }
}

impl World for SimArea {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn target(&self) -> Option<Vec2> {
        self.target
    }

    fn rng(&mut self) -> &mut dyn RandomSource {
        &mut self.rng
    }

    fn creature(&self, id: EntityId) -> Option<&Creature> {
        self.monsters.get(&id).map(Monster::creature)
    }

    fn creature_mut(&mut self, id: EntityId) -> Option<&mut Creature> {
        self.monsters.get_mut(&id).map(Monster::creature_mut)
    }

    fn creatures_within(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        self.monsters
            .values()
            .map(Monster::creature)
            .filter(|creature| creature.is_alive() && creature.distance_to(center) <= radius)
            .map(|creature| creature.id)
            .collect()
    }

    fn push(&mut self, command: WorldCommand) {
        self.pending.push(command);
    }
}

impl AreaMap for SimArea {
    fn info(&self) -> &AreaInfo {
        &self.info
    }

    fn dimensions(&self) -> AreaDimensions {
        self.dims
    }

    /// Static flags plus `OCCUPIED` wherever a live creature stands.
    fn tile_flags(&self, tile: TilePos) -> TileFlags {
        let Some(index) = self.index(tile) else {
            return TileFlags::empty();
        };
        let mut flags = self.tiles[index];
        let tile_size = self.config.tile_size;
        if self.monsters.values().any(|monster| {
            monster.creature().is_alive()
                && TilePos::from_world(monster.creature().position, tile_size) == tile
        }) {
            flags |= TileFlags::OCCUPIED;
        }
        flags
    }
}
