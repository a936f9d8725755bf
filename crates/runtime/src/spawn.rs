//! Spawn injector: populates a freshly entered tiered area with registered creatures.

use bestiary_core::{AreaMap, RandomSource, SpawnConfig, TilePos};
use tracing::debug;

use crate::registry::DefinitionRegistry;

/// One creature the injector decided to place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnPlacement {
    pub definition_id: String,
    pub tile: TilePos,
    /// Zero-based wave that produced this placement.
    pub wave: u32,
}

#[derive(Clone, Debug, Default)]
pub struct SpawnInjector {
    config: SpawnConfig,
}

impl SpawnInjector {
    pub fn new(config: SpawnConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// Handles an "entered new area" event.
    ///
    /// Only tiered areas are populated. When the area already holds a hostile,
    /// the attempt proceeds only with the configured repopulate chance. Each of
    /// the 1..=`max_waves` waves rolls every candidate independently against its
    /// spawn weight; candidates are visited in sorted id order. A success whose
    /// placement search fails is skipped.
    pub fn populate(
        &self,
        registry: &DefinitionRegistry,
        area: &dyn AreaMap,
        target: TilePos,
        hostiles_present: bool,
        rng: &mut dyn RandomSource,
    ) -> Vec<SpawnPlacement> {
        let info = area.info();
        let Some(tier) = info.tier() else {
            return Vec::new();
        };
        if hostiles_present && !rng.chance(self.config.repopulate_chance) {
            debug!(target: "bestiary::spawn", area = %info.name, "area already populated");
            return Vec::new();
        }

        let candidates = self.candidates(registry, &info.name, tier);
        if candidates.is_empty() {
            return Vec::new();
        }

        let waves = rng.range_i32(1, self.config.max_waves.max(1) as i32) as u32;
        let mut placements: Vec<SpawnPlacement> = Vec::new();
        for wave in 0..waves {
            for (id, weight) in &candidates {
                if !rng.chance(*weight) {
                    continue;
                }
                let taken: Vec<TilePos> = placements.iter().map(|p| p.tile).collect();
                match self.find_placement(area, target, &taken, rng) {
                    Some(tile) => placements.push(SpawnPlacement {
                        definition_id: (*id).to_owned(),
                        tile,
                        wave,
                    }),
                    None => {
                        debug!(target: "bestiary::spawn", id, wave, "no valid tile, skipped");
                    }
                }
            }
        }

        debug!(
            target: "bestiary::spawn",
            area = %info.name,
            tier,
            waves,
            placed = placements.len(),
            "populated area"
        );
        placements
    }

    /// Registered ids whose spawn rule admits `tier` and the area name, sorted.
    pub fn candidates<'a>(
        &self,
        registry: &'a DefinitionRegistry,
        area_name: &str,
        tier: i32,
    ) -> Vec<(&'a str, f32)> {
        registry
            .sorted_ids()
            .into_iter()
            .filter_map(|id| {
                let spawn = &registry.get(id)?.definition().spawn;
                (spawn.allows_tier(tier) && spawn.allows_location(area_name))
                    .then_some((id, spawn.spawn_weight))
            })
            .collect()
    }

    /// Samples up to `placement_attempts` tiles and returns the first valid one.
    pub fn find_placement(
        &self,
        area: &dyn AreaMap,
        target: TilePos,
        taken: &[TilePos],
        rng: &mut dyn RandomSource,
    ) -> Option<TilePos> {
        let dims = area.dimensions();
        if dims.width == 0 || dims.height == 0 {
            return None;
        }
        (0..self.config.placement_attempts).find_map(|_| {
            let tile = TilePos::new(
                rng.range_i32(0, dims.width as i32 - 1),
                rng.range_i32(0, dims.height as i32 - 1),
            );
            self.is_valid_tile(area, target, tile, taken).then_some(tile)
        })
    }

    /// Unoccupied, placeable, on the map, and strictly outside the exclusion radius.
    pub fn is_valid_tile(
        &self,
        area: &dyn AreaMap,
        target: TilePos,
        tile: TilePos,
        taken: &[TilePos],
    ) -> bool {
        !taken.contains(&tile)
            && !area.is_occupied(tile)
            && area.is_placeable(tile)
            && area.is_on_map(tile)
            && tile.distance(target) > self.config.exclusion_radius_tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestiary_core::{
        AreaDimensions, AreaInfo, AreaKind, FixedRandom, MonsterDefinition, PcgRng, SpawnRule,
        TileFlags,
    };

    struct Grid {
        info: AreaInfo,
        dims: AreaDimensions,
        tiles: Vec<TileFlags>,
    }

    impl Grid {
        fn open(info: AreaInfo, width: u32, height: u32) -> Self {
            Self {
                info,
                dims: AreaDimensions::new(width, height),
                tiles: vec![TileFlags::OPEN; (width * height) as usize],
            }
        }
    }

    impl AreaMap for Grid {
        fn info(&self) -> &AreaInfo {
            &self.info
        }

        fn dimensions(&self) -> AreaDimensions {
            self.dims
        }

        fn tile_flags(&self, tile: TilePos) -> TileFlags {
            if !self.dims.contains(tile) {
                return TileFlags::empty();
            }
            self.tiles[(tile.y as u32 * self.dims.width + tile.x as u32) as usize]
        }
    }

    fn registry_with(id: &str, rule: SpawnRule) -> DefinitionRegistry {
        let mut registry = DefinitionRegistry::new();
        registry.register_definition(id, MonsterDefinition::new(id).with_spawn(rule));
        registry
    }

    #[test]
    fn fixed_areas_are_never_populated() {
        let registry = registry_with("a_Imp", SpawnRule::tiers(0, 99, 1.0));
        let grid = Grid::open(AreaInfo::new("Farm", AreaKind::Fixed), 30, 30);
        let placements = SpawnInjector::default().populate(
            &registry,
            &grid,
            TilePos::ORIGIN,
            false,
            &mut PcgRng::new(1),
        );
        assert!(placements.is_empty());
    }

    #[test]
    fn occupied_area_repopulates_only_on_chance() {
        let registry = registry_with("a_Imp", SpawnRule::tiers(0, 99, 1.0));
        let grid = Grid::open(AreaInfo::tiered("Mine", 3), 30, 30);
        // u32::MAX maps to a float just below one, failing a 10% roll
        let placements = SpawnInjector::default().populate(
            &registry,
            &grid,
            TilePos::ORIGIN,
            true,
            &mut FixedRandom(u32::MAX),
        );
        assert!(placements.is_empty());
    }

    #[test]
    fn zero_weight_never_spawns() {
        let registry = registry_with("a_Imp", SpawnRule::tiers(3, 3, 0.0));
        let grid = Grid::open(AreaInfo::tiered("Mine", 3), 30, 30);
        let mut rng = PcgRng::new(5);
        for _ in 0..200 {
            let placements = SpawnInjector::default().populate(
                &registry,
                &grid,
                TilePos::ORIGIN,
                false,
                &mut rng,
            );
            assert!(placements.is_empty());
        }
    }

    #[test]
    fn full_weight_spawns_once_per_wave() {
        let registry = registry_with("a_Imp", SpawnRule::tiers(3, 3, 1.0));
        let grid = Grid::open(AreaInfo::tiered("Mine", 3), 40, 40);
        let injector = SpawnInjector::default();
        let mut rng = PcgRng::new(9);
        for _ in 0..100 {
            let placements =
                injector.populate(&registry, &grid, TilePos::new(20, 20), false, &mut rng);
            let waves = placements.iter().map(|p| p.wave).max().map_or(0, |w| w + 1);
            assert!(!placements.is_empty());
            assert_eq!(placements.len() as u32, waves);
        }
    }

    #[test]
    fn location_allow_list_filters_candidates() {
        let mut registry = DefinitionRegistry::new();
        registry.register_definition(
            "a_Imp",
            MonsterDefinition::new("Imp")
                .with_spawn(SpawnRule::tiers(1, 5, 1.0).with_locations(["SkullCave"])),
        );
        registry.register_definition(
            "a_Bat",
            MonsterDefinition::new("Bat").with_spawn(SpawnRule::tiers(1, 5, 1.0)),
        );
        let candidates = SpawnInjector::default().candidates(&registry, "Mine", 2);
        assert_eq!(candidates, vec![("a_Bat", 1.0)]);
    }

    #[test]
    fn placement_gives_up_after_configured_attempts() {
        let injector = SpawnInjector::default();
        // every tile lies within the exclusion radius of the center
        let grid = Grid::open(AreaInfo::tiered("Mine", 1), 5, 5);
        let mut rng = PcgRng::new(4);
        assert_eq!(
            injector.find_placement(&grid, TilePos::new(2, 2), &[], &mut rng),
            None
        );
    }
}
