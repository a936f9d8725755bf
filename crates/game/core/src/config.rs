/// Engine configuration constants and tunable parameters.
///
/// Every field carries a serde default so a partial TOML file is valid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Size of one map tile in world pixels.
    pub tile_size: f32,
    /// Simulation ticks per second. Per-tick speeds (px/tick) are scaled by
    /// `elapsed * ticks_per_second` so strategies stay frame-rate independent.
    pub ticks_per_second: f32,
    pub spawn: SpawnConfig,
}

impl EngineConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TILE_SIZE: f32 = 64.0;
    pub const DEFAULT_TICKS_PER_SECOND: f32 = 60.0;

    pub fn new() -> Self {
        Self {
            tile_size: Self::DEFAULT_TILE_SIZE,
            ticks_per_second: Self::DEFAULT_TICKS_PER_SECOND,
            spawn: SpawnConfig::default(),
        }
    }

    /// Converts an elapsed wall time into a number of (fractional) simulation ticks.
    #[inline]
    pub fn ticks(&self, elapsed: f32) -> f32 {
        elapsed * self.ticks_per_second
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Tunables for the area-entry spawn injector.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpawnConfig {
    /// Upper bound of the 1..=N independent waves rolled per area entry.
    pub max_waves: u32,
    /// Random tiles sampled per spawn before the candidate is skipped.
    pub placement_attempts: u32,
    /// Accepted tiles must be strictly farther than this from the target's tile.
    pub exclusion_radius_tiles: f32,
    /// Probability of still injecting when the area already holds a hostile.
    pub repopulate_chance: f32,
}

impl SpawnConfig {
    pub const DEFAULT_MAX_WAVES: u32 = 3;
    pub const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 15;
    pub const DEFAULT_EXCLUSION_RADIUS_TILES: f32 = 6.0;
    pub const DEFAULT_REPOPULATE_CHANCE: f32 = 0.10;
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            max_waves: Self::DEFAULT_MAX_WAVES,
            placement_attempts: Self::DEFAULT_PLACEMENT_ATTEMPTS,
            exclusion_radius_tiles: Self::DEFAULT_EXCLUSION_RADIUS_TILES,
            repopulate_chance: Self::DEFAULT_REPOPULATE_CHANCE,
        }
    }
}
