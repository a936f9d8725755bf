//! Loot and spawn rules attached to a definition.

use crate::env::RandomSource;

/// One entry of a creature's ordered loot table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase", default))]
pub struct DropRule {
    #[cfg_attr(feature = "serde", serde(alias = "Item"))]
    pub item_id: String,
    /// Probability in `[0, 1]`; values outside are clamped when rolled.
    pub chance: f32,
    pub min_stack: u32,
    pub max_stack: u32,
}

impl DropRule {
    pub fn new(item_id: impl Into<String>, chance: f32, min_stack: u32, max_stack: u32) -> Self {
        Self {
            item_id: item_id.into(),
            chance,
            min_stack,
            max_stack,
        }
    }

    /// Rolls this rule independently of every other rule.
    ///
    /// Returns the stack size to create, or `None` if the roll failed.
    /// A reversed `min/max` pair is treated as its sorted equivalent and a
    /// stack is never smaller than one item.
    pub fn roll(&self, rng: &mut dyn RandomSource) -> Option<u32> {
        if self.item_id.is_empty() || !rng.chance(self.chance.clamp(0.0, 1.0)) {
            return None;
        }
        let low = self.min_stack.min(self.max_stack).max(1);
        let high = self.min_stack.max(self.max_stack).max(low);
        let stack = rng.range_i32(low as i32, high.min(i32::MAX as u32) as i32);
        Some(stack as u32)
    }
}

impl Default for DropRule {
    fn default() -> Self {
        Self::new(String::new(), 1.0, 1, 1)
    }
}

/// Where and how often a creature may be injected into procedurally populated areas.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase", default))]
pub struct SpawnRule {
    /// Lowest valid difficulty tier, inclusive. `-1` disables spawning.
    #[cfg_attr(feature = "serde", serde(rename = "MinMineLevel", alias = "MinTier"))]
    pub min_tier: i32,
    /// Highest valid difficulty tier, inclusive. `-1` disables spawning.
    #[cfg_attr(feature = "serde", serde(rename = "MaxMineLevel", alias = "MaxTier"))]
    pub max_tier: i32,
    /// Per-wave Bernoulli probability; `>= 1` always spawns, `0` never does.
    #[cfg_attr(feature = "serde", serde(alias = "Weight"))]
    pub spawn_weight: f32,
    /// Area names this creature may appear in. Empty allows every area.
    pub locations: Vec<String>,
}

impl SpawnRule {
    /// Rule that never spawns anything.
    pub fn disabled() -> Self {
        Self {
            min_tier: -1,
            max_tier: -1,
            spawn_weight: 0.0,
            locations: Vec::new(),
        }
    }

    pub fn tiers(min_tier: i32, max_tier: i32, spawn_weight: f32) -> Self {
        Self {
            min_tier,
            max_tier,
            spawn_weight,
            locations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations = locations.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.min_tier < 0 || self.max_tier < 0
    }

    pub fn allows_tier(&self, tier: i32) -> bool {
        !self.is_disabled() && self.min_tier <= tier && tier <= self.max_tier
    }

    /// Location names compare case-insensitively.
    pub fn allows_location(&self, area_name: &str) -> bool {
        self.locations.is_empty()
            || self
                .locations
                .iter()
                .any(|name| name.eq_ignore_ascii_case(area_name))
    }
}

impl Default for SpawnRule {
    fn default() -> Self {
        Self {
            spawn_weight: 1.0,
            ..Self::disabled()
        }
    }
}
