//! Author-supplied creature definitions.
//!
//! A [`MonsterDefinition`] is immutable once loaded: the registry replaces whole
//! entries and live creatures copy what they need on (re)load. Document keys use
//! the author-facing PascalCase spelling, e.g.
//!
//! ```json
//! {
//!   "Imp": {
//!     "Name": "Imp",
//!     "Appearance": { "Texture": "assets/imp.png", "FrameWidth": 16, "FrameHeight": 24 },
//!     "Stats": { "MaxHealth": 40, "Damage": 6, "Defense": 1, "Experience": 5, "Speed": 2 },
//!     "Behavior": "bat",
//!     "Drops": [ { "ItemId": "imp_horn", "Chance": 0.25 } ],
//!     "Spawn": { "MinMineLevel": 5, "MaxMineLevel": 10, "SpawnWeight": 1.0 },
//!     "CustomFields": { "ChargeEnabled": true }
//!   }
//! }
//! ```

mod fields;
mod rules;

pub use fields::CustomFields;
pub use rules::{DropRule, SpawnRule};

/// Complete static description of one creature kind.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase", default))]
pub struct MonsterDefinition {
    pub name: String,
    pub appearance: Appearance,
    pub stats: CombatStats,
    /// Behavior key resolved through the behavior factory. Empty selects the default.
    pub behavior: String,
    pub drops: Vec<DropRule>,
    pub spawn: SpawnRule,
    pub custom_fields: CustomFields,
}

impl MonsterDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_behavior(mut self, key: impl Into<String>) -> Self {
        self.behavior = key.into();
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_spawn(mut self, spawn: SpawnRule) -> Self {
        self.spawn = spawn;
        self
    }

    #[must_use]
    pub fn with_drop(mut self, drop: DropRule) -> Self {
        self.drops.push(drop);
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.custom_fields.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }
}

/// Sprite sheet reference. Only frame indices are chosen by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase", default))]
pub struct Appearance {
    #[cfg_attr(feature = "serde", serde(alias = "TexturePath"))]
    pub texture: String,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Appearance {
    pub const PLACEHOLDER_TEXTURE: &'static str = "Characters/Monsters/Placeholder";
    pub const DEFAULT_FRAME_WIDTH: u32 = 16;
    pub const DEFAULT_FRAME_HEIGHT: u32 = 24;

    pub fn new(texture: impl Into<String>, frame_width: u32, frame_height: u32) -> Self {
        Self {
            texture: texture.into(),
            frame_width,
            frame_height,
        }
    }

    /// Fixed built-in appearance used whenever a texture cannot be resolved.
    pub fn placeholder() -> Self {
        Self::new(
            Self::PLACEHOLDER_TEXTURE,
            Self::DEFAULT_FRAME_WIDTH,
            Self::DEFAULT_FRAME_HEIGHT,
        )
    }

    /// Classifies the texture reference.
    ///
    /// A reference with a file extension (`assets/imp.png`) is a file relative
    /// to the owning source; anything else (`Characters/Monsters/Bat`) is a key
    /// for the host's content pipeline.
    pub fn source(&self) -> AssetSource<'_> {
        let texture = self.texture.trim();
        let file_name = texture.rsplit(['/', '\\']).next().unwrap_or(texture);
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                AssetSource::SourceRelative(texture)
            }
            _ => AssetSource::EngineContent(texture),
        }
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Where an appearance texture is resolved from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetSource<'a> {
    SourceRelative(&'a str),
    EngineContent(&'a str),
}

/// Combat statistics copied onto a creature on every (re)load.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase", default))]
pub struct CombatStats {
    #[cfg_attr(feature = "serde", serde(alias = "Health"))]
    pub max_health: i32,
    /// Contact damage dealt to the target on touch.
    pub damage: i32,
    pub defense: i32,
    #[cfg_attr(feature = "serde", serde(alias = "Exp"))]
    pub experience: i32,
    /// Movement speed in pixels per simulation tick.
    pub speed: f32,
}

impl CombatStats {
    pub const DEFAULT_MAX_HEALTH: i32 = 20;
    pub const DEFAULT_SPEED: f32 = 2.0;

    pub fn new(max_health: i32, damage: i32, defense: i32, experience: i32, speed: f32) -> Self {
        Self {
            max_health,
            damage,
            defense,
            experience,
            speed,
        }
    }

    /// Guards against nonsensical author data: health of at least one, no negative
    /// damage or defense, and a finite non-negative speed.
    pub fn sanitized(self) -> Self {
        Self {
            max_health: self.max_health.max(1),
            damage: self.damage.max(0),
            defense: self.defense.max(0),
            experience: self.experience.max(0),
            speed: if self.speed.is_finite() {
                self.speed.max(0.0)
            } else {
                Self::DEFAULT_SPEED
            },
        }
    }
}

impl Default for CombatStats {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_HEALTH, 0, 0, 0, Self::DEFAULT_SPEED)
    }
}
