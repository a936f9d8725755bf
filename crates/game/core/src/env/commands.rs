//! Side effects requested by strategies and the entity runtime.
//!
//! Hooks never touch host systems directly. They push [`WorldCommand`]s which
//! the host drains after each dispatch, keeping the engine free of audio,
//! lighting, item, and rendering dependencies.

use strum::{AsRefStr, IntoStaticStr};

use crate::definition::CombatStats;
use crate::geometry::Vec2;
use crate::state::EntityId;

#[derive(Clone, Debug, PartialEq)]
pub enum WorldCommand {
    PlaySound {
        cue: SoundCue,
        position: Vec2,
    },
    Light(LightCommand),
    SpawnProjectile {
        owner: EntityId,
        origin: Vec2,
        /// Pixels per tick.
        velocity: Vec2,
        damage: i32,
    },
    VisualEffect {
        kind: EffectKind,
        position: Vec2,
    },
    /// Request a new creature of `definition_id`; the host constructs and loads it.
    SpawnOffspring {
        definition_id: String,
        position: Vec2,
        scale: f32,
        stats: CombatStats,
    },
    DropItem {
        item_id: String,
        stack: u32,
        position: Vec2,
    },
    /// Built-in hit reaction (flash, knockback) for damage that was applied.
    HitReaction {
        entity: EntityId,
        damage: i32,
    },
    /// The entity died and should be removed after this dispatch.
    Died {
        entity: EntityId,
        experience: i32,
    },
}

/// Light sources are keyed so the host can track one handle per creature.
#[derive(Clone, Debug, PartialEq)]
pub enum LightCommand {
    Attach {
        key: String,
        position: Vec2,
        radius: f32,
    },
    Move {
        key: String,
        position: Vec2,
    },
    Remove {
        key: String,
    },
}

impl LightCommand {
    pub fn key(&self) -> &str {
        match self {
            Self::Attach { key, .. } | Self::Move { key, .. } | Self::Remove { key } => key,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SoundCue {
    Hit,
    Death,
    Flap,
    Charge,
    Burrow,
    Surface,
    Shoot,
    Collapse,
    Revive,
    Wake,
    ShellBreak,
    Jump,
    Mate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum EffectKind {
    Dust,
    ReviveWarning,
    ShellShards,
    Hearts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_names_are_snake_case() {
        assert_eq!(SoundCue::ShellBreak.as_ref(), "shell_break");
        let name: &'static str = EffectKind::ReviveWarning.into();
        assert_eq!(name, "revive_warning");
    }
}
