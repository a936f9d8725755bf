//! Behavior strategy contract and dispatch.
//!
//! A [`Behavior`] is a stateless strategy shared by every creature whose
//! definition names its key. All per-creature data lives in the creature's
//! [`RuntimeState`](bestiary_core::RuntimeState); strategies are zero-sized
//! unit structs, which the [`strategies`] module asserts at compile time.
//!
//! # Hook order
//!
//! ```text
//! (re)load        → initialize
//! simulation tick → update
//! animation frame → on_animation_tick   (visual side effects only)
//! damage event    → on_take_damage      (may veto or transform the hit)
//! death           → on_death            (cleanup before removal)
//! ```

mod factory;
pub mod strategies;

pub use factory::{BehaviorFactory, BuiltinBehavior};

use bestiary_core::{Creature, EntityId, World};

/// One incoming damage event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub damage: i32,
    /// Bomb or other area-of-effect damage.
    pub is_area: bool,
    pub attacker: Option<EntityId>,
}

impl Hit {
    pub fn melee(damage: i32) -> Self {
        Self {
            damage,
            is_area: false,
            attacker: None,
        }
    }

    pub fn area(damage: i32) -> Self {
        Self {
            damage,
            is_area: true,
            attacker: None,
        }
    }

    #[must_use]
    pub fn from_attacker(mut self, attacker: EntityId) -> Self {
        self.attacker = Some(attacker);
        self
    }
}

/// Lifecycle hooks of an AI strategy. Every hook defaults to a no-op.
pub trait Behavior: Send + Sync {
    /// Registry key this strategy is normally registered under.
    fn key(&self) -> &'static str;

    /// Called once per (re)load, after stats were copied from the definition.
    fn initialize(&self, _creature: &mut Creature, _world: &mut dyn World) {}

    /// Called once per simulation tick; the only place AI decisions happen.
    fn update(&self, _creature: &mut Creature, _world: &mut dyn World, _elapsed: f32) {}

    /// Called once per animation refresh. The creature is read-only here.
    fn on_animation_tick(&self, _creature: &Creature, _world: &mut dyn World, _elapsed: f32) {}

    /// Returns the damage to actually apply.
    ///
    /// Returning `<= 0` for a positive hit cancels it entirely, including the
    /// hit reaction and hit sound of the built-in damage path.
    fn on_take_damage(&self, _creature: &mut Creature, _world: &mut dyn World, hit: Hit) -> i32 {
        hit.damage
    }

    /// Cleanup before the creature is removed.
    fn on_death(&self, _creature: &mut Creature, _world: &mut dyn World) {}

    /// Called on the outgoing strategy when a resync hands the creature to a
    /// different one, before the named stores are cleared.
    fn on_unload(&self, _creature: &mut Creature, _world: &mut dyn World) {}
}
