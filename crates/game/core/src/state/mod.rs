//! Live creature state.
//!
//! A [`Creature`] is created by the host, loaded from a definition, driven by
//! exactly one strategy, and destroyed on death or despawn. Everything a
//! strategy may change between ticks lives here, never in the strategy itself.
mod creature;
mod id;
mod runtime;

pub use creature::Creature;
pub use id::EntityId;
pub use runtime::{EntityRefs, FloatVars, RuntimeState, countdown};
