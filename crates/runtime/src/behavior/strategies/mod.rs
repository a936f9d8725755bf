//! Built-in strategy state machines.
//!
//! Every strategy is a unit struct: per-creature data lives in
//! [`RuntimeState`](bestiary_core::RuntimeState), never in the strategy. The
//! assertions below fail the build if a strategy ever grows a field.
//!
//! Shared conventions:
//! - timers count down by elapsed seconds and fire on crossing zero
//!   ([`countdown`](bestiary_core::countdown))
//! - speeds are px/tick and scaled by `EngineConfig::ticks`
//! - ranges in custom fields are in tiles

pub mod aerial;
pub mod burrow;
pub mod chase;
pub mod feign_death;
pub mod hover;
pub mod jumper;
pub mod shell;
pub mod skirmisher;

pub use aerial::AerialStrategy;
pub use burrow::BurrowStrategy;
pub use chase::ChaseStrategy;
pub use feign_death::FeignDeathStrategy;
pub use hover::HoverStrategy;
pub use jumper::JumperStrategy;
pub use shell::ShellStrategy;
pub use skirmisher::SkirmisherStrategy;

use bestiary_core::{Creature, World};
use tracing::trace;

const _: () = {
    use std::mem::size_of;
    assert!(size_of::<ChaseStrategy>() == 0);
    assert!(size_of::<AerialStrategy>() == 0);
    assert!(size_of::<HoverStrategy>() == 0);
    assert!(size_of::<BurrowStrategy>() == 0);
    assert!(size_of::<SkirmisherStrategy>() == 0);
    assert!(size_of::<FeignDeathStrategy>() == 0);
    assert!(size_of::<ShellStrategy>() == 0);
    assert!(size_of::<JumperStrategy>() == 0);
};

/// Moves the machine to `next`, tracing the transition.
fn enter_state(creature: &mut Creature, strategy: &'static str, next: i32) {
    let previous = creature.state.ai_state;
    if previous != next {
        trace!(
            target: "bestiary::monster",
            entity = %creature.id,
            strategy,
            from = previous,
            to = next,
            "state transition"
        );
        creature.state.ai_state = next;
    }
}

/// Converts a custom-field range in tiles to pixels.
fn tiles(world: &dyn World, count: f32) -> f32 {
    count * world.tile_size()
}

/// Advances a looping animation cycle stored in the scratch float.
fn advance_cycle(creature: &mut Creature, frames_per_tick: f32, ticks: f32) -> f32 {
    creature.state.scratch_float = (creature.state.scratch_float + frames_per_tick * ticks) % 4.0;
    creature.state.scratch_float
}
