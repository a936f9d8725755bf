use anyhow::Result;
use bestiary_core::{AreaInfo, TilePos};
use bestiary_runtime::SimArea;
use clap::Parser;

use crate::context::EngineArgs;

/// Spawn one creature next to the player and report it
#[derive(Parser)]
pub struct Spawn {
    /// Unique definition id (e.g. `alice_Imp`)
    #[arg(value_name = "ID")]
    id: String,

    #[command(flatten)]
    engine: EngineArgs,

    /// Simulation ticks to run after spawning
    #[arg(short, long, default_value_t = 60)]
    ticks: u32,
}

impl Spawn {
    pub fn execute(self) -> Result<()> {
        let (bestiary, _) = self.engine.load()?;
        if !bestiary.registry().is_registered(&self.id) {
            println!("'{}' is not registered; spawning with fallbacks", self.id);
        }

        let config = bestiary.config().clone();
        let mut area = SimArea::new(AreaInfo::tiered("Demo", 1), 24, 24, config, 1);
        let player = area.tile_center(TilePos::new(12, 12));
        area.set_target(Some(player));
        let id = area.spawn(&bestiary, &self.id, player);

        let elapsed = 1.0 / bestiary.config().ticks_per_second;
        for _ in 0..self.ticks {
            area.tick(&bestiary, elapsed);
            area.animation_tick(&bestiary, elapsed);
        }

        let Some(monster) = area.monster(id) else {
            println!("{id} is gone after {} ticks", self.ticks);
            return Ok(());
        };
        let creature = monster.creature();
        println!("entity     {id}");
        println!("name       {}", creature.name);
        println!("behavior   {}", monster.behavior().key());
        println!("appearance {}", monster.appearance().describe());
        println!("health     {}/{}", creature.health, creature.max_health);
        println!("state      {}", creature.state.ai_state);
        println!(
            "position   ({:.1}, {:.1}) after {} ticks",
            creature.position.x, creature.position.y, self.ticks
        );
        println!("commands   {}", area.events().len());
        Ok(())
    }
}
