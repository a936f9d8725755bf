use std::collections::BTreeMap;

use anyhow::Result;
use bestiary_core::{AreaInfo, TilePos, WorldCommand};
use bestiary_runtime::{Hit, SimArea};
use clap::Parser;

use crate::context::EngineArgs;

/// Enter a tiered area, populate it, and run the simulation
#[derive(Parser)]
pub struct Simulate {
    #[command(flatten)]
    engine: EngineArgs,

    /// Difficulty tier of the entered area
    #[arg(long, default_value_t = 5)]
    tier: i32,

    /// Area width and height in tiles
    #[arg(long, default_value_t = 40)]
    size: u32,

    /// Simulation ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,

    /// Seed for spawning and every in-simulation roll
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Hit every creature for this much melee damage once per second
    #[arg(long, default_value_t = 0)]
    hit: i32,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let (bestiary, _) = self.engine.load()?;
        let config = bestiary.config().clone();
        let elapsed = 1.0 / config.ticks_per_second;
        let ticks_per_second = config.ticks_per_second.max(1.0) as u32;

        let mut area = SimArea::new(
            AreaInfo::tiered("Simulation", self.tier),
            self.size,
            self.size,
            config,
            self.seed,
        );
        let center = (self.size / 2) as i32;
        area.set_target(Some(area.tile_center(TilePos::new(center, center))));

        let spawned = area.populate(&bestiary);
        println!("tier {} populated with {} creature(s)", self.tier, spawned.len());
        for id in &spawned {
            if let Some(monster) = area.monster(*id) {
                println!(
                    "  {id} {} ({})",
                    monster.creature().state.definition_id,
                    monster.behavior().key()
                );
            }
        }

        for tick in 0..self.ticks {
            area.tick(&bestiary, elapsed);
            area.animation_tick(&bestiary, elapsed);
            if self.hit > 0 && tick % ticks_per_second == 0 {
                let ids: Vec<_> = area.monsters().map(|m| m.id()).collect();
                for id in ids {
                    area.damage(&bestiary, id, Hit::melee(self.hit));
                }
            }
        }

        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for event in area.events() {
            *counts.entry(command_name(event)).or_default() += 1;
        }
        println!("after {} ticks: {} alive", self.ticks, area.hostile_count());
        for (name, count) in counts {
            println!("  {name:<16} {count}");
        }
        Ok(())
    }
}

fn command_name(command: &WorldCommand) -> &'static str {
    match command {
        WorldCommand::PlaySound { .. } => "sound",
        WorldCommand::Light(_) => "light",
        WorldCommand::SpawnProjectile { .. } => "projectile",
        WorldCommand::VisualEffect { .. } => "effect",
        WorldCommand::SpawnOffspring { .. } => "offspring",
        WorldCommand::DropItem { .. } => "drop",
        WorldCommand::HitReaction { .. } => "hit",
        WorldCommand::Died { .. } => "death",
    }
}
