use anyhow::Result;
use clap::Parser;

use crate::context::EngineArgs;

/// List registered definition ids
#[derive(Parser)]
pub struct List {
    #[command(flatten)]
    engine: EngineArgs,

    /// Also print behavior key and spawn tiers
    #[arg(short, long)]
    verbose: bool,
}

impl List {
    pub fn execute(self) -> Result<()> {
        let (bestiary, _) = self.engine.load()?;
        let registry = bestiary.registry();

        for id in registry.sorted_ids() {
            let Some(entry) = registry.get(id) else {
                continue;
            };
            if !self.verbose {
                println!("{id}");
                continue;
            }
            let definition = entry.definition();
            let behavior = bestiary.factory().get(&definition.behavior);
            let tiers = if definition.spawn.is_disabled() {
                "never".to_owned()
            } else {
                format!("{}..={}", definition.spawn.min_tier, definition.spawn.max_tier)
            };
            println!(
                "{id:<32} {:<20} behavior={:<14} tiers={tiers:<8} owner={}",
                definition.name,
                behavior.key(),
                entry.source().owner
            );
        }
        println!("{} definition(s)", registry.len());
        Ok(())
    }
}
