use anyhow::Result;
use bestiary_core::GameError;
use clap::Parser;

use crate::context::EngineArgs;

/// Reload every source and print the report
#[derive(Parser)]
pub struct Reload {
    #[command(flatten)]
    engine: EngineArgs,
}

impl Reload {
    pub fn execute(self) -> Result<()> {
        let (bestiary, report) = self.engine.load()?;

        println!("loaded:     {}", report.loaded);
        println!("registered: {}", bestiary.registry().len());
        for conflict in &report.conflicts {
            println!("conflict    [{}] {conflict}", conflict.error_code());
        }
        for failure in &report.failures {
            println!("failure     [{}] {failure}", failure.error_code());
        }
        if report.is_clean() {
            println!("clean");
        }
        Ok(())
    }
}
