//! Engine construction shared by every command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bestiary_content::{ConfigLoader, DefinitionSource, parse_source_list};
use bestiary_core::EngineConfig;
use bestiary_runtime::{Bestiary, ReloadReport};
use clap::Args;
use tracing::info;

#[derive(Args, Clone, Debug)]
pub struct EngineArgs {
    /// Definition sources as `owner=path;owner=path`
    #[arg(long, env = "BESTIARY_SOURCES", value_name = "SOURCES", default_value = "")]
    pub sources: String,

    /// Engine configuration file (TOML)
    #[arg(long, env = "BESTIARY_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl EngineArgs {
    pub fn engine_config(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(path) => ConfigLoader::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display())),
            None => Ok(EngineConfig::default()),
        }
    }

    pub fn sources(&self) -> Result<Vec<DefinitionSource>> {
        parse_source_list(&self.sources).context("Invalid BESTIARY_SOURCES")
    }

    /// Builds the engine and performs the initial world-load reload.
    pub fn load(&self) -> Result<(Bestiary, ReloadReport)> {
        let sources = self.sources()?;
        if sources.is_empty() {
            anyhow::bail!("No definition sources given (use --sources or BESTIARY_SOURCES)");
        }
        let mut bestiary = Bestiary::builder().config(self.engine_config()?).build();
        let report = bestiary.reload(&sources);
        info!(
            target: "bestiary::reload",
            sources = sources.len(),
            loaded = report.loaded,
            "engine ready"
        );
        Ok((bestiary, report))
    }
}
