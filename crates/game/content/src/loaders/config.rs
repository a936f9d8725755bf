//! Engine configuration loader.

use std::path::Path;

use bestiary_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys take their defaults, so an empty file yields
    /// [`EngineConfig::default`].
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| e.context(format!("in {}", path.display())))
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            tile_size = 32.0

            [spawn]
            max_waves = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.tile_size, 32.0);
        assert_eq!(config.ticks_per_second, EngineConfig::DEFAULT_TICKS_PER_SECOND);
        assert_eq!(config.spawn.max_waves, 1);
        assert_eq!(config.spawn.placement_attempts, 15);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(ConfigLoader::parse("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/bestiary.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bestiary.toml"));
    }
}
