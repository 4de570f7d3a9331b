//! Loading of TOML simulation configuration files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use forbidden_island_core::SimulationConfig;

/// Reads a configuration file, falling back to defaults for omitted fields.
pub(crate) fn load(path: &Path) -> Result<SimulationConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&contents).with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Parses configuration from TOML text.
pub(crate) fn parse(contents: &str) -> Result<SimulationConfig> {
    let config: SimulationConfig = toml::from_str(contents)?;
    Ok(config)
}
