use anyhow::Context;
use sympo_config::SympoConfig;

use crate::cli::GlobalFlags;

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SympoConfig> {
    let config = match &flags.config {
        Some(path) => SympoConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SympoConfig::load().context("failed to load configuration")?,
    };
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
