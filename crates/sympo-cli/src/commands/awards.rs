use anyhow::Context;
use sympo_config::SympoConfig;
use sympo_core::side_files::award_patches;
use sympo_core::store;

use crate::cli::root_commands::AwardsArgs;
use crate::commands::shared;

/// Handle `sympo awards`.
pub fn handle(args: &AwardsArgs, config: &SympoConfig) -> anyhow::Result<()> {
    let awards = store::read_awards(&args.awards)
        .with_context(|| format!("failed to read awards {}", args.awards.display()))?;
    let list = shared::read_data(&args.data)?;
    let patches = award_patches(&list, &awards).context("awards do not match the data")?;
    shared::merge_and_write(&args.data, &patches, &args.target, config)
}
