use anyhow::Context;
use sympo_config::SympoConfig;
use sympo_core::store;

use crate::cli::root_commands::UpdateArgs;
use crate::commands::shared;

/// Handle `sympo update`.
pub fn handle(args: &UpdateArgs, config: &SympoConfig) -> anyhow::Result<()> {
    let patches = store::read_patches(&args.patch)
        .with_context(|| format!("failed to read patch {}", args.patch.display()))?;
    shared::merge_and_write(&args.data, &patches, &args.target, config)
}
