use anyhow::Context;
use sympo_config::SympoConfig;
use sympo_core::side_files::organizer_patches;
use sympo_core::store;

use crate::cli::root_commands::OrganizersArgs;
use crate::commands::shared;

/// Handle `sympo organizers`.
pub fn handle(args: &OrganizersArgs, config: &SympoConfig) -> anyhow::Result<()> {
    let organizers = store::read_organizers(&args.organizers)
        .with_context(|| format!("failed to read organizers {}", args.organizers.display()))?;
    let list = shared::read_data(&args.data)?;
    let patches = organizer_patches(&list, &organizers);
    shared::merge_and_write(&args.data, &patches, &args.target, config)
}
