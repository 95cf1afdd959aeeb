use anyhow::Context;
use sympo_config::SympoConfig;
use sympo_core::projection::{metadata_common_row, metadata_paper_rows, metadata_session_rows};
use sympo_core::store;

use crate::cli::root_commands::MetaCommands;
use crate::commands::shared;

/// Handle `sympo meta`.
pub fn handle(action: &MetaCommands, config: &SympoConfig) -> anyhow::Result<()> {
    match action {
        MetaCommands::Sessions(args) => {
            let list = shared::read_data(&args.data)?;
            let rows = metadata_session_rows(&list, &config.general.cities, &config.general.venues);
            store::write_csv(&args.output, &rows)
                .with_context(|| format!("failed to write {}", args.output.display()))?;
            println!("{} session rows -> {}", rows.len(), args.output.display());
        }
        MetaCommands::Papers(args) => {
            let list = shared::read_data(&args.data)?;
            let rows = metadata_paper_rows(&list);
            let unpaged = rows.iter().filter(|r| r.filename.is_empty()).count();
            if unpaged > 0 {
                tracing::warn!(unpaged, "papers without pages have no file name");
            }
            store::write_csv(&args.output, &rows)
                .with_context(|| format!("failed to write {}", args.output.display()))?;
            println!("{} paper rows -> {}", rows.len(), args.output.display());
        }
        MetaCommands::Common(args) => {
            let common = store::read_common(&args.common)
                .with_context(|| format!("failed to read {}", args.common.display()))?;
            let row = metadata_common_row(&common);
            store::write_csv(&args.output, std::slice::from_ref(&row))
                .with_context(|| format!("failed to write {}", args.output.display()))?;
            println!("common row for {} -> {}", common.event_name, args.output.display());
        }
    }
    Ok(())
}
