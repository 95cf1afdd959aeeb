use anyhow::Context;
use sympo_config::SympoConfig;
use sympo_core::store;

use crate::cli::root_commands::Sheet2jsonArgs;

/// Handle `sympo sheet2json`.
pub fn handle(args: &Sheet2jsonArgs, config: &SympoConfig) -> anyhow::Result<()> {
    let sheet = store::read_sheet(&args.sheet)
        .with_context(|| format!("failed to read sheet {}", args.sheet.display()))?;

    let mut loader = config.sheet.loader();
    if let Some(hours) = args.tz_offset_h {
        loader = loader.tz_offset_h(hours);
    }
    let list = loader
        .load(&sheet)
        .with_context(|| format!("failed to ingest {}", args.sheet.display()))?;

    store::write_session_list(&args.output, &list)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "{} sessions, {} papers -> {}",
        list.len(),
        list.papers().count(),
        args.output.display()
    );
    Ok(())
}
