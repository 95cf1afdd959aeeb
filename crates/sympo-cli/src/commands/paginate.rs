use anyhow::Context;
use sympo_config::SympoConfig;
use sympo_core::pagination::assign_pages;
use sympo_core::store;

use crate::cli::root_commands::PaginateArgs;
use crate::commands::shared;

/// Handle `sympo paginate`.
pub fn handle(args: &PaginateArgs, config: &SympoConfig) -> anyhow::Result<()> {
    let mut counts = store::read_page_counts(&args.page_counts)
        .with_context(|| format!("failed to read page counts {}", args.page_counts.display()))?;
    let out = shared::target_path(&args.data, &args.target, config)?;
    let list = shared::read_data(&args.data)?;

    let first_page = args.first_page.unwrap_or(config.general.first_page);
    let paged = assign_pages(&list, &mut counts, first_page).context("pagination failed")?;

    store::write_session_list(&out, &paged)
        .with_context(|| format!("failed to write {}", out.display()))?;
    let last = paged
        .papers()
        .filter_map(|(_, p)| p.pages)
        .map(|r| r.last())
        .max();
    match last {
        Some(last) => println!("pp. {first_page}-{last} -> {}", out.display()),
        None => println!("no pages assigned -> {}", out.display()),
    }
    Ok(())
}
