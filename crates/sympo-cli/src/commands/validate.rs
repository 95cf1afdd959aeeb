use anyhow::Context;
use sympo_core::store;
use sympo_schema::SchemaRegistry;

use crate::cli::root_commands::ValidateArgs;

/// Handle `sympo validate`.
///
/// Checks the document shape against the schema; session lists are then also
/// loaded, which checks key uniqueness, contact authors and page overlaps.
pub fn handle(args: &ValidateArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    SchemaRegistry::new()
        .validate_str(&args.schema, &text)
        .with_context(|| format!("{} does not match schema '{}'", args.file.display(), args.schema))?;

    if args.schema == "session_list" {
        let list = store::read_session_list(&args.file)?;
        println!(
            "{}: valid ({} sessions, {} papers)",
            args.file.display(),
            list.len(),
            list.papers().count()
        );
    } else {
        println!("{}: valid", args.file.display());
    }
    Ok(())
}
