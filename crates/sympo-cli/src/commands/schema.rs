use anyhow::Context;
use sympo_schema::SchemaRegistry;

use crate::cli::root_commands::SchemaArgs;

/// Handle `sympo schema`.
pub fn handle(args: &SchemaArgs) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    match &args.name {
        None => {
            for name in registry.list() {
                println!("{name}");
            }
        }
        Some(name) => {
            let schema = registry
                .get(name)
                .with_context(|| format!("unknown schema '{name}' (see `sympo schema`)"))?;
            println!("{}", serde_json::to_string_pretty(schema)?);
        }
    }
    Ok(())
}
