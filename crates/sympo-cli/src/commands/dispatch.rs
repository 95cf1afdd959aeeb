use sympo_config::SympoConfig;

use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, config: &SympoConfig) -> anyhow::Result<()> {
    match command {
        Commands::Sheet2json(args) => commands::sheet2json::handle(&args, config),
        Commands::Update(args) => commands::update::handle(&args, config),
        Commands::Awards(args) => commands::awards::handle(&args, config),
        Commands::Organizers(args) => commands::organizers::handle(&args, config),
        Commands::Paginate(args) => commands::paginate::handle(&args, config),
        Commands::Meta { action } => commands::meta::handle(&action, config),
        Commands::Revise { action } => commands::revise::handle(&action),
        Commands::Validate(args) => commands::validate::handle(&args),
        Commands::Schema(_) => unreachable!("schema is pre-dispatched in main"),
    }
}
