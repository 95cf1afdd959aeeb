use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::GlobalFlags;
pub use root_commands::Commands;

/// Top-level CLI parser for the `sympo` binary.
#[derive(Debug, Parser)]
#[command(name = "sympo", version, about = "Symposium proceedings data tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ./sympo.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Flags that apply to every subcommand, detached from the parse tree.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            config: self.config.clone(),
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};

    use super::root_commands::{MetaCommands, ReviseCommands, SchemaArgs};
    use super::{Cli, Commands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sympo",
            "sheet2json",
            "sheet.csv",
            "-o",
            "data.json",
            "--config",
            "conf.toml",
            "--verbose",
        ])
        .expect("cli should parse");

        assert!(cli.verbose);
        assert_eq!(cli.global_flags().config.as_deref(), Some(Path::new("conf.toml")));
        let Commands::Sheet2json(args) = cli.command else {
            panic!("expected sheet2json");
        };
        assert_eq!(args.sheet, Path::new("sheet.csv"));
        assert_eq!(args.tz_offset_h, None);
    }

    #[test]
    fn update_accepts_overwrite_flag() {
        let cli = Cli::try_parse_from(["sympo", "update", "data.json", "patch.json", "--overwrite"])
            .expect("cli should parse");
        let Commands::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert!(args.target.overwrite);
        assert_eq!(args.target.output, None);
    }

    #[test]
    fn overwrite_conflicts_with_output() {
        let result = Cli::try_parse_from([
            "sympo", "update", "data.json", "patch.json", "--overwrite", "-o", "out.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn meta_has_sessions_and_papers() {
        let cli = Cli::try_parse_from(["sympo", "meta", "papers", "data.json", "-o", "papers.csv"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Meta { action: MetaCommands::Papers(_) }
        ));
    }

    #[test]
    fn meta_common_takes_the_event_file() {
        let cli = Cli::try_parse_from(["sympo", "meta", "common", "common.json", "-o", "common.csv"])
            .expect("cli should parse");
        let Commands::Meta { action: MetaCommands::Common(args) } = cli.command else {
            panic!("expected meta common");
        };
        assert_eq!(args.common, Path::new("common.json"));
        assert_eq!(args.output, Path::new("common.csv"));
    }

    #[test]
    fn revise_splits_request_and_status() {
        let cli = Cli::try_parse_from([
            "sympo", "revise", "request", "data.json", "checks.csv", "messages.csv", "-o", "revise.json",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Revise { action: ReviseCommands::Request(_) }
        ));

        let cli = Cli::try_parse_from(["sympo", "revise", "status", "revise.json", "revised/"])
            .expect("cli should parse");
        let Commands::Revise { action: ReviseCommands::Status(args) } = cli.command else {
            panic!("expected revise status");
        };
        assert_eq!(args.revised_dir, Path::new("revised/"));
        assert_eq!(args.output, None);
    }

    #[test]
    fn schema_without_name_lists() {
        let cli = Cli::try_parse_from(["sympo", "schema"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Schema(SchemaArgs { name: None })));
    }
}
