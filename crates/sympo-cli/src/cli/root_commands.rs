use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Convert a conference-system CSV export into the session JSON.
    Sheet2json(Sheet2jsonArgs),
    /// Apply a patch document to the session JSON.
    Update(UpdateArgs),
    /// Set paper awards from an awards file.
    Awards(AwardsArgs),
    /// Attach special-session organizers from an organizers file.
    Organizers(OrganizersArgs),
    /// Assign consecutive page ranges from known page counts.
    Paginate(PaginateArgs),
    /// Export metadata CSV rows.
    Meta {
        #[command(subcommand)]
        action: MetaCommands,
    },
    /// Build revision requests and follow up on revised uploads.
    Revise {
        #[command(subcommand)]
        action: ReviseCommands,
    },
    /// Print a JSON Schema, or list schema names.
    Schema(SchemaArgs),
    /// Validate a JSON document against a schema.
    Validate(ValidateArgs),
}

/// Where a command that produces a new session JSON writes it.
#[derive(Clone, Debug, Args)]
pub struct TargetArgs {
    /// Output file for the merged data
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the merged data back over the input file
    #[arg(long, conflicts_with = "output")]
    pub overwrite: bool,
}

#[derive(Clone, Debug, Args)]
pub struct Sheet2jsonArgs {
    /// CSV export, one row per accepted paper
    pub sheet: PathBuf,

    /// Output session JSON
    #[arg(short, long)]
    pub output: PathBuf,

    /// Hours east of GMT (overrides sheet.tz_offset_h)
    #[arg(long, allow_negative_numbers = true)]
    pub tz_offset_h: Option<i32>,
}

#[derive(Clone, Debug, Args)]
pub struct UpdateArgs {
    /// Session JSON to patch
    pub data: PathBuf,

    /// Patch document: an array of session patches
    pub patch: PathBuf,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Clone, Debug, Args)]
pub struct AwardsArgs {
    pub data: PathBuf,

    /// Awards file: `[{"id": <paper id>, "awards": [...]}]`
    pub awards: PathBuf,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Clone, Debug, Args)]
pub struct OrganizersArgs {
    pub data: PathBuf,

    /// Organizers file: `[{"categories": [...], "title": ..., "organizers": [...]}]`
    pub organizers: PathBuf,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Clone, Debug, Args)]
pub struct PaginateArgs {
    pub data: PathBuf,

    /// Page counts by paper id: `{"12": 4, ...}`
    pub page_counts: PathBuf,

    /// Number of the first page (overrides general.first_page)
    #[arg(long)]
    pub first_page: Option<u32>,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Clone, Debug, Subcommand)]
pub enum MetaCommands {
    /// One row per session.
    Sessions(MetaArgs),
    /// One row per paper.
    Papers(MetaArgs),
    /// The single event-wide row.
    Common(CommonArgs),
}

#[derive(Clone, Debug, Args)]
pub struct MetaArgs {
    pub data: PathBuf,

    /// Output CSV
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct CommonArgs {
    /// Event description JSON (dates, venue, publication)
    pub common: PathBuf,

    /// Output CSV
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Clone, Debug, Subcommand)]
pub enum ReviseCommands {
    /// Build revision requests from a format-check sheet.
    Request(ReviseArgs),
    /// Compare revised PDFs against the outstanding requests.
    Status(ReviseStatusArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ReviseStatusArgs {
    /// Revision requests written by `revise request`
    pub requests: PathBuf,

    /// Directory holding the revised PDFs, searched recursively
    pub revised_dir: PathBuf,

    /// Also write the revised/missing split as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct ReviseArgs {
    pub data: PathBuf,

    /// Format-check sheet: PDF_NAME, EXTRA_COMMENTS and one 0/1 column per rule
    pub checks: PathBuf,

    /// Rule messages: ERR_KEY, ERR_MSG
    pub messages: PathBuf,

    /// Output JSON of revision requests
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name; omit to list all names
    pub name: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    /// Schema name, e.g. session_list or patch_document
    pub schema: String,

    pub file: PathBuf,
}
