use anyhow::Context;
use sympo_core::projection::{revision_requests, revision_status};
use sympo_core::store;

use crate::cli::root_commands::{ReviseArgs, ReviseCommands, ReviseStatusArgs};
use crate::commands::shared;

/// Handle `sympo revise`.
pub fn handle(action: &ReviseCommands) -> anyhow::Result<()> {
    match action {
        ReviseCommands::Request(args) => request(args),
        ReviseCommands::Status(args) => status(args),
    }
}

/// Reports that match no paper are logged and left out; the rest are written.
fn request(args: &ReviseArgs) -> anyhow::Result<()> {
    let list = shared::read_data(&args.data)?;
    let reports = store::read_violations(&args.checks, &args.messages)
        .context("failed to read format-check results")?;

    let mut requests = Vec::new();
    for (report, result) in reports.iter().zip(revision_requests(&list, &reports)) {
        match result {
            Ok(request) if request.errors.is_empty() && request.comment.is_none() => {
                tracing::debug!(pdf = %report.pdf_name, "no violations");
            }
            Ok(request) => requests.push(request),
            Err(error) => tracing::warn!(pdf = %report.pdf_name, %error, "skipping report"),
        }
    }

    store::write_document(&args.output, &requests)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "{} of {} papers need revision -> {}",
        requests.len(),
        reports.len(),
        args.output.display()
    );
    Ok(())
}

fn status(args: &ReviseStatusArgs) -> anyhow::Result<()> {
    let requests = store::read_revision_requests(&args.requests)
        .with_context(|| format!("failed to read {}", args.requests.display()))?;
    let stems = store::revised_pdf_stems(&args.revised_dir)
        .with_context(|| format!("failed to scan {}", args.revised_dir.display()))?;

    let (status, unknown) = revision_status(&requests, &stems);
    for error in &unknown {
        tracing::warn!(%error, "ignoring revised file");
    }

    println!(
        "{} = {} missing + {} revised ({:.2} % revised)",
        status.total(),
        status.missing.len(),
        status.revised.len(),
        status.revised_percent()
    );
    for request in &status.missing {
        println!("- {} (paper {})", request.stem(), request.paper_id);
    }
    for request in &status.revised {
        println!("+ {} (paper {})", request.stem(), request.paper_id);
    }

    if let Some(output) = &args.output {
        store::write_document(output, &status)
            .with_context(|| format!("failed to write {}", output.display()))?;
    }
    Ok(())
}
