//! Helpers shared by the commands that rewrite the session JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use sympo_config::SympoConfig;
use sympo_core::patch::{SessionPatch, apply_updates, apply_updates_in_place};
use sympo_core::store;
use sympo_core::SessionList;

use crate::cli::root_commands::TargetArgs;

/// Resolve where merged data goes: `--output`, `--overwrite`, or
/// `general.overwrite` from the config.
pub fn target_path(data: &Path, target: &TargetArgs, config: &SympoConfig) -> anyhow::Result<PathBuf> {
    match (&target.output, target.overwrite || config.general.overwrite) {
        (Some(output), _) => Ok(output.clone()),
        (None, true) => Ok(data.to_path_buf()),
        (None, false) => bail!("no output given: pass --output <FILE> or --overwrite"),
    }
}

pub fn read_data(path: &Path) -> anyhow::Result<SessionList> {
    store::read_session_list(path).with_context(|| format!("failed to load {}", path.display()))
}

/// Merge `patches` into the data file and write the result.
///
/// In overwrite mode the list is patched in place; otherwise a merged copy is
/// written to the output. Nothing is written if the merge fails.
pub fn merge_and_write(
    data: &Path,
    patches: &[SessionPatch],
    target: &TargetArgs,
    config: &SympoConfig,
) -> anyhow::Result<()> {
    let out = target_path(data, target, config)?;
    let mut list = read_data(data)?;

    let merged = if out == data {
        apply_updates_in_place(&mut list, patches).context("patch rejected, data left unchanged")?;
        list
    } else {
        apply_updates(&list, patches).context("patch rejected, data left unchanged")?
    };

    store::write_session_list(&out, &merged)
        .with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(output = %out.display(), patches = patches.len(), "data updated");
    Ok(())
}
