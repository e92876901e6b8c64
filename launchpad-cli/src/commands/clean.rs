//! `clean` command handler

use anyhow::{Context, Result};
use launchpad_runner::RunContext;
use std::io::ErrorKind;
use std::path::Path;

use super::output;

/// Removes generated state and evidence
///
/// Terraform's own state is never touched, and database backups are kept.
pub fn clean(ctx: &mut RunContext) -> Result<()> {
    ctx.clear_target()?;
    ctx.evidence.clear()?;

    remove_state_dir(ctx.state_dir())?;

    output::success("Generated state and evidence removed");
    Ok(())
}

/// Removes the state directory once nothing else (backups) is left in it
fn remove_state_dir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::DirectoryNotEmpty) => {
            tracing::debug!("Keeping {}: {}", dir.display(), e);
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("failed to remove {}", dir.display())),
    }
}
