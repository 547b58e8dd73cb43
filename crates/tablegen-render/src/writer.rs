use std::fs;
use std::path::Path;

use tracing::info;

use tablegen_core::Result;

/// What happened to the destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Destination already existed and overwrite is disabled.
    SkippedExisting,
}

/// Persist one rendered artifact.
///
/// Parent directories are created as needed. An existing destination
/// is skipped (not an error) unless overwrite is enabled. The write is
/// a single scoped acquisition with no partial-write recovery.
pub fn write_artifact(path: &Path, contents: &str, overwrite: bool) -> Result<WriteOutcome> {
    if path.exists() && !overwrite {
        info!(path = %path.display(), "destination exists, skipping write");
        return Ok(WriteOutcome::SkippedExisting);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    Ok(WriteOutcome::Written)
}
