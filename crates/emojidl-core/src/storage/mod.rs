//! Disk writes for fetched bodies.
//!
//! Every body goes to a `.part` temp file first, is fsynced, then renamed
//! to its final name, so an existing final file is always complete.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `1.js` → `1.js.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Write `data` to `final_path` via temp file + rename. Creates parent directories.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = final_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    }

    let tp = temp_path(final_path);
    let mut f = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tp)
        .with_context(|| format!("failed to create temp file: {}", tp.display()))?;
    f.write_all(data)
        .with_context(|| format!("write {}", tp.display()))?;
    f.sync_all().context("storage sync failed")?;
    drop(f);

    std::fs::rename(&tp, final_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            tp.display(),
            final_path.display()
        )
    })?;
    Ok(())
}

/// Async wrapper: runs `write_atomic` on the blocking pool.
pub async fn write_atomic_async(final_path: PathBuf, data: Vec<u8>) -> Result<()> {
    tokio::task::spawn_blocking(move || write_atomic(&final_path, &data))
        .await
        .context("storage task join")?
}
