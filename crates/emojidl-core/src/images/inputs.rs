//! Which metadata files the image fetcher reads.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Split a newline-separated path list. Blank lines and `#` comments are dropped.
pub fn parse_path_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}

/// All `*.js` files directly under `dir`, numeric stems first in id order.
pub fn scan_metadata_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read data dir {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("read data dir {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|e| e == "js") {
            files.push(path);
        }
    }
    files.sort_by_cached_key(|p| {
        let id = p
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u64>().ok());
        (id.is_none(), id, p.clone())
    });
    Ok(files)
}

/// Explicit paths plus the entries of `list_file`, in that order and without
/// duplicates. Only when neither is given, every metadata file in `data_dir`;
/// an empty list file yields an empty input set.
pub fn resolve_inputs(
    explicit: &[PathBuf],
    list_file: Option<&Path>,
    data_dir: &Path,
) -> Result<Vec<PathBuf>> {
    if explicit.is_empty() && list_file.is_none() {
        return scan_metadata_dir(data_dir);
    }
    let mut paths: Vec<PathBuf> = explicit.to_vec();
    if let Some(list) = list_file {
        let text = std::fs::read_to_string(list)
            .with_context(|| format!("read path list {}", list.display()))?;
        paths.extend(parse_path_list(&text));
    }
    let mut seen = HashSet::new();
    paths.retain(|p| seen.insert(p.clone()));
    Ok(paths)
}
