//! Inspect command: show what a metadata file would download.

use anyhow::Result;
use emojidl_core::config::EmojidlConfig;
use emojidl_core::pack;
use std::path::Path;

/// Print pack name, target directory, and one line per emoji.
pub fn run_inspect(cfg: &EmojidlConfig, path: &Path) -> Result<()> {
    let pack = pack::load_pack(path)?;
    let (jobs, invalid) = pack.image_jobs(&cfg.output_dir, &cfg.image_url_template);

    println!("{}  ({} emojis)", pack.name, pack.emojis.len());
    println!("  dir: {}", cfg.output_dir.join(pack.dir_name()).display());
    for job in &jobs {
        println!("  {}  {}  {}", job.emoji.name, job.emoji.hash, job.url);
    }
    for bad in &invalid {
        println!("  {}  {}  (skipped: {})", bad.emoji.name, bad.emoji.hash, bad.reason);
    }
    Ok(())
}
