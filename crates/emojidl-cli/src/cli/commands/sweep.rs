//! `emojidl sweep` – fetch metadata files for an id range.

use anyhow::Result;
use emojidl_core::config::EmojidlConfig;
use emojidl_core::sweep::{self, SweepOptions};
use std::path::PathBuf;

/// Flag values; `None` means "use the config value".
#[derive(Debug, Default)]
pub struct SweepArgs {
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub concurrency: Option<usize>,
    pub stop_after: Option<u64>,
    pub data_dir: Option<PathBuf>,
}

/// Config defaults overridden by flags.
pub fn sweep_options(cfg: &EmojidlConfig, args: SweepArgs) -> SweepOptions {
    let mut opts = SweepOptions::from_config(cfg);
    if let Some(from) = args.from {
        opts.start_id = from;
    }
    opts.end_id = args.to;
    if let Some(n) = args.concurrency {
        opts.concurrency = n;
    }
    if let Some(n) = args.stop_after {
        opts.stop_after_misses = n;
    }
    if let Some(dir) = args.data_dir {
        opts.data_dir = dir;
    }
    opts
}

pub async fn run_sweep(cfg: &EmojidlConfig, args: SweepArgs) -> Result<()> {
    let opts = sweep_options(cfg, args);
    let report = sweep::run_sweep(&opts).await?;

    println!(
        "saved {}  skipped {}  not found {}  failed {}",
        report.saved, report.skipped, report.not_found, report.failed
    );
    match (report.last_dispatched, report.stopped_on_misses) {
        (Some(last), true) => println!(
            "stopped after {} consecutive 404s (last id tried: {})",
            opts.stop_after_misses, last
        ),
        (Some(last), false) => println!("last id tried: {}", last),
        (None, _) => println!("no ids requested"),
    }
    println!("metadata in {}", opts.data_dir.display());
    Ok(())
}
