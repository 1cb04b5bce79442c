//! `emojidl images` – download pack images from metadata files.

use anyhow::Result;
use emojidl_core::config::EmojidlConfig;
use emojidl_core::images::{self, ImageOptions};
use std::path::PathBuf;

/// Flag values; `None` means "use the config value".
#[derive(Debug, Default)]
pub struct ImageArgs {
    pub paths: Vec<PathBuf>,
    pub list: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub overwrite: bool,
}

/// Config defaults overridden by flags.
pub fn image_options(cfg: &EmojidlConfig, args: &ImageArgs) -> ImageOptions {
    let mut opts = ImageOptions::from_config(cfg);
    if let Some(dir) = &args.out_dir {
        opts.out_dir = dir.clone();
    }
    if let Some(n) = args.concurrency {
        opts.concurrency = n;
    }
    opts.overwrite = args.overwrite;
    opts
}

pub async fn run_images(cfg: &EmojidlConfig, args: ImageArgs) -> Result<()> {
    let opts = image_options(cfg, &args);
    opts.validate()?;
    let data_dir = args.data_dir.unwrap_or_else(|| cfg.data_dir.clone());
    let inputs = images::resolve_inputs(&args.paths, args.list.as_deref(), &data_dir)?;
    if inputs.is_empty() {
        println!("No metadata files found.");
        return Ok(());
    }
    tracing::debug!(files = inputs.len(), "resolved metadata inputs");

    let report = images::run_images(&inputs, &opts).await?;

    println!(
        "packs {} (empty {}, unreadable {})",
        report.packs, report.empty_packs, report.bad_files
    );
    println!(
        "images saved {}  skipped {}  not found {}  failed {}  invalid {}",
        report.saved, report.skipped, report.not_found, report.failed, report.invalid
    );
    println!("images in {}", opts.out_dir.display());
    Ok(())
}
