//! Image fetcher: metadata files in, one PNG per emoji out.
//!
//! Packs are read one after another; their emoji downloads share a single
//! bounded pool. A bad metadata file, an empty pack or a failed image is
//! logged and counted, and the run continues.

mod inputs;

pub use inputs::{parse_path_list, resolve_inputs, scan_metadata_dir};

use anyhow::Result;
use std::path::PathBuf;

use crate::config::EmojidlConfig;
use crate::http::{self, FetchError, HttpOptions};
use crate::pack::{self, ImageJob};
use crate::pool::BoundedPool;
use crate::storage;

#[derive(Debug, Clone)]
pub struct ImageOptions {
    pub concurrency: usize,
    /// Root of the per-pack directories.
    pub out_dir: PathBuf,
    pub image_url_template: String,
    pub http: HttpOptions,
    /// Re-download images that already exist.
    pub overwrite: bool,
}

impl ImageOptions {
    pub fn from_config(cfg: &EmojidlConfig) -> Self {
        Self {
            concurrency: cfg.image_concurrency,
            out_dir: cfg.output_dir.clone(),
            image_url_template: cfg.image_url_template.clone(),
            http: cfg.http_options(),
            overwrite: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("image concurrency must be at least 1");
        }
        if !self.image_url_template.contains("{hash}") {
            anyhow::bail!(
                "image URL template must contain {{hash}}: {}",
                self.image_url_template
            );
        }
        Ok(())
    }
}

/// Result of one image download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Saved,
    /// Target file already present and `overwrite` is off.
    Skipped,
    NotFound,
    Failed,
}

/// Counts for a finished image run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageReport {
    /// Metadata files parsed successfully.
    pub packs: u64,
    /// Parsed packs with no emoji entries.
    pub empty_packs: u64,
    /// Metadata files that could not be read or parsed.
    pub bad_files: u64,
    pub saved: u64,
    pub skipped: u64,
    pub not_found: u64,
    pub failed: u64,
    /// Emoji entries that could not be turned into a URL.
    pub invalid: u64,
}

impl ImageReport {
    fn tally(&mut self, outcome: ImageOutcome) {
        match outcome {
            ImageOutcome::Saved => self.saved += 1,
            ImageOutcome::Skipped => self.skipped += 1,
            ImageOutcome::NotFound => self.not_found += 1,
            ImageOutcome::Failed => self.failed += 1,
        }
    }
}

/// Download every emoji image referenced by `metadata_paths`.
pub async fn run_images(metadata_paths: &[PathBuf], opts: &ImageOptions) -> Result<ImageReport> {
    opts.validate()?;
    let mut pool: BoundedPool<ImageOutcome> = BoundedPool::new(opts.concurrency);
    let mut report = ImageReport::default();

    tracing::info!(
        files = metadata_paths.len(),
        concurrency = opts.concurrency,
        out_dir = %opts.out_dir.display(),
        "image fetch starting"
    );

    for path in metadata_paths {
        let pack = match pack::load_pack_async(path.clone()).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("skipping metadata file: {:#}", e);
                report.bad_files += 1;
                continue;
            }
        };
        report.packs += 1;

        if pack.emojis.is_empty() {
            tracing::info!("no emojis in {}", pack.name);
            report.empty_packs += 1;
            continue;
        }

        let (jobs, invalid) = pack.image_jobs(&opts.out_dir, &opts.image_url_template);
        for bad in invalid {
            tracing::warn!(
                pack = %pack.name,
                emoji = %bad.emoji.name,
                "skipping emoji: {}",
                bad.reason
            );
            report.invalid += 1;
        }

        tracing::debug!(pack = %pack.name, images = jobs.len(), "queueing pack");
        for job in jobs {
            pool.spawn(fetch_image(
                pack.name.clone(),
                job,
                opts.http.clone(),
                opts.overwrite,
            ))
            .await?;
            while let Some(outcome) = pool.try_next() {
                report.tally(outcome);
            }
        }
    }

    let drained = pool.drain().await;
    for outcome in drained.outputs {
        report.tally(outcome);
    }
    report.failed += drained.panicked as u64;

    tracing::info!(?report, "image fetch finished");
    Ok(report)
}

async fn fetch_image(
    pack_name: String,
    job: ImageJob,
    http: HttpOptions,
    overwrite: bool,
) -> ImageOutcome {
    if !overwrite && tokio::fs::try_exists(&job.path).await.unwrap_or(false) {
        tracing::debug!(path = %job.path.display(), "already on disk, skipping");
        return ImageOutcome::Skipped;
    }

    match http::get_blocking(job.url.clone(), http).await {
        Ok(body) => {
            tracing::info!(pack = %pack_name, emoji = %job.emoji.name, "saving");
            match storage::write_atomic_async(job.path.clone(), body).await {
                Ok(()) => ImageOutcome::Saved,
                Err(e) => {
                    tracing::warn!("write failed: {:#}", e);
                    ImageOutcome::Failed
                }
            }
        }
        Err(FetchError::NotFound) => {
            tracing::warn!(url = %job.url, "not found");
            ImageOutcome::NotFound
        }
        Err(e) => {
            tracing::warn!(url = %job.url, "error: {}", e);
            ImageOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_copies_defaults() {
        let o = ImageOptions::from_config(&EmojidlConfig::default());
        assert_eq!(o.concurrency, 20);
        assert_eq!(o.out_dir, PathBuf::from("downloaded"));
        assert!(!o.overwrite);
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut o = ImageOptions::from_config(&EmojidlConfig::default());
        o.validate().unwrap();
        o.concurrency = 0;
        assert!(o.validate().is_err());
    }

    #[tokio::test]
    async fn run_rejects_zero_concurrency() {
        let mut o = ImageOptions::from_config(&EmojidlConfig::default());
        o.concurrency = 0;
        assert!(run_images(&[], &o).await.is_err());
    }

    #[tokio::test]
    async fn bad_and_empty_files_are_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("1.js");
        let empty = dir.path().join("2.js");
        std::fs::write(&bad, b"<html>gateway error</html>").unwrap();
        std::fs::write(
            &empty,
            br#"var x = {"data":{"baseInfo":[{"name":"Empty"}],"md5Info":[]}};"#,
        )
        .unwrap();
        let missing = dir.path().join("3.js");

        let mut opts = ImageOptions::from_config(&EmojidlConfig::default());
        opts.out_dir = dir.path().join("out");
        let report = run_images(&[bad, empty, missing], &opts).await.unwrap();

        assert_eq!(report.bad_files, 2);
        assert_eq!(report.packs, 1);
        assert_eq!(report.empty_packs, 1);
        assert_eq!(report.saved, 0);
        assert!(!opts.out_dir.exists());
    }

    #[tokio::test]
    async fn existing_images_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let meta = dir.path().join("9.js");
        std::fs::write(
            &meta,
            br#"var x = {"data":{"baseInfo":[{"name":"Cats"}],"md5Info":[{"name":"nap","md5":"ab01"},{"name":"x","md5":"z"}]}};"#,
        )
        .unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(out.join("Cats")).unwrap();
        std::fs::write(out.join("Cats").join("nap.png"), b"old").unwrap();

        let mut opts = ImageOptions::from_config(&EmojidlConfig::default());
        opts.out_dir = out.clone();
        opts.image_url_template = "http://127.0.0.1:9/{prefix}/{hash}.png".to_string();
        let report = run_images(&[meta], &opts).await.unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.invalid, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(std::fs::read(out.join("Cats").join("nap.png")).unwrap(), b"old");
    }
}
