//! ID sweep: fetch one metadata file per id until the ids run out.
//!
//! Ids are dispatched in ascending order through a bounded pool. Each id is
//! written to `<data_dir>/<id>.js`; ids already on disk are skipped without a
//! request. The sweep ends at `end_id`, or once `stop_after_misses`
//! consecutive ids have returned 404.

mod tracker;

pub use tracker::{IdOutcome, MissTracker};

use anyhow::{Context, Result};
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::config::EmojidlConfig;
use crate::http::{self, FetchError, HttpOptions};
use crate::pool::BoundedPool;
use crate::storage;
use crate::template;

/// Inputs for one sweep run.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub start_id: u64,
    /// Inclusive upper bound; `None` runs until the miss threshold trips.
    pub end_id: Option<u64>,
    pub concurrency: usize,
    pub stop_after_misses: u64,
    pub data_dir: PathBuf,
    pub metadata_url_template: String,
    pub http: HttpOptions,
}

impl SweepOptions {
    pub fn from_config(cfg: &EmojidlConfig) -> Self {
        Self {
            start_id: cfg.start_id,
            end_id: None,
            concurrency: cfg.sweep_concurrency,
            stop_after_misses: cfg.stop_after_misses,
            data_dir: cfg.data_dir.clone(),
            metadata_url_template: cfg.metadata_url_template.clone(),
            http: cfg.http_options(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("sweep concurrency must be at least 1");
        }
        if !self.metadata_url_template.contains("{id}") {
            anyhow::bail!(
                "metadata URL template must contain {{id}}: {}",
                self.metadata_url_template
            );
        }
        if let Some(end) = self.end_id {
            if end < self.start_id {
                anyhow::bail!("end id {} is below start id {}", end, self.start_id);
            }
        } else if self.stop_after_misses == 0 {
            anyhow::bail!("an open-ended sweep needs stop_after_misses >= 1 or an end id");
        }
        Ok(())
    }
}

/// Counts for a finished sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub saved: u64,
    pub skipped: u64,
    pub not_found: u64,
    pub failed: u64,
    /// Highest id handed to a worker.
    pub last_dispatched: Option<u64>,
    /// True when the sweep ended on the consecutive-404 threshold.
    pub stopped_on_misses: bool,
}

impl SweepReport {
    fn tally(&mut self, outcome: IdOutcome) {
        match outcome {
            IdOutcome::Saved => self.saved += 1,
            IdOutcome::Skipped => self.skipped += 1,
            IdOutcome::NotFound => self.not_found += 1,
            IdOutcome::Failed => self.failed += 1,
        }
    }
}

/// Where the metadata for `id` is stored.
pub fn metadata_path(data_dir: &Path, id: u64) -> PathBuf {
    data_dir.join(format!("{}.js", id))
}

/// Run the sweep. Per-id failures are logged and counted, never returned;
/// only setup errors (bad options, unwritable data dir) fail the call.
pub async fn run_sweep(opts: &SweepOptions) -> Result<SweepReport> {
    opts.validate()?;
    tokio::fs::create_dir_all(&opts.data_dir)
        .await
        .with_context(|| format!("create data dir {}", opts.data_dir.display()))?;

    tracing::info!(
        start = opts.start_id,
        end = ?opts.end_id,
        concurrency = opts.concurrency,
        stop_after_misses = opts.stop_after_misses,
        "sweep starting"
    );

    let mut pool: BoundedPool<(u64, IdOutcome)> = BoundedPool::new(opts.concurrency);
    let mut tracker = MissTracker::new(opts.start_id, opts.stop_after_misses);
    let mut report = SweepReport::default();
    let mut id = opts.start_id;

    loop {
        if opts.end_id.is_some_and(|end| id > end) {
            break;
        }

        let slot = pool.reserve().await?;
        while let Some((done, outcome)) = pool.try_next() {
            tracker.record(done, outcome);
            report.tally(outcome);
        }
        if tracker.should_stop() {
            tracing::info!(
                run = tracker.current_run(),
                "consecutive 404 threshold reached, no more ids dispatched"
            );
            break;
        }

        let url = template::metadata_url(&opts.metadata_url_template, id);
        let path = metadata_path(&opts.data_dir, id);
        pool.spawn_in(slot, guarded(id, fetch_id(id, url, path, opts.http.clone())));
        report.last_dispatched = Some(id);

        id = match id.checked_add(1) {
            Some(n) => n,
            None => break,
        };
    }

    let drained = pool.drain().await;
    for (done, outcome) in drained.outputs {
        tracker.record(done, outcome);
        report.tally(outcome);
    }
    report.failed += drained.panicked as u64;
    report.stopped_on_misses = tracker.should_stop();

    tracing::info!(?report, "sweep finished");
    Ok(report)
}

/// Runs `fut` as its own task so that a panic still reports an outcome for
/// `id`; otherwise the miss tracker would wait on that id forever.
async fn guarded<F>(id: u64, fut: F) -> (u64, IdOutcome)
where
    F: Future<Output = IdOutcome> + Send + 'static,
{
    match tokio::spawn(fut).await {
        Ok(outcome) => (id, outcome),
        Err(e) => {
            tracing::warn!(id, "fetch task failed: {}", e);
            (id, IdOutcome::Failed)
        }
    }
}

async fn fetch_id(id: u64, url: String, path: PathBuf, http: HttpOptions) -> IdOutcome {
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        tracing::debug!(id, "already on disk, skipping");
        return IdOutcome::Skipped;
    }

    tracing::info!(id, "fetching");
    match http::get_blocking(url, http).await {
        Ok(body) => match storage::write_atomic_async(path, body).await {
            Ok(()) => IdOutcome::Saved,
            Err(e) => {
                tracing::warn!(id, "write failed: {:#}", e);
                IdOutcome::Failed
            }
        },
        Err(FetchError::NotFound) => {
            tracing::debug!(id, "not found");
            IdOutcome::NotFound
        }
        Err(e) => {
            tracing::warn!(id, "error: {}", e);
            IdOutcome::Failed
        }
    }
}
