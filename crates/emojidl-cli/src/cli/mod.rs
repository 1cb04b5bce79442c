//! CLI for the emojidl emoji pack downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use emojidl_core::config;
use std::path::PathBuf;

use commands::{run_images, run_inspect, run_sweep, ImageArgs, SweepArgs};

/// Top-level CLI for emojidl.
#[derive(Debug, Parser)]
#[command(name = "emojidl")]
#[command(about = "emojidl: sweep emoji pack metadata ids and download pack images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch metadata files for an id range into the data directory.
    Sweep {
        /// First id to request (default from config).
        #[arg(long, value_name = "ID")]
        from: Option<u64>,
        /// Last id to request, inclusive. Without it the sweep runs until the 404 threshold.
        #[arg(long, value_name = "ID")]
        to: Option<u64>,
        /// Parallel requests.
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,
        /// Stop after N consecutive 404s (0 = never; requires --to).
        #[arg(long, value_name = "N")]
        stop_after: Option<u64>,
        /// Directory for `<id>.js` files.
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Download every emoji image referenced by metadata files.
    Images {
        /// Metadata files to read. Defaults to every `*.js` in the data directory.
        paths: Vec<PathBuf>,
        /// File with one metadata path per line.
        #[arg(long, value_name = "FILE")]
        list: Option<PathBuf>,
        /// Directory scanned when no paths are given.
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
        /// Root of the per-pack image directories.
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Parallel requests.
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,
        /// Re-download images that already exist.
        #[arg(long)]
        overwrite: bool,
    },

    /// Print a metadata file's pack name and emoji list.
    Inspect {
        /// Path to the metadata file.
        path: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Sweep {
                from,
                to,
                concurrency,
                stop_after,
                data_dir,
            } => {
                let args = SweepArgs {
                    from,
                    to,
                    concurrency,
                    stop_after,
                    data_dir,
                };
                run_sweep(&cfg, args).await?
            }
            CliCommand::Images {
                paths,
                list,
                data_dir,
                out_dir,
                concurrency,
                overwrite,
            } => {
                let args = ImageArgs {
                    paths,
                    list,
                    data_dir,
                    out_dir,
                    concurrency,
                    overwrite,
                };
                run_images(&cfg, args).await?
            }
            CliCommand::Inspect { path } => run_inspect(&cfg, &path)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
