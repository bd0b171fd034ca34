//! Pipeline orchestration
//!
//! Resolves the root, discovers album roots and processes each one as an
//! independent unit on a fixed-size worker pool. A failing album is reported
//! and counted; it never affects its siblings.

use crate::album;
use crate::config::Settings;
use crate::discovery;
use crate::error::{M3uError, Result};
use crate::types::AlbumOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, error, info};

/// Number of albums processed concurrently
pub const ALBUM_WORKERS: usize = 4;

/// Pipeline result summary
#[derive(Debug)]
pub struct PipelineResult {
    pub total_albums: usize,
    pub successful: usize,
    pub failed: usize,
    pub outcomes: Vec<AlbumOutcome>,
}

/// Run the full pipeline over every immediate subdirectory of `settings.root`
pub fn run(settings: &Settings) -> Result<PipelineResult> {
    let pipeline_start = Instant::now();

    // Phase 1: Discovery
    let albums = discovery::album_roots(&settings.root)?;

    if albums.is_empty() {
        return Ok(PipelineResult {
            total_albums: 0,
            successful: 0,
            failed: 0,
            outcomes: Vec::new(),
        });
    }

    // Phase 2: Processing
    let pool = build_thread_pool(settings.workers)?;

    let progress_bar = if settings.show_progress {
        let pb = ProgressBar::new(albums.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} albums {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let successful = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let outcomes: Vec<AlbumOutcome> = pool.install(|| {
        albums
            .par_iter()
            .map(|path| {
                let outcome = process_unit(path);

                if outcome.is_success() {
                    successful.fetch_add(1, Ordering::Relaxed);
                } else {
                    failed.fetch_add(1, Ordering::Relaxed);
                }

                let line = outcome.summary_line();
                match &progress_bar {
                    Some(pb) => {
                        pb.suspend(|| println!("{}", line));
                        pb.inc(1);
                        pb.set_message(
                            path.file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .into_owned(),
                        );
                    }
                    None => println!("{}", line),
                }

                outcome
            })
            .collect()
    });

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    let result = PipelineResult {
        total_albums: albums.len(),
        successful: successful.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
        outcomes,
    };

    info!(
        "Processed {} albums ({} failed) in {:.2}s",
        result.total_albums,
        result.failed,
        pipeline_start.elapsed().as_secs_f64()
    );

    Ok(result)
}

/// Process one album, catching every error at the unit boundary
fn process_unit(path: &Path) -> AlbumOutcome {
    debug!("Processing album {}", path.display());

    match album::process_album(path) {
        Ok(report) => AlbumOutcome::Done(report),
        Err(e) => {
            error!("Album {} failed: {}", path.display(), e);
            AlbumOutcome::Failed {
                root: path.to_path_buf(),
                error: e,
            }
        }
    }
}

/// Build a dedicated pool so repeated runs (and tests) each get their own
fn build_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads.max(1))
        .thread_name(|i| format!("album-worker-{}", i))
        .build()
        .map_err(|e| M3uError::Config(format!("Failed to configure thread pool: {}", e)))?;
    debug!("Configured thread pool with {} threads", pool.current_num_threads());
    Ok(pool)
}
