//! Run coordination.
//!
//! Drives one extraction run through its three phases: collecting eligible
//! files, extracting them in lexicographic relative-path order, and
//! rendering once at the end. Bundles are computed in parallel; merging into
//! the index stays sequential and ordered so output is deterministic.
//!
//! Cancellation is checked before each file is aggregated and again before
//! each merge, so a cancelled run stops dispatching work. It still renders
//! whatever was accumulated; the partial report is valid output.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ExtractConfig;
use crate::extractors::manager::aggregate_file;
use crate::index::ProjectIndex;
use crate::render;
use crate::scan;

/// How each candidate file ended up. Every file lands in exactly one count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Merged into the index.
    pub processed: usize,
    /// Examined, but produced nothing reportable.
    pub excluded: usize,
    /// Not reached: the line budget stopped extraction, or the run was
    /// cancelled.
    pub skipped: usize,
    /// Read or decode failure; logged and passed over.
    pub errored: usize,
}

impl RunStats {
    pub fn total(&self) -> usize {
        self.processed + self.excluded + self.skipped + self.errored
    }
}

/// Cooperative cancellation flag, safe to share with a signal handler.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct RunOutcome {
    pub report: String,
    pub stats: RunStats,
}

/// Execute one full run over the tree at `root`.
pub fn run(root: &Path, config: &ExtractConfig, cancel: &CancelToken) -> Result<RunOutcome> {
    config.validate()?;

    let files = scan::collect_files(root, config)?;
    info!(files = files.len(), "collected source files");

    // `None` marks a file the cancellation flag kept from being read.
    let bundles: Vec<_> = files
        .par_iter()
        .map(|file| {
            if cancel.is_cancelled() {
                return None;
            }
            Some(aggregate_file(&file.path, &file.rel_path, config))
        })
        .collect();

    let mut index = ProjectIndex::new();
    let mut stats = RunStats::default();

    for (position, (file, bundle)) in files.iter().zip(bundles).enumerate() {
        if cancel.is_cancelled() {
            stats.skipped += files.len() - position;
            info!(merged = stats.processed, "cancelled, rendering partial report");
            break;
        }
        let Some(bundle) = bundle else {
            stats.skipped += 1;
            continue;
        };
        let bundle = match bundle {
            Ok(bundle) => bundle,
            Err(err) => {
                warn!(file = %file.rel_path, error = %err, "extraction failed");
                stats.errored += 1;
                continue;
            }
        };
        if bundle.is_empty() {
            stats.excluded += 1;
            continue;
        }
        // The next file is taken whole or not at all.
        if index.total_lines() + ProjectIndex::lines_for(&bundle) > config.max_lines {
            stats.skipped += files.len() - position;
            info!(
                merged = stats.processed,
                budget = config.max_lines,
                "line budget reached, stopping extraction"
            );
            break;
        }
        index.merge(bundle);
        stats.processed += 1;
        if stats.processed % 10 == 0 {
            info!(processed = stats.processed, total = files.len(), "extracting");
        }
    }

    let report = render::render(&index, &stats, config.format);
    info!(
        processed = stats.processed,
        excluded = stats.excluded,
        skipped = stats.skipped,
        errored = stats.errored,
        lines = index.total_lines(),
        "run complete"
    );
    Ok(RunOutcome { report, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::manager::aggregate_content;
    use std::fs;

    const COMPONENT: &str = "export const Widget = () => { return (<View />); };";

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn every_file_lands_in_exactly_one_count() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.tsx", COMPONENT);
        write(dir.path(), "src/b.tsx", COMPONENT);
        write(dir.path(), "src/constants.ts", "const RATIO = 1;");
        write(dir.path(), "src/broken.json", "{ not json");

        let config = ExtractConfig::default();
        let outcome = run(dir.path(), &config, &CancelToken::new()).unwrap();
        assert_eq!(outcome.stats.processed, 2);
        assert_eq!(outcome.stats.excluded, 1);
        assert_eq!(outcome.stats.errored, 1);
        assert_eq!(outcome.stats.skipped, 0);
        assert_eq!(outcome.stats.total(), 4);
    }

    #[test]
    fn budget_keeps_an_exact_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.tsx", COMPONENT);
        write(dir.path(), "src/b.tsx", COMPONENT);
        write(dir.path(), "src/c.tsx", COMPONENT);

        let mut config = ExtractConfig::default();
        let cost = ProjectIndex::lines_for(
            &aggregate_content(COMPONENT, "src/a.tsx", &config).unwrap(),
        );
        assert!(cost > 0);
        config.max_lines = cost;

        let outcome = run(dir.path(), &config, &CancelToken::new()).unwrap();
        assert_eq!(outcome.stats.processed, 1);
        assert_eq!(outcome.stats.skipped, 2);
        assert!(outcome.report.contains("=== src/a.tsx ==="));
        assert!(!outcome.report.contains("=== src/b.tsx ==="));
        assert!(!outcome.report.contains("=== src/c.tsx ==="));
    }

    #[test]
    fn cancelled_run_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.tsx", COMPONENT);

        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = run(dir.path(), &ExtractConfig::default(), &cancel).unwrap();
        assert_eq!(outcome.stats.processed, 0);
        assert_eq!(outcome.stats.skipped, 1);
        assert!(outcome.report.contains("=== CODE CONTEXT ==="));
    }

    #[test]
    fn cancelled_run_abandons_unread_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.tsx", COMPONENT);
        write(dir.path(), "src/broken.json", "{ not json");

        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = run(dir.path(), &ExtractConfig::default(), &cancel).unwrap();
        // The unparseable file is never read, so it counts as skipped
        // rather than errored.
        assert_eq!(outcome.stats.processed, 0);
        assert_eq!(outcome.stats.errored, 0);
        assert_eq!(outcome.stats.skipped, 2);
        assert!(outcome.report.contains("=== CODE CONTEXT ==="));
    }
}
