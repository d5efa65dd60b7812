//! Sorting run over an input directory
//!
//! Handles the core loop of:
//! - Scanning the input directory for pictures
//! - Resolving each picture's capture date
//! - Filtering by the configured date range
//! - Finding the matching library folder and asking what to do

use crate::config::{Config, DATE_FORMAT};
use crate::decision::{DecisionEngine, Outcome};
use crate::error::{Error, Result};
use crate::library::find_folder;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::time::DateResolver;
use crate::viewer::{ProcessViewer, Viewer};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{Level, debug, info, span, warn};
use walkdir::WalkDir;

/// Capture dates accepted by a run, both bounds included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFilter {
    pub start: NaiveDate,
    pub stop: NaiveDate,
}

impl DateFilter {
    pub fn new(start: NaiveDate, stop: NaiveDate) -> Self {
        Self { start, stop }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.stop
    }
}

impl From<&Config> for DateFilter {
    fn from(config: &Config) -> Self {
        Self::new(config.start, config.stop)
    }
}

/// Counters of a sorting run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total_files: usize,
    pub out_of_range: usize,
    pub moved: usize,
    pub left: usize,
    pub skipped: usize,
    pub undated: usize,
    pub failed: usize,
    /// The user quit before every picture was seen
    pub cancelled: bool,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Moved: {}, Left: {}, Skipped: {}, Out of range: {}, Undated: {}, Failed: {}",
            self.total_files,
            self.moved,
            self.left,
            self.skipped,
            self.out_of_range,
            self.undated,
            self.failed
        )
    }
}

/// Drives a whole sorting run
pub struct Sorter<P, V> {
    config: Config,
    resolver: DateResolver,
    engine: DecisionEngine<P, V>,
}

impl Sorter<TerminalPrompter, ProcessViewer> {
    /// Sorter asking on the terminal and showing pictures with the
    /// configured viewer
    pub fn interactive(config: Config) -> Self {
        let viewer = ProcessViewer::new(config.viewer.clone());
        Self::new(config, DateResolver::default(), TerminalPrompter, viewer)
    }
}

impl<P: Prompter, V: Viewer> Sorter<P, V> {
    pub fn new(config: Config, resolver: DateResolver, prompter: P, viewer: V) -> Self {
        let engine = DecisionEngine::new(
            prompter,
            viewer,
            config.library_dir.clone(),
            config.sub_dir.clone(),
        );
        Self {
            config,
            resolver,
            engine,
        }
    }

    /// Sort every picture of the input directory, in path order
    ///
    /// Quitting is not an error: the run stops and the summary comes back
    /// with `cancelled` set. Pictures without a date or whose destination
    /// is taken are counted and passed over.
    pub fn run(&mut self) -> Result<RunSummary> {
        let _span = span!(Level::INFO, "sorter_run").entered();

        info!("Scanning input directory...");
        let files = collect_files(&self.config)?;
        info!(count = files.len(), "Found pictures");

        let filter = DateFilter::from(&self.config);
        let mut summary = RunSummary {
            total_files: files.len(),
            ..RunSummary::default()
        };

        for path in &files {
            let image = match self.resolver.resolve(path) {
                Ok(image) => image,
                Err(e @ Error::DateNotFound { .. }) => {
                    warn!("{}", e);
                    summary.undated += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if !filter.contains(image.date) {
                summary.out_of_range += 1;
                continue;
            }

            debug!(
                ?path,
                date = %image.date.format(DATE_FORMAT),
                source = ?image.source,
                "Resolved capture date"
            );

            let existing = find_folder(&self.config.library_dir, image.date)?;
            match self.engine.decide(&image, existing) {
                Ok(Outcome::Moved { .. }) => summary.moved += 1,
                Ok(Outcome::Left) => summary.left += 1,
                Ok(Outcome::SkippedDate) => summary.skipped += 1,
                Ok(Outcome::Cancelled) => {
                    info!("Stopped by user");
                    summary.cancelled = true;
                    info!("{}", summary.summary());
                    return Ok(summary);
                }
                Err(Error::DestinationExists { path: dest }) => {
                    warn!(
                        "{} not moved, {} already exists",
                        path.display(),
                        dest.display()
                    );
                    summary.failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!("All files treated");
        info!("{}", summary.summary());
        Ok(summary)
    }
}

/// Collect every picture under the input directory, sorted by path
pub fn collect_files(config: &Config) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(&config.input_dir).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && let Some(ext) = path.extension().and_then(|e| e.to_str())
            && config.is_supported(ext)
        {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
