//! Per-run memory of date-wide decisions

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// What the session already decided for a capture date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remembered<'a> {
    /// Leave every file of this date in place
    Skip,
    /// Move every file of this date into the folder
    AutoMove(&'a Path),
}

/// Dates the user asked to always skip or always move during this run
///
/// Never persisted. A skipped date stays skipped for the rest of the run.
#[derive(Debug, Default, Clone)]
pub struct SessionMemory {
    skip: HashSet<NaiveDate>,
    auto_move: HashMap<NaiveDate, PathBuf>,
}

impl SessionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(&mut self, date: NaiveDate) {
        self.auto_move.remove(&date);
        self.skip.insert(date);
    }

    /// Remember `folder` as the destination of every later file dated `date`
    pub fn auto_move(&mut self, date: NaiveDate, folder: PathBuf) {
        if !self.skip.contains(&date) {
            self.auto_move.insert(date, folder);
        }
    }

    pub fn lookup(&self, date: NaiveDate) -> Option<Remembered<'_>> {
        if self.skip.contains(&date) {
            return Some(Remembered::Skip);
        }
        self.auto_move
            .get(&date)
            .map(|folder| Remembered::AutoMove(folder.as_path()))
    }
}
