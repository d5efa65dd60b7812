//! Library folder matching
//!
//! The library root holds one folder per event, named `YYYY-MM-DD label`.
//! Only the root's immediate children are considered.

use crate::config::DATE_FORMAT;
use crate::error::Result;
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::trace;

static FOLDER_DATE: OnceLock<Regex> = OnceLock::new();

fn folder_date_pattern() -> &'static Regex {
    FOLDER_DATE.get_or_init(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").unwrap())
}

/// A dated folder directly under the library root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFolder {
    pub path: PathBuf,
    pub date: NaiveDate,
}

impl LibraryFolder {
    /// Folder for `date` named `"<date> <label>"` under `root`
    ///
    /// The folder is not created on disk.
    pub fn named(root: &Path, date: NaiveDate, label: &str) -> Self {
        Self {
            path: root.join(folder_name(date, label)),
            date,
        }
    }
}

/// `<folder>/<sub_dir>/<basename of file>`, `sub_dir` left out when empty
pub fn destination_in(folder: &Path, file: &Path, sub_dir: &str) -> Option<PathBuf> {
    let filename = file.file_name()?;
    let mut dest = folder.to_path_buf();
    if !sub_dir.is_empty() {
        dest.push(sub_dir);
    }
    dest.push(filename);
    Some(dest)
}

/// Folder name for a date and a free-text label
pub fn folder_name(date: NaiveDate, label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        date.format(DATE_FORMAT).to_string()
    } else {
        format!("{} {}", date.format(DATE_FORMAT), label)
    }
}

/// Whether a user-typed label can become a single folder name
pub fn is_valid_label(label: &str) -> bool {
    !label.contains(['/', '\\'])
}

/// Date encoded in a folder name, if any
pub fn folder_date(name: &str) -> Option<NaiveDate> {
    let found = folder_date_pattern().find(name)?;
    NaiveDate::parse_from_str(found.as_str(), DATE_FORMAT).ok()
}

/// List the dated folders directly under `root`, sorted by name
///
/// Children that are not directories or carry no parseable date are left
/// out.
pub fn scan_library(root: &Path) -> Result<Vec<LibraryFolder>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            children.push(path);
        }
    }
    children.sort();

    Ok(children
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            match folder_date(name) {
                Some(date) => Some(LibraryFolder { path, date }),
                None => {
                    trace!(?path, "Ignoring folder without date");
                    None
                }
            }
        })
        .collect())
}

/// First folder directly under `root` whose name carries `date`
pub fn find_folder(root: &Path, date: NaiveDate) -> Result<Option<LibraryFolder>> {
    Ok(scan_library(root)?
        .into_iter()
        .find(|folder| folder.date == date))
}
