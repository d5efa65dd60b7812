//! Configuration types for the picture sorter

use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Date format used on the command line and in library folder names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default external viewer program
pub const DEFAULT_VIEWER: &str = "nomacs";

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)?)
}

/// Earliest capture date accepted by default
pub fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Latest capture date accepted by default (today)
pub fn default_stop() -> NaiveDate {
    Local::now().date_naive()
}

/// Configuration for the picture sorter
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned (recursively) for pictures to sort
    pub input_dir: PathBuf,

    /// Library root containing date-prefixed folders
    pub library_dir: PathBuf,

    /// Pictures taken before this date are ignored
    pub start: NaiveDate,

    /// Pictures taken after this date are ignored
    pub stop: NaiveDate,

    /// Sub-directory created inside library folders (empty for none)
    pub sub_dir: String,

    /// Program used to display a picture while prompting (empty disables it)
    pub viewer: String,

    /// Picture extensions picked up from the input directory
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            library_dir: PathBuf::new(),
            start: default_start(),
            stop: default_stop(),
            sub_dir: String::new(),
            viewer: DEFAULT_VIEWER.to_string(),
            extensions: ["jpg", "jpeg", "png", "tif", "tiff", "heic", "heif", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    /// Check if a file extension is one of the configured picture formats
    pub fn is_supported(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.extensions.iter().any(|e| e.to_lowercase() == ext_lower)
    }

    /// Check that the configuration can be run
    ///
    /// Both directories must exist and be directories, the date range must
    /// not be inverted and the library must not live inside the input tree.
    pub fn validate(&self) -> Result<()> {
        existing_dir(&self.input_dir, "input")?;
        existing_dir(&self.library_dir, "library")?;

        if self.start > self.stop {
            return Err(Error::Config(format!(
                "start date {} is after stop date {}",
                self.start.format(DATE_FORMAT),
                self.stop.format(DATE_FORMAT)
            )));
        }

        let input = fs::canonicalize(&self.input_dir)?;
        let library = fs::canonicalize(&self.library_dir)?;
        if library.starts_with(&input) {
            return Err(Error::Config(format!(
                "library {} is inside input {}",
                self.library_dir.display(),
                self.input_dir.display()
            )));
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# sort-pics configuration file (TOML)
# Command line arguments override every value set here.

# Directory containing the pictures to sort (scanned recursively)
input_dir = "/home/me/Camera"

# Library root holding "YYYY-MM-DD label" folders
library_dir = "/home/me/Pictures"

# Only pictures taken between start and stop (both included) are offered
start = "1970-01-01"
stop = "2030-12-31"

# Sub-directory created inside each library folder, "" for none
sub_dir = ""

# Program used to show each picture while asking, "" to disable
viewer = "nomacs"

# Extensions picked up from the input directory (case-insensitive)
extensions = ["jpg", "jpeg", "png", "tif", "tiff", "heic", "heif", "webp"]
"#
        .to_string()
    }
}

fn existing_dir(path: &Path, what: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::Config(format!("no {} directory given", what)));
    }
    if !path.exists() {
        return Err(Error::Config(format!("'{}' does not exist.", path.display())));
    }
    if !path.is_dir() {
        return Err(Error::Config(format!("'{}' is not a directory.", path.display())));
    }
    Ok(())
}

/// Errors that can occur when loading a configuration file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
