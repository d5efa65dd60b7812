//! Capture date resolution
//!
//! A picture's capture date is taken from, in priority order:
//! 1. The `DateTimeOriginal` metadata field
//! 2. The `DateTime` metadata field
//! 3. An 8-digit `YYYYMMDD` run in the file name

pub mod exif;
pub mod filename;

use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use self::exif::{ExifReader, MetadataReader};

/// Source of the resolved capture date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// `DateTimeOriginal` metadata field
    DateTimeOriginal,
    /// `DateTime` metadata field
    DateTime,
    /// Parsed from the file name
    Filename,
}

/// A picture together with its resolved capture date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub date: NaiveDate,
    pub source: DateSource,
}

/// Resolves capture dates through a metadata reader and the file name
pub struct DateResolver {
    reader: Box<dyn MetadataReader>,
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new(ExifReader)
    }
}

impl DateResolver {
    pub fn new(reader: impl MetadataReader + 'static) -> Self {
        Self {
            reader: Box::new(reader),
        }
    }

    /// Resolve the capture date of `path`
    ///
    /// Unreadable metadata only disables the metadata strategies; the
    /// file name is still tried. Fails with [`Error::DateNotFound`] when
    /// no strategy yields a date.
    pub fn resolve(&self, path: &Path) -> Result<ImageFile> {
        let fields = match self.reader.read_fields(path) {
            Ok(fields) => fields,
            Err(e) => {
                debug!(?path, error = %e, "No readable metadata");
                HashMap::new()
            }
        };

        let (date, source) = resolve_date(path, &fields).ok_or_else(|| Error::DateNotFound {
            path: path.to_path_buf(),
        })?;

        Ok(ImageFile {
            path: path.to_path_buf(),
            date,
            source,
        })
    }
}

fn resolve_date(path: &Path, fields: &HashMap<String, String>) -> Option<(NaiveDate, DateSource)> {
    let metadata = [
        (exif::TAG_DATE_TIME_ORIGINAL, DateSource::DateTimeOriginal),
        (exif::TAG_DATE_TIME, DateSource::DateTime),
    ];

    for (tag, source) in metadata {
        match fields.get(tag).and_then(|value| exif::parse_exif_date(value)) {
            Some(date) => {
                debug!(?path, tag, %date, "Extracted date from metadata");
                return Some((date, source));
            }
            None => debug!(?path, tag, "No usable date in metadata field"),
        }
    }

    debug!(?path, "Trying with filename");
    let date = path
        .file_name()
        .and_then(|f| f.to_str())
        .and_then(filename::parse_filename_date)?;
    Some((date, DateSource::Filename))
}
