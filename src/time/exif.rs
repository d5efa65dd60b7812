//! EXIF metadata access for pictures

use crate::error::{Error, Result};
use chrono::NaiveDate;
use exif::{In, Reader, Value};
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::OnceLock;
use tracing::trace;

/// Capture time field, tried first
pub const TAG_DATE_TIME_ORIGINAL: &str = "DateTimeOriginal";

/// Last-modified time field, tried second
pub const TAG_DATE_TIME: &str = "DateTime";

static EXIF_DATE: OnceLock<Regex> = OnceLock::new();

fn exif_date_pattern() -> &'static Regex {
    EXIF_DATE.get_or_init(|| Regex::new(r"[0-9]{4}:[0-9]{2}:[0-9]{2}").unwrap())
}

/// Source of named metadata fields for a picture
pub trait MetadataReader {
    /// Read every field of the picture as tag name -> text value
    fn read_fields(&self, path: &Path) -> Result<HashMap<String, String>>;
}

/// Reads fields from the primary IFD of embedded EXIF data
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifReader;

impl MetadataReader for ExifReader {
    fn read_fields(&self, path: &Path) -> Result<HashMap<String, String>> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let exif = Reader::new()
            .read_from_container(&mut reader)
            .map_err(|e| Error::ExifRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let fields = exif
            .fields()
            .filter(|field| field.ifd_num == In::PRIMARY)
            .map(|field| {
                // Keep ASCII values verbatim, display_value() reformats dates
                let text = match field.value {
                    Value::Ascii(ref parts) => parts
                        .first()
                        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                        .unwrap_or_default(),
                    _ => field.display_value().to_string(),
                };
                (field.tag.to_string(), text)
            })
            .collect::<HashMap<_, _>>();

        trace!(?path, count = fields.len(), "Read EXIF fields");
        Ok(fields)
    }
}

/// Extract a `YYYY:MM:DD` date from a metadata value
///
/// The value may carry a time part or stray text around the date.
pub fn parse_exif_date(value: &str) -> Option<NaiveDate> {
    let found = exif_date_pattern().find(value)?;
    NaiveDate::parse_from_str(found.as_str(), "%Y:%m:%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_exif_date() {
        let expected = NaiveDate::from_ymd_opt(2022, 1, 31).unwrap();

        assert_eq!(parse_exif_date("2022:01:31 12:00:00"), Some(expected));
        assert_eq!(parse_exif_date("\"2022:01:31 12:00:00\""), Some(expected));
        assert_eq!(parse_exif_date("taken 2022:01:31\0\0"), Some(expected));
        assert_eq!(parse_exif_date("2022:01:31"), Some(expected));
    }

    #[test]
    fn test_parse_exif_date_invalid() {
        assert!(parse_exif_date("").is_none());
        assert!(parse_exif_date("0000:00:00 00:00:00").is_none());
        assert!(parse_exif_date("2022:13:01 00:00:00").is_none());
        assert!(parse_exif_date("2022-01-31 12:00:00").is_none());
        assert!(parse_exif_date("    :  :     :  :  ").is_none());
    }

    #[test]
    fn test_reader_rejects_non_image() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("IMG_20220131_120000.jpg");
        fs::write(&path, b"not really a jpeg").unwrap();

        let result = ExifReader.read_fields(&path);
        assert!(matches!(result, Err(Error::ExifRead { .. })));
    }

    #[test]
    fn test_reader_missing_file() {
        let tmp = TempDir::new().unwrap();
        let result = ExifReader.read_fields(&tmp.path().join("gone.jpg"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
