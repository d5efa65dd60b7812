//! Moving pictures into the library

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Move `source` to `dest`, creating missing parent directories
///
/// Relies on a same-volume rename, so the picture is either fully at
/// `dest` or still at `source`. An existing `dest` is never overwritten.
pub fn move_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(out_dir) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !out_dir.exists() {
            fs::create_dir_all(out_dir)?;
            info!("{} created", out_dir.display());
        }

        if !out_dir.is_dir() {
            return Err(Error::Config(format!(
                "{} exists but is not a directory",
                out_dir.display()
            )));
        }
    }

    if dest.exists() {
        return Err(Error::DestinationExists {
            path: dest.to_path_buf(),
        });
    }

    fs::rename(source, dest)?;
    info!("{} --> {}", source.display(), dest.display());
    Ok(())
}
