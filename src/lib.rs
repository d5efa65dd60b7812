//! Sort Pics - interactive sorting of pictures into a dated library
//!
//! This library provides the pieces of an interactive sorting run:
//! - Capture date resolution from EXIF metadata or the file name
//! - Matching against `YYYY-MM-DD label` folders of a library root
//! - A per-picture decision state machine with per-run date memory
//! - Moving pictures into the library, creating folders as needed

pub mod cli;
pub mod config;
pub mod decision;
pub mod error;
pub mod library;
pub mod mover;
pub mod process;
pub mod prompt;
pub mod session;
pub mod time;
pub mod viewer;

pub use cli::Cli;
pub use config::{Config, ConfigError};
pub use decision::{DecisionEngine, Outcome};
pub use error::{Error, Result};
pub use library::{LibraryFolder, find_folder};
pub use process::{DateFilter, RunSummary, Sorter};
pub use session::SessionMemory;
pub use time::{DateResolver, DateSource, ImageFile};
