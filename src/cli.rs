//! CLI argument parsing with clap

use crate::config::{self, Config};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Helps sort pictures into an existing tree using date prefixed folders
///
/// Every picture of INPUT is dated from its EXIF data or its file name,
/// then offered for moving into the LIBRARY folder named after that date.
#[derive(Parser, Debug)]
#[command(name = "sort-pics")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Input directory containing pictures to sort
    pub input: Option<PathBuf>,

    /// Output directory containing (or not) an existing picture library
    pub library: Option<PathBuf>,

    /// Pictures taken before this start date are ignored, ex: "2021-01-31"
    #[arg(short, long, value_parser = parse_cli_date)]
    pub start: Option<NaiveDate>,

    /// Pictures taken after this stop date are ignored, ex: "2022-12-31"
    #[arg(short = 'p', long, value_parser = parse_cli_date)]
    pub stop: Option<NaiveDate>,

    /// Create a sub-dir with the provided name into library folders
    #[arg(short = 'd', long = "sub_dir")]
    pub sub_dir: Option<String>,

    /// Software used to display the pictures ("" to disable)
    #[arg(short = 'w', long = "viewer_sw", env = "SORT_PICS_VIEWER")]
    pub viewer_sw: Option<String>,

    /// Log file path (default: Log/sort_pics_<timestamp>.log)
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Path to configuration file (TOML format)
    ///
    /// Settings from the file are used as defaults, command line
    /// arguments override them.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Print a sample configuration file and quit
    #[arg(long = "print_config")]
    pub print_config: bool,

    /// Verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Write the log file as JSON
    #[arg(long = "json_log")]
    pub json_log: bool,

    /// Print version and quit
    #[arg(short = 'v', long)]
    pub version: bool,
}

fn parse_cli_date(s: &str) -> Result<NaiveDate, String> {
    config::parse_date(s).map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref input) = self.input {
            config.input_dir = input.clone();
        }
        if let Some(ref library) = self.library {
            config.library_dir = library.clone();
        }
        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(stop) = self.stop {
            config.stop = stop;
        }
        if let Some(ref sub_dir) = self.sub_dir {
            config.sub_dir = sub_dir.clone();
        }
        if let Some(ref viewer) = self.viewer_sw {
            config.viewer = viewer.clone();
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "sort-pics",
            "in",
            "lib",
            "--start",
            "2021-01-31",
            "-p",
            "2022-12-31",
            "--sub_dir",
            "Phone",
            "--viewer_sw",
            "feh",
            "--log",
            "run.log",
        ])
        .unwrap();

        let config = cli.to_config();
        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.library_dir, PathBuf::from("lib"));
        assert_eq!(config.start, NaiveDate::from_ymd_opt(2021, 1, 31).unwrap());
        assert_eq!(config.stop, NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
        assert_eq!(config.sub_dir, "Phone");
        assert_eq!(config.viewer, "feh");
        assert_eq!(cli.log, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sort-pics", "in", "lib"]).unwrap();
        let config = cli.to_config();
        assert_eq!(config.start, config::default_start());
        assert_eq!(config.stop, config::default_stop());
        assert_eq!(config.sub_dir, "");
        assert_eq!(config.viewer, config::DEFAULT_VIEWER);
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["sort-pics", "in", "lib", "--start", "31/01/2021"]).is_err());
    }

    #[test]
    fn test_version_flag_needs_no_paths() {
        let cli = Cli::try_parse_from(["sort-pics", "-v"]).unwrap();
        assert!(cli.version);
        assert!(cli.input.is_none());

        let cli = Cli::try_parse_from(["sort-pics", "in", "lib", "--version"]).unwrap();
        assert!(cli.version);
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let file_config = Config {
            sub_dir: "Camera".into(),
            viewer: "eog".into(),
            library_dir: PathBuf::from("from_file"),
            ..Config::default()
        };
        let cli = Cli::try_parse_from(["sort-pics", "--sub_dir", "Phone"]).unwrap();

        let config = cli.merge_with_config(file_config);
        assert_eq!(config.sub_dir, "Phone");
        assert_eq!(config.viewer, "eog");
        assert_eq!(config.library_dir, PathBuf::from("from_file"));
    }
}
