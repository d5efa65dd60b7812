//! Sort Pics - interactive picture sorting into a dated library
//!
//! Walks an input directory, dates every picture from its EXIF data or
//! file name and asks where in the library it should go.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use sort_pics::{Cli, Config, RunSummary, Sorter};
use std::path::{Path, PathBuf};
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Colored console output for the end-of-run summary

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    pub fn print_title(title: &str) {
        let padding = 60usize.saturating_sub(title.len()) / 2;
        let _ = stdout().execute(Print(" ".repeat(padding)));
        let _ = stdout().execute(Print(style(title).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    /// Print a statistic line
    pub fn print_stat(key: &str, value: &str, color: Color) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value).with(color).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_log_path(path: &str) {
        let _ = stdout().execute(Print("\n"));
        let _ = stdout().execute(Print(style("  📁 ").with(CliTheme::ACCENT)));
        let _ = stdout().execute(Print(style("Log file: ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", path)));
    }

    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if cli.print_config {
        print!("{}", Config::sample_config());
        return Ok(());
    }

    let log_path = get_log_path(&cli);
    let _guard = setup_logging(&cli, &log_path)?;

    info!(version = env!("CARGO_PKG_VERSION"), "sort-pics starting");

    let config = load_config(&cli)?;
    if cli.verbose {
        info!(?config, "Configuration loaded");
    }
    info!(log_file = %log_path.display(), "Log file location");

    config.validate().context("Invalid configuration")?;

    let mut sorter = Sorter::interactive(config);
    match sorter.run() {
        Ok(summary) => {
            print_summary(&summary, &log_path);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Sorting failed");
            Err(e.into())
        }
    }
}

fn print_summary(summary: &RunSummary, log_path: &Path) {
    use cli_output::*;

    print_blank();
    print_separator();
    print_title(if summary.cancelled {
        "Stopped by user"
    } else {
        "All files treated"
    });
    print_separator();

    print_stat("Moved", &summary.moved.to_string(), CliTheme::SUCCESS);
    print_stat("Left in place", &summary.left.to_string(), CliTheme::HINT);
    print_stat("Skipped by date", &summary.skipped.to_string(), CliTheme::WARNING);
    print_stat("Out of range", &summary.out_of_range.to_string(), CliTheme::HINT);
    print_stat("Without date", &summary.undated.to_string(), CliTheme::WARNING);
    print_stat("Failed", &summary.failed.to_string(), CliTheme::ERROR);

    if summary.cancelled {
        print_blank();
        print_warning("Remaining pictures were not looked at");
    }

    print_separator();
    print_log_path(&log_path.display().to_string());
}

/// Log file path from the command line, or a timestamped default
fn get_log_path(cli: &Cli) -> PathBuf {
    cli.log.clone().unwrap_or_else(|| {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from("Log").join(format!("sort_pics_{}.log", timestamp))
    })
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    if config.input_dir.as_os_str().is_empty() || config.library_dir.as_os_str().is_empty() {
        anyhow::bail!("Both an input directory and a library directory are required");
    }

    Ok(config)
}

/// Setup logging (file + console)
fn setup_logging(cli: &Cli, log_path: &Path) -> Result<WorkerGuard> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .with_context(|| format!("Cannot open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json_log {
        subscriber
            .with(fmt::layer().json().with_ansi(false).with_writer(non_blocking))
            .with(
                fmt::layer()
                    .without_time()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(
                fmt::layer()
                    .without_time()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(guard)
}
