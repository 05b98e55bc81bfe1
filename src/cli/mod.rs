//! Command-line interface for the pass report.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::ReportConfig;
use crate::core::{loaders, writers};
use crate::pipeline::{self, RunSummary};

#[derive(Parser)]
#[command(name = "pass-report")]
#[command(about = "Reshape column-wise survey measurements into pass/measurement reports", version)]
pub struct Cli {
    /// Path to YAML config file (built-in file list if omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report every configured file, in declaration order
    Report {
        /// Override the data directory from the config
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only report these configured files
        #[arg(long)]
        only: Vec<String>,
    },

    /// Print the flattened series of a single CSV file, one value per line
    Series {
        /// Input CSV file
        file: PathBuf,
    },

    /// Write the built-in configuration as YAML
    InitConfig {
        /// Output YAML path
        path: PathBuf,
    },
}

/// Print a summary box to stderr, keeping stdout for report data
fn print_summary(title: &str, items: &[(&str, String)]) {
    eprintln!();
    eprintln!("╔══════════════════════════════════════════════════════════════╗");
    eprintln!("║ {:<62} ║", title);
    eprintln!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 39 {
            let head: String = value.chars().take(36).collect();
            format!("{}...", head)
        } else {
            value.clone()
        };
        eprintln!("║ {:<20}: {:<39} ║", key, display_value);
    }
    eprintln!("╚══════════════════════════════════════════════════════════════╝");
    eprintln!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // An explicit config is the whole run definition, so a bad one is fatal.
    let config = match &cli.config {
        Some(path) => match ReportConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                error!("Failed to load config from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ReportConfig::default(),
    };

    match cli.command {
        Some(Commands::Report { data_dir, output, only }) => {
            cmd_report(config, data_dir, output, &only, cli.verbose > 0);
        }
        None => cmd_report(config, None, None, &[], cli.verbose > 0),
        Some(Commands::Series { file }) => cmd_series(&file),
        Some(Commands::InitConfig { path }) => cmd_init_config(&path),
    }
}

fn cmd_report(
    config: ReportConfig,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    only: &[String],
    show_summary: bool,
) {
    let start = Instant::now();

    let mut config = if only.is_empty() {
        config
    } else {
        match config.select(only) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    };
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }

    let result = match &output {
        Some(path) => writers::create_report_file(path)
            .map_err(anyhow::Error::from)
            .and_then(|mut writer| pipeline::run_report(&config, &mut writer)),
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            pipeline::run_report(&config, &mut writer)
        }
    };

    match result {
        Ok(RunSummary { files, exact, degraded }) => {
            if show_summary {
                print_summary(
                    "Report Complete",
                    &[
                        ("Data directory", config.data_dir.display().to_string()),
                        (
                            "Output",
                            output
                                .as_ref()
                                .map_or_else(|| "stdout".to_string(), |p| p.display().to_string()),
                        ),
                        ("Files reported", files.to_string()),
                        ("Exact grids", exact.to_string()),
                        ("Mismatched grids", degraded.to_string()),
                        ("Duration", format!("{:.2?}", start.elapsed())),
                    ],
                );
            }
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_series(file: &Path) {
    let series = match loaders::load_series(file) {
        Ok(series) => series,
        Err(e) => {
            error!("Failed to load {}: {}", file.display(), e);
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if let Err(e) = writers::write_values(&mut writer, series.values()).and_then(|()| writer.flush()) {
        error!("Failed to write series: {}", e);
        std::process::exit(1);
    }
    info!("{}: {} values", file.display(), series.len());
}

fn cmd_init_config(path: &Path) {
    match ReportConfig::default().to_yaml(path) {
        Ok(()) => println!("Wrote default config to {}", path.display()),
        Err(e) => {
            error!("Failed to write config: {}", e);
            std::process::exit(1);
        }
    }
}
