//! VeloLog - Workout Recording Core
//!
//! Command line entry point for exporting and summarizing recorded sessions.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use velolog::metrics::ZoneDistribution;
use velolog::recording::{
    csv_string, csv_string_with_laps, iso_timestamp, merge_measurements, tcx_string,
    MeasurementsData, MetricKind, RecordingSession,
};
use velolog::storage::{
    default_profile_path, load_profile, load_session, save_profile, AthleteProfile,
};

/// VeloLog - Workout Recording Core
///
/// Exports recorded sessions to CSV or TCX and summarizes time in zones.
#[derive(Parser)]
#[command(name = "velolog")]
#[command(version)]
#[command(about = "Workout recording core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a recorded session to CSV or TCX
    Export {
        /// Recorded session file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Export format (csv, csv-laps, tcx)
        #[arg(short = 'f', long, default_value = "csv")]
        format: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize a recorded session: time span, laps, time in zones
    Summary {
        /// Recorded session file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Athlete profile file (default location when omitted)
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },

    /// Write a default athlete profile to edit
    InitProfile {
        /// Profile file path (default location when omitted)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for exported data
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting VeloLog v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            format,
            output,
        } => run_export(&input, &format, output.as_deref()),
        Commands::Summary { input, profile } => run_summary(&input, profile),
        Commands::InitProfile { path } => run_init_profile(path),
    }
}

fn run_export(input: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let data = load_session(input)
        .with_context(|| format!("Failed to load session from {}", input.display()))?;

    let content = match format {
        "csv" => csv_string(&data),
        "csv-laps" => csv_string_with_laps(&data),
        "tcx" => tcx_string(&data),
        other => bail!("Unknown export format: {} (expected csv, csv-laps or tcx)", other),
    };

    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Exported {} to {}", format, path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}

fn run_summary(input: &Path, profile_path: Option<PathBuf>) -> Result<()> {
    let data = load_session(input)
        .with_context(|| format!("Failed to load session from {}", input.display()))?;

    let profile_path = profile_path.unwrap_or_else(default_profile_path);
    let profile = load_profile(&profile_path)
        .with_context(|| format!("Failed to load profile from {}", profile_path.display()))?;

    let Some((start, end)) = data.time_bounds() else {
        println!("No data recorded.");
        return Ok(());
    };

    let session = replay_session(&profile, &data)?;
    let merged = merge_measurements(&data);

    println!(
        "Session {} .. {} ({} s)",
        iso_timestamp(start),
        iso_timestamp(end),
        (end - start) / 1000
    );
    println!("Merged rows: {}", merged.len());
    println!("Laps: {}", data.laps.len());

    if let Some(zone) = session.current_power_zone() {
        println!("Last power sample: Z{} {}", zone.zone, zone.name);
    }
    if let Some(zone) = session.current_hr_zone() {
        println!("Last heart rate sample: Z{} {}", zone.zone, zone.name);
    }

    print_distribution("Power zones", session.ftp(), &session.power_zone_distribution());
    print_distribution(
        "Heart rate zones",
        session.max_hr(),
        &session.hr_zone_distribution(),
    );

    Ok(())
}

/// Feed recorded streams through a fresh session to rebuild zone state.
///
/// Each tracker consumes exactly one stream, so replaying stream by
/// stream preserves per-tracker timestamp order.
fn replay_session(profile: &AthleteProfile, data: &MeasurementsData) -> Result<RecordingSession> {
    let mut session = RecordingSession::new(profile);
    session.start()?;

    for kind in MetricKind::ALL {
        for measurement in data.sequence(kind) {
            session.record(kind, *measurement)?;
        }
    }

    Ok(session)
}

fn print_distribution(title: &str, reference: Option<f64>, distribution: &ZoneDistribution) {
    let Some(reference) = reference else {
        println!("\n{}: no reference value set, zones unavailable", title);
        return;
    };

    println!("\n{} (reference {:.0}):", title, reference);
    for zone_time in &distribution.zones {
        let percent = if distribution.total_time_ms > 0 {
            zone_time.time_in_zone_ms as f64 / distribution.total_time_ms as f64 * 100.0
        } else {
            0.0
        };
        println!(
            "  Z{} {:<16} {}  {:>7.1} s  {:>5.1}%",
            zone_time.zone,
            zone_time.name,
            zone_time.color.to_hex(),
            zone_time.time_in_zone_ms as f64 / 1000.0,
            percent
        );
    }
}

fn run_init_profile(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(default_profile_path);
    if path.exists() {
        bail!("Profile already exists at {}", path.display());
    }

    save_profile(&AthleteProfile::default(), &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote default profile to {}", path.display());
    println!("Edit it to set your FTP and max heart rate.");
    Ok(())
}
