use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seat_hil_signals::io::{
    ensure_outdir, write_manifest_json, write_signal_csv, Manifest, OUTPUT_SCHEMA_VERSION,
};
use seat_hil_signals::{ProfileSet, SettlingResult, SignalSummary};

#[derive(Debug, Parser)]
#[command(name = "hil-signals")]
#[command(about = "Generate and analyse seat-comfort HIL stimulus profiles")]
struct Cli {
    /// Profile set (TOML); defaults to configs/default.toml
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "output-hil-signals")]
    outdir: PathBuf,

    /// Override the profile set's base seed
    #[arg(long)]
    seed: Option<u64>,

    /// Only run the named profiles (repeatable)
    #[arg(long = "profile")]
    profiles: Vec<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn resolve_default_config_path() -> PathBuf {
    let local = PathBuf::from("configs").join("default.toml");
    if local.exists() {
        return local;
    }

    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("configs")
        .join("default.toml")
}

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let default_filter = format!("seat_hil_signals={log_level},hil_signals={log_level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn describe(summary: &SignalSummary) -> String {
    let mut line = format!("{:<24} {:<18}", summary.name, summary.kind);
    match &summary.statistics {
        Some(stats) => line.push_str(&format!(
            " n={:<6} mean={:>10.4} min={:>10.4} max={:>10.4} sd={:>8.4}",
            stats.count, stats.mean, stats.min, stats.max, stats.std_dev
        )),
        None => line.push_str(" (no samples)"),
    }
    if let Some(overshoot) = summary.overshoot_percent {
        line.push_str(&format!(" overshoot={overshoot:.2}%"));
    }
    match summary.settling {
        Some(SettlingResult::Settled { time, .. }) => {
            line.push_str(&format!(" settled={time:.3}s"));
        }
        Some(SettlingResult::NotSettled) => line.push_str(" settled=never"),
        None => {}
    }
    line
}

fn run(cli: &Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(resolve_default_config_path);
    let mut set = ProfileSet::from_toml_file(&config_path)
        .with_context(|| format!("failed to load profile set: {}", config_path.display()))?;
    if let Some(seed) = cli.seed {
        set.seed = seed;
    }

    ensure_outdir(&cli.outdir)
        .with_context(|| format!("failed to create output directory: {}", cli.outdir.display()))?;

    let selected = set.select(&cli.profiles)?;
    info!(
        config = %config_path.display(),
        profiles = selected.len(),
        seed = set.seed,
        "running profile set"
    );

    let mut summaries = Vec::with_capacity(selected.len());
    for (index, profile) in selected {
        let seed = set.seed_for(index);
        let signal = profile
            .generate(seed)
            .with_context(|| format!("profile '{}' failed to generate", profile.name))?;
        let summary = profile.analyse(&signal, seed)?;
        if let Some(SettlingResult::NotSettled) = summary.settling {
            warn!(profile = %profile.name, "signal never settled within tolerance");
        }

        let csv_path = cli.outdir.join(format!("{}.csv", profile.name));
        write_signal_csv(&csv_path, &signal)
            .with_context(|| format!("failed to write {}", csv_path.display()))?;

        println!("{}", describe(&summary));
        summaries.push(summary);
    }

    write_manifest_json(
        &cli.outdir,
        &Manifest {
            schema_version: OUTPUT_SCHEMA_VERSION.to_string(),
            config: config_path.display().to_string(),
            seed: set.seed,
            profiles: summaries,
        },
    )?;

    println!("Output directory: {}", cli.outdir.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}
