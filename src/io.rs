use std::fs;
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;
use tracing::info;

use crate::profile::SignalSummary;
use crate::signal::Signal;
use crate::SignalError;

pub const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub schema_version: String,
    pub config: String,
    pub seed: u64,
    pub profiles: Vec<SignalSummary>,
}

fn fmt_f64(v: f64) -> String {
    format!("{v:.10}")
}

pub fn ensure_outdir(outdir: &Path) -> Result<(), SignalError> {
    fs::create_dir_all(outdir)?;
    Ok(())
}

/// One row per sample: `index,t,value`
pub fn write_signal_csv(path: &Path, signal: &Signal) -> Result<(), SignalError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;

    wtr.write_record(["index", "t", "value"])?;
    for (i, (t, v)) in signal.times().zip(signal.iter()).enumerate() {
        wtr.write_record([i.to_string(), fmt_f64(t), fmt_f64(*v)])?;
    }

    wtr.flush()?;
    info!(path = %path.display(), samples = signal.len(), "wrote signal csv");
    Ok(())
}

pub fn write_manifest_json(outdir: &Path, manifest: &Manifest) -> Result<(), SignalError> {
    let path = outdir.join("manifest.json");
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, json)?;
    info!(path = %path.display(), "wrote manifest");
    Ok(())
}
