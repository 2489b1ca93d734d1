use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;
use env_logger::{Builder, Env, Target};

pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("anatolexic")
        .join("anatolexic.log")
}

/// Route `log` records to a file. The terminal belongs to the TUI, so
/// nothing may be written to stderr while it runs. `RUST_LOG` overrides the
/// default `info` filter.
pub fn init() -> Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()?;

    log::info!("anatolexic {} starting", env!("CARGO_PKG_VERSION"));
    Ok(path)
}
