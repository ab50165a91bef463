//! Handles settings for the application.
//!
//! Values are layered: defaults, then the TOML file (`config/spesa.toml`
//! unless `--config` says otherwise), then `SPESA__`-prefixed environment
//! variables (e.g. `SPESA__APP__LEVEL=debug`), then command line flags.
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/spesa";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level for the `spesa` and `engine` targets.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Store {
    /// JSON snapshot with users, groups and expenses.
    pub snapshot: String,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            snapshot: "data/snapshot.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub store: Store,
}

#[derive(Debug, Parser)]
#[command(name = "spesa", about = "Group expense summaries")]
struct Args {
    /// Optional config file path (TOML, extension optional).
    #[arg(long)]
    config: Option<String>,
    /// Override the snapshot file.
    #[arg(long)]
    snapshot: Option<String>,
    /// Override the log level.
    #[arg(long)]
    level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("SPESA").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Some(snapshot) = args.snapshot {
            settings.store.snapshot = snapshot;
        }
        if let Some(level) = args.level {
            settings.app.level = level;
        }

        Ok(settings)
    }
}
