use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::screen::screen_model::DetectionConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-detection",
    version,
    about = "Locate the primary form on a page and extract its fields"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: form-detection.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one extraction pass over a page snapshot
    Detect {
        /// Snapshot file (JSON, or YAML by extension)
        #[arg(long)]
        snapshot: String,

        /// Output format: console or json
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Replay snapshots as successive states of one page until detection converges
    Watch {
        /// Snapshot files, in the order the page went through them
        #[arg(long, required = true, num_args = 1..)]
        snapshot: Vec<String>,

        /// POST the converged field list to this URL instead of printing it
        #[arg(long)]
        endpoint: Option<String>,

        /// Append a JSONL trace of every pass to this file
        #[arg(long)]
        trace: Option<String>,

        /// Re-render the last snapshot this many extra times
        #[arg(long, default_value_t = 1)]
        repeat_last: usize,

        /// Override the debounce window in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-detection.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Downstream endpoint for the converged field list
    pub endpoint: Option<String>,

    /// JSONL pass trace path
    pub trace: Option<String>,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("form-detection.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = config_path, error = %e, "malformed config file, using defaults");
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

/// Apply CLI overrides on top of the file config.
pub fn build_detection_config(base: &DetectionConfig, debounce_ms: Option<u64>) -> DetectionConfig {
    let mut config = base.clone();
    if let Some(ms) = debounce_ms {
        config.debounce_ms = ms;
    }
    config
}
