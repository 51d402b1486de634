//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Hue(#[from] hue_lights_rs::Error),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no bridge connection available; pass --host or register a bridge first")]
    NoBridge,

    #[error("invalid value for --{flag}: {value}")]
    InvalidArgument { flag: &'static str, value: String },

    #[error("nothing to set; pass at least one of --on, --off, --bri, --hue, --sat, --ct")]
    NothingToSet,

    #[error("{count} of {total} writes were rejected by the bridge")]
    Rejected { count: usize, total: usize },
}
