//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;
pub mod serve;

use std::path::Path;

use cardstmt_core::StatementConfig;

/// Load the configuration file given with `--config`, or the built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StatementConfig> {
    match config_path {
        Some(path) => Ok(StatementConfig::from_file(Path::new(path))?),
        None => Ok(StatementConfig::default()),
    }
}
