use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::ShellConfig;

/// Settings the application runs with, after merging the command line over
/// the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// `None` keeps the session in memory
    pub state_file: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn resolve(cli: &Cli, config: ShellConfig) -> Self {
        let state_file = if cli.ephemeral || !config.persist {
            None
        } else {
            Some(
                cli.state_file
                    .clone()
                    .unwrap_or_else(|| cli.root.join(&config.state_file)),
            )
        };

        RuntimeConfig { state_file }
    }
}
