use std::io;

use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info};

use crate::application::{Repl, RuntimeConfig};
use crate::cli::Cli;
use crate::config::{ConfigError, ShellConfig};
use crate::session::{AnyStore, FileStore, MemoryStore, Session};

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<(), ApplicationError> {
        let shell_config = ShellConfig::read(&cli.root)
            .await
            .context(ConfigurationSnafu)?;
        debug!("Loaded config: {:?}", shell_config);

        let runtime_config = RuntimeConfig::resolve(&cli, shell_config);
        let store = match &runtime_config.state_file {
            Some(path) => {
                info!("Persisting session to {}", path.display());
                AnyStore::File(FileStore::new(path))
            }
            None => {
                info!("Running an ephemeral session");
                AnyStore::Memory(MemoryStore::default())
            }
        };

        let session = Session::restore(store);
        let colorize = supports_color::on(Stream::Stdout).is_some();

        Repl::new(session, colorize)
            .run(io::stdin().lock(), io::stdout().lock())
            .context(TerminalSnafu)?;

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigurationError { source: ConfigError },
    #[snafu(display("Lost the connection to the terminal"))]
    TerminalError { source: io::Error },
}
