use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "vshell.yaml";
const DEFAULT_STATE_FILE: &str = ".vshell/state.bin";

const STATE_FILE_KEY: &str = "state_file";
const PERSIST_KEY: &str = "persist";

pub fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Settings read from `vshell.yaml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Where the session is saved, relative to the root unless absolute
    pub state_file: PathBuf,
    /// Whether the session is saved at all
    pub persist: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            persist: true,
        }
    }
}

impl ShellConfig {
    pub async fn read(root: &Path) -> Result<Self, ConfigError> {
        Self::from_path(get_config_file_path(root)).await
    }

    /// A missing file yields the defaults
    pub async fn from_path(path: PathBuf) -> Result<Self, ConfigError> {
        debug!("Opening config file: {}", path.display());
        let bytes = match compio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).context(ReadSnafu {
                    file_path: path.display().to_string(),
                });
            }
        };
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        contents.as_str().try_into()
    }

    fn parse_from_yaml(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (key, value) in top_level {
            match (key.as_str(), value) {
                (Some(STATE_FILE_KEY), Yaml::Value(Scalar::String(path))) => {
                    config.state_file = PathBuf::from(path.to_string());
                }
                (Some(STATE_FILE_KEY), _) => {
                    return InvalidValueSnafu {
                        key: STATE_FILE_KEY,
                        expected: "a path",
                    }
                    .fail();
                }
                (Some(PERSIST_KEY), Yaml::Value(Scalar::Boolean(persist))) => {
                    config.persist = *persist;
                }
                (Some(PERSIST_KEY), _) => {
                    return InvalidValueSnafu {
                        key: PERSIST_KEY,
                        expected: "true or false",
                    }
                    .fail();
                }
                _ => debug!("Skipping unknown config entry: {:?}", key),
            }
        }

        Ok(config)
    }
}

impl TryFrom<&str> for ShellConfig {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };

        let top_level = document.as_mapping().ok_or(ConfigError::TopLevelNotMap)?;
        Self::parse_from_yaml(top_level)
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Config file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config entry '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: String },
}
