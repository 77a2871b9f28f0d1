mod shell_config;

pub use shell_config::{ConfigError, ShellConfig, get_config_file_path};
