use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// A tiny shell over a virtual filesystem that survives restarts
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Directory holding vshell.yaml; relative state files live below it
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// Session state file, overriding the one from vshell.yaml
    #[clap(long, short)]
    pub state_file: Option<PathBuf>,

    /// Keep the session in memory, nothing is read or written
    #[clap(long)]
    pub ephemeral: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["vshell"]).unwrap();

        assert!(matches!(cli.log_level, LogLevel::Warn));
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.state_file, None);
        assert!(!cli.ephemeral);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "vshell",
            "-l",
            "debug",
            "-r",
            "/tmp/shell",
            "-s",
            "state.bin",
            "--ephemeral",
        ])
        .unwrap();

        assert!(matches!(cli.log_level, LogLevel::Debug));
        assert_eq!(cli.root, PathBuf::from("/tmp/shell"));
        assert_eq!(cli.state_file, Some(PathBuf::from("state.bin")));
        assert!(cli.ephemeral);
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["vshell", "--log-level", "loud"]).is_err());
    }
}
