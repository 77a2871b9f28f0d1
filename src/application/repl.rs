use std::borrow::Cow;
use std::io::{self, BufRead, Write};

use colored::Colorize;
use tracing::{debug, warn};

use crate::commands::Transition;
use crate::session::{Session, SessionStore};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Line-oriented front end: prints a prompt, feeds each line to the session
/// and writes the result back
pub struct Repl<S: SessionStore> {
    session: Session<S>,
    colorize: bool,
}

impl<S: SessionStore> Repl<S> {
    pub fn new(session: Session<S>, colorize: bool) -> Self {
        Repl { session, colorize }
    }

    /// Runs until `input` is exhausted. Bytes that are not UTF-8 are replaced
    /// rather than ending the session.
    pub fn run(&mut self, mut input: impl BufRead, mut output: impl Write) -> io::Result<()> {
        let mut buffer = Vec::new();
        loop {
            write!(output, "{}", self.prompt())?;
            output.flush()?;

            buffer.clear();
            if input.read_until(b'\n', &mut buffer)? == 0 {
                debug!("Input closed, leaving the shell");
                writeln!(output)?;
                return Ok(());
            }

            let line = String::from_utf8_lossy(&buffer);
            if matches!(line, Cow::Owned(_)) {
                warn!("Input line is not valid UTF-8, replacing invalid bytes");
            }

            let submission = self
                .session
                .submit(line.trim_end_matches(['\r', '\n']));
            if submission.transitions.contains(&Transition::ClearHistory) {
                write!(output, "{CLEAR_SCREEN}")?;
            } else if !submission.entry.result.is_empty() {
                writeln!(output, "{}", submission.entry.result)?;
            }
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    fn prompt(&self) -> String {
        let path = self.session.current_path();
        if self.colorize {
            format!("{} {} ", path.blue().bold(), "$".green())
        } else {
            format!("{path} $ ")
        }
    }
}
