use tracing::debug;

use crate::commands::{Command, CommandOutput};
use crate::filesystem::{DirId, Tree};

/// Splits `input` on single spaces and runs the named command.
///
/// There is no quoting: consecutive spaces produce empty arguments.
/// Unknown names produce a diagnostic and leave the tree untouched.
pub fn dispatch(tree: &mut Tree, cwd: DirId, input: &str) -> CommandOutput {
    let mut tokens = input.split(' ');
    let name = tokens.next().unwrap_or_default();
    let args = tokens.collect::<Vec<_>>();

    match Command::parse(name, &args) {
        Some(command) => {
            debug!("Dispatching {:?} in {}", command, cwd);
            command.execute(tree, cwd)
        }
        None => {
            debug!("Unknown command '{}'", name);
            CommandOutput::text(format!("command not found: {name}"))
        }
    }
}
