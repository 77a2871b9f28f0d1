use tracing::debug;

use crate::commands::Transition;
use crate::filesystem::{DirId, Tree, TreeError, resolve_path};

pub const HELP_TEXT: &str = "that'd be too easy ;) try starting with 'ls'";

/// Every command the shell knows, with its arguments already picked apart.
///
/// Commands taking a single operand keep `None` when it is missing or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Clear,
    Help,
    Echo { words: Vec<String> },
    Ls,
    Cd { target: Option<String> },
    Pwd,
    Mkdir { path: Option<String> },
    Touch { path: Option<String> },
    /// Blank input line
    Empty,
}

/// What a command produced: the text for the transcript and the session
/// changes it asks for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub result: String,
    pub transitions: Vec<Transition>,
}

impl CommandOutput {
    pub fn text(result: impl Into<String>) -> Self {
        CommandOutput {
            result: result.into(),
            transitions: Vec::new(),
        }
    }

    pub fn transition(transition: Transition) -> Self {
        CommandOutput {
            result: String::new(),
            transitions: vec![transition],
        }
    }
}

impl Command {
    /// Names in registry order, the empty name included
    pub const NAMES: [&'static str; 9] = [
        "clear", "help", "echo", "ls", "cd", "pwd", "mkdir", "touch", "",
    ];

    /// Looks up a command by its exact, case-sensitive name
    pub fn parse(name: &str, args: &[&str]) -> Option<Self> {
        let operand = || {
            args.first()
                .filter(|arg| !arg.is_empty())
                .map(|arg| arg.to_string())
        };

        let command = match name {
            "clear" => Command::Clear,
            "help" => Command::Help,
            "echo" => Command::Echo {
                words: args.iter().map(|arg| arg.to_string()).collect(),
            },
            "ls" => Command::Ls,
            "cd" => Command::Cd { target: operand() },
            "pwd" => Command::Pwd,
            "mkdir" => Command::Mkdir { path: operand() },
            "touch" => Command::Touch { path: operand() },
            "" => Command::Empty,
            _ => return None,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Clear => "clear",
            Command::Help => "help",
            Command::Echo { .. } => "echo",
            Command::Ls => "ls",
            Command::Cd { .. } => "cd",
            Command::Pwd => "pwd",
            Command::Mkdir { .. } => "mkdir",
            Command::Touch { .. } => "touch",
            Command::Empty => "",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Clear => "clear the terminal screen",
            Command::Help | Command::Empty => "",
            Command::Echo { .. } => "write arguments to the standard output",
            Command::Ls => "list directory contents",
            Command::Cd { .. } => "change current directory",
            Command::Pwd => "return working directory name",
            Command::Mkdir { .. } => "make directories",
            Command::Touch { .. } => "create empty files",
        }
    }

    /// Runs the command against `tree` with `cwd` as the current directory
    pub fn execute(self, tree: &mut Tree, cwd: DirId) -> CommandOutput {
        match self {
            Command::Clear => CommandOutput::transition(Transition::ClearHistory),
            Command::Help => CommandOutput::text(HELP_TEXT),
            Command::Echo { words } => CommandOutput::text(words.join(" ")),
            Command::Ls => CommandOutput::text(tree.listing(cwd).join(" ")),
            Command::Cd { target } => change_directory(tree, cwd, target),
            Command::Pwd => CommandOutput::text(resolve_path(tree, cwd)),
            Command::Mkdir { path } => make_directory(tree, cwd, path),
            Command::Touch { path } => touch(tree, cwd, path),
            Command::Empty => CommandOutput::default(),
        }
    }
}

fn change_directory(tree: &Tree, cwd: DirId, target: Option<String>) -> CommandOutput {
    let Some(target) = target else {
        return CommandOutput::text("cd: missing argument");
    };

    // At the root `..` is not special and goes through the name lookup below
    if target == ".." {
        if let Some(parent) = tree.parent(cwd) {
            return CommandOutput::transition(Transition::ChangeDirectory(parent));
        }
    }

    match tree.find_subdirectory(cwd, &target) {
        Some(dir) => CommandOutput::transition(Transition::ChangeDirectory(dir)),
        None => {
            debug!("No subdirectory '{}' in {}", target, cwd);
            CommandOutput::text(format!("cd: {target}: No such file or directory"))
        }
    }
}

fn make_directory(tree: &mut Tree, cwd: DirId, path: Option<String>) -> CommandOutput {
    let Some(path) = path else {
        return CommandOutput::text("mkdir: missing argument");
    };

    match tree.create_directory(cwd, &path) {
        Ok(_) => CommandOutput::transition(Transition::RefreshTree),
        Err(TreeError::NameCollision { .. }) => CommandOutput::text(format!(
            "mkdir: cannot create directory '{path}': File exists"
        )),
        Err(TreeError::EmptyPath { .. } | TreeError::EmptyName) => {
            CommandOutput::text("mkdir: missing argument")
        }
    }
}

fn touch(tree: &mut Tree, cwd: DirId, path: Option<String>) -> CommandOutput {
    let Some(path) = path else {
        return CommandOutput::text("touch: missing argument");
    };

    match tree.create_file(cwd, &path) {
        Ok(_) => CommandOutput::transition(Transition::RefreshTree),
        Err(TreeError::NameCollision { .. }) => {
            CommandOutput::text(format!("touch: cannot create file '{path}': File exists"))
        }
        Err(TreeError::EmptyPath { .. } | TreeError::EmptyName) => {
            CommandOutput::text("touch: missing argument")
        }
    }
}
