mod command;
mod dispatcher;
mod transition;

pub use command::{Command, CommandOutput, HELP_TEXT};
pub use dispatcher::dispatch;
pub use transition::Transition;
