mod application_impl;
pub mod data;
mod repl;
mod runtime_config;

pub use application_impl::{Application, ApplicationError};
pub use repl::Repl;
pub use runtime_config::RuntimeConfig;
