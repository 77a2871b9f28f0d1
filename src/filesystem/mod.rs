//! In-memory directory tree the shell operates on.
//!
//! Directories own their children; every node keeps a non-owning index of
//! its parent so paths can be resolved by walking upwards.

mod path;
mod tree;

pub use path::{ROOT_SENTINEL, resolve_path};
pub use tree::{DirId, FileId, NodeId, NodeKind, NodeName, ROOT_NAME, Tree, TreeError};
