use crate::filesystem::DirId;

/// Session change requested by a command. Commands never touch session state
/// themselves; the session applies these after the command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Drop every transcript entry
    ClearHistory,
    /// Make the given directory the current one
    ChangeDirectory(DirId),
    /// The tree was mutated and must be persisted again
    RefreshTree,
}
