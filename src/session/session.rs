use tracing::{debug, info, warn};

use crate::codec::{decode_directory, decode_history, encode_directory, encode_history};
use crate::commands::{Transition, dispatch};
use crate::filesystem::{DirId, Tree, resolve_path};
use crate::session::{SessionStore, StoredState, TranscriptEntry};

/// Interactive shell state: the tree, the current directory and the
/// transcript, persisted through `S` after every change.
///
/// Lines are processed one at a time; every mutating entry point takes
/// `&mut self`, so the tree has a single writer.
pub struct Session<S: SessionStore> {
    tree: Tree,
    current_dir: DirId,
    history: Vec<TranscriptEntry>,
    store: S,
    stored: StoredState,
}

/// What one submitted line produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub entry: TranscriptEntry,
    pub transitions: Vec<Transition>,
}

impl<S: SessionStore> Session<S> {
    /// Starts a session from whatever `store` holds. Missing or unreadable
    /// entries fall back to an empty transcript and the default tree.
    pub fn restore(store: S) -> Self {
        let stored = store.load().unwrap_or_else(|err| {
            warn!("Failed to load session state, starting fresh: {}", err);
            StoredState::default()
        });

        let history = stored
            .history
            .as_deref()
            .and_then(|text| {
                decode_history(text)
                    .inspect_err(|err| warn!("Discarding stored history: {}", err))
                    .ok()
            })
            .unwrap_or_default();

        let tree = stored
            .directory
            .as_deref()
            .and_then(|text| {
                decode_directory(text)
                    .inspect_err(|err| warn!("Discarding stored directory: {}", err))
                    .ok()
            })
            .unwrap_or_else(Tree::with_default_layout);

        let current_dir = tree.root();
        info!(
            "Session restored with {} history entries at {}",
            history.len(),
            tree.name(current_dir)
        );

        Session {
            tree,
            current_dir,
            history,
            store,
            stored,
        }
    }

    /// Runs one already-sanitized input line.
    ///
    /// The transcript entry records the directory the line was typed in. It is
    /// appended before the command's transitions are applied, so `clear`
    /// leaves an empty transcript behind.
    pub fn submit(&mut self, input: &str) -> Submission {
        let dir = resolve_path(&self.tree, self.current_dir);
        let output = dispatch(&mut self.tree, self.current_dir, input);

        let entry = TranscriptEntry::new(input, output.result, dir);
        self.history.push(entry.clone());

        let mut tree_changed = false;
        for transition in &output.transitions {
            tree_changed |= self.apply(*transition);
        }

        self.persist_history();
        if tree_changed {
            self.persist_directory();
        }

        Submission {
            entry,
            transitions: output.transitions,
        }
    }

    /// Applies a transition; returns whether the stored tree is now stale
    fn apply(&mut self, transition: Transition) -> bool {
        debug!("Applying {:?}", transition);
        match transition {
            Transition::ClearHistory => {
                self.history.clear();
                false
            }
            Transition::ChangeDirectory(dir) => {
                self.current_dir = dir;
                true
            }
            Transition::RefreshTree => true,
        }
    }

    /// Raw input of a past line, counted back from the most recent one (0)
    pub fn entry_at_index(&self, index: usize) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .nth(index)
            .map(|entry| entry.raw.as_str())
    }

    pub fn history(&self) -> &[TranscriptEntry] {
        &self.history
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn current_dir(&self) -> DirId {
        self.current_dir
    }

    pub fn current_path(&self) -> String {
        resolve_path(&self.tree, self.current_dir)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist_history(&mut self) {
        match encode_history(&self.history) {
            Ok(encoded) => {
                self.stored.history = Some(encoded);
                self.save();
            }
            Err(err) => warn!("Not persisting history: {}", err),
        }
    }

    // Only the subtree below the current directory is kept
    fn persist_directory(&mut self) {
        match encode_directory(&self.tree, self.current_dir) {
            Ok(encoded) => {
                self.stored.directory = Some(encoded);
                self.save();
            }
            Err(err) => warn!("Not persisting directory: {}", err),
        }
    }

    fn save(&mut self) {
        if let Err(err) = self.store.save(&self.stored) {
            warn!("Failed to save session state: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::NodeName;
    use crate::session::{MemoryStore, StoreError};

    fn fresh() -> Session<MemoryStore> {
        Session::restore(MemoryStore::default())
    }

    fn results(session: &mut Session<MemoryStore>, lines: &[&str]) -> Vec<String> {
        lines
            .iter()
            .map(|line| session.submit(line).entry.result)
            .collect()
    }

    /// Store that can be read but refuses writes
    struct ReadOnlyStore;

    impl SessionStore for ReadOnlyStore {
        fn load(&self) -> Result<StoredState, StoreError> {
            Ok(StoredState::default())
        }

        fn save(&mut self, _state: &StoredState) -> Result<(), StoreError> {
            Err(StoreError::WriteError {
                path: "/read-only".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read only"),
            })
        }
    }

    /// Store whose reads always fail
    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn load(&self) -> Result<StoredState, StoreError> {
            Err(StoreError::ReadError {
                path: "/broken".into(),
                source: std::io::Error::other("broken"),
            })
        }

        fn save(&mut self, _state: &StoredState) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn test_fresh_session_starts_at_default_root() {
        let session = fresh();

        assert_eq!(session.current_path(), "~");
        assert!(session.history().is_empty());
        assert_eq!(
            session.tree().listing(session.current_dir()),
            vec!["Desktop/", "Documents/", "README.md"]
        );
    }

    #[test]
    fn test_mkdir_cd_pwd() {
        let mut session = fresh();

        let results = results(&mut session, &["mkdir projects", "cd projects", "pwd"]);

        assert_eq!(results, vec!["", "", "~/projects"]);
    }

    #[test]
    fn test_entry_records_directory_at_submission() {
        let mut session = fresh();

        session.submit("cd Desktop");
        session.submit("cd ..");
        let dirs = session
            .history()
            .iter()
            .map(|entry| entry.dir.as_str())
            .collect::<Vec<_>>();

        assert_eq!(dirs, vec!["~", "~/Desktop"]);
        assert_eq!(session.current_path(), "~");
    }

    #[test]
    fn test_clear_empties_history_and_keeps_directory() {
        let mut session = fresh();
        session.submit("cd Documents");
        session.submit("echo hi");

        let submission = session.submit("clear");

        assert_eq!(submission.transitions, vec![Transition::ClearHistory]);
        assert!(session.history().is_empty());
        assert_eq!(session.store().state().history.as_deref(), Some("[]"));
        assert_eq!(session.submit("pwd").entry.result, "~/Documents");
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_reload_after_clear_has_empty_history() {
        let mut session = fresh();
        results(&mut session, &["echo hi", "ls", "clear"]);

        let reloaded = Session::restore(session.into_store());

        assert!(reloaded.history().is_empty());
        assert_eq!(reloaded.entry_at_index(0), None);
    }

    #[test]
    fn test_unknown_command_is_only_recorded() {
        let mut session = fresh();

        let submission = session.submit("foo");

        assert_eq!(submission.entry, TranscriptEntry::new("foo", "command not found: foo", "~"));
        assert!(submission.transitions.is_empty());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.store().state().directory, None);
    }

    #[test]
    fn test_touch_twice_reports_collision() {
        let mut session = fresh();

        let results = results(&mut session, &["touch a.txt", "touch a.txt"]);

        assert_eq!(results[1], "touch: cannot create file 'a.txt': File exists");
    }

    #[test]
    fn test_entry_at_index_counts_back_from_latest() {
        let mut session = fresh();
        results(&mut session, &["ls", "pwd", "echo hi"]);

        assert_eq!(session.entry_at_index(0), Some("echo hi"));
        assert_eq!(session.entry_at_index(2), Some("ls"));
        assert_eq!(session.entry_at_index(3), None);
        assert_eq!(session.entry_at_index(usize::MAX), None);
    }

    #[test]
    fn test_history_is_persisted_after_every_line() {
        let mut session = fresh();

        session.submit("echo one");
        session.submit("ls");

        let stored = session.store().state().history.clone().unwrap();
        let decoded = decode_history(&stored).unwrap();
        assert_eq!(decoded, session.history());
    }

    #[test]
    fn test_directory_is_persisted_on_tree_change() {
        let mut session = fresh();

        session.submit("mkdir projects");

        let stored = session.store().state().directory.clone().unwrap();
        let tree = decode_directory(&stored).unwrap();
        assert_eq!(
            tree.listing(tree.root()),
            vec!["Desktop/", "Documents/", "projects/", "README.md"]
        );
    }

    #[test]
    fn test_reload_restores_history_and_tree() {
        let mut session = fresh();
        results(&mut session, &["mkdir projects", "touch notes.txt"]);

        let mut reloaded = Session::restore(session.into_store());

        assert_eq!(reloaded.history().len(), 2);
        assert_eq!(reloaded.entry_at_index(0), Some("touch notes.txt"));
        assert_eq!(
            reloaded.submit("ls").entry.result,
            "Desktop/ Documents/ projects/ README.md notes.txt"
        );
    }

    #[test]
    fn test_reload_after_cd_starts_from_saved_directory() {
        let mut session = fresh();
        results(&mut session, &["mkdir work/reports", "cd work"]);

        let mut reloaded = Session::restore(session.into_store());

        assert_eq!(reloaded.tree().name(reloaded.current_dir()), "work");
        assert_eq!(reloaded.submit("ls").entry.result, "reports/");
        assert_eq!(
            reloaded.submit("cd ..").entry.result,
            "cd: ..: No such file or directory"
        );
    }

    #[test]
    fn test_reload_keeps_deeply_nested_tree() {
        let mut session = fresh();
        let path = vec!["d"; 70].join("/");

        assert_eq!(session.submit(&format!("mkdir {path}")).entry.result, "");
        let mut reloaded = Session::restore(session.into_store());

        assert_eq!(
            reloaded.submit("ls").entry.result,
            "Desktop/ Documents/ d/ README.md"
        );
        let mut dir = reloaded.tree().root();
        for _ in 0..70 {
            dir = reloaded.tree().find_subdirectory(dir, "d").unwrap();
        }
        assert!(reloaded.tree().listing(dir).is_empty());
    }

    #[test]
    fn test_corrupted_entries_fall_back_to_defaults() {
        let store = MemoryStore::with_state(StoredState {
            history: Some("not json".to_string()),
            directory: Some("{\"name\":\"\"}".to_string()),
        });

        let session = Session::restore(store);

        assert!(session.history().is_empty());
        assert_eq!(
            session.tree().listing(session.current_dir()),
            vec!["Desktop/", "Documents/", "README.md"]
        );
    }

    #[test]
    fn test_stored_tree_is_used_when_present() {
        let mut tree = Tree::new(NodeName::new("~").unwrap());
        tree.create_directory(tree.root(), "only").unwrap();
        let store = MemoryStore::with_state(StoredState {
            history: None,
            directory: Some(encode_directory(&tree, tree.root()).unwrap()),
        });

        let mut session = Session::restore(store);

        assert_eq!(session.submit("ls").entry.result, "only/");
    }

    #[test]
    fn test_unreadable_store_starts_fresh() {
        let mut session = Session::restore(BrokenStore);

        assert_eq!(session.submit("pwd").entry.result, "~");
    }

    #[test]
    fn test_failed_writes_do_not_stop_the_session() {
        let mut session = Session::restore(ReadOnlyStore);

        session.submit("mkdir projects");
        session.submit("cd projects");

        assert_eq!(session.submit("pwd").entry.result, "~/projects");
        assert_eq!(session.history().len(), 3);
    }
}
