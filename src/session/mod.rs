//! Session state: current directory, transcript and their persistence.

mod session;
mod store;
mod transcript;

pub use session::{Session, Submission};
pub use store::{AnyStore, FileStore, MemoryStore, SessionStore, StoreError, StoredState};
pub use transcript::TranscriptEntry;
