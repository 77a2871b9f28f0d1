use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bincode::{Decode, Encode};
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

/// Everything a session persists, as text entries keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct StoredState {
    /// Encoded transcript
    pub history: Option<String>,
    /// Encoded tree, rooted at the directory that was current when saved
    pub directory: Option<String>,
}

/// Storage the session reads once on start and writes after every change
pub trait SessionStore {
    fn load(&self) -> Result<StoredState, StoreError>;
    fn save(&mut self, state: &StoredState) -> Result<(), StoreError>;
}

/// Keeps the state in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: StoredState,
}

impl MemoryStore {
    pub fn with_state(state: StoredState) -> Self {
        MemoryStore { state }
    }

    pub fn state(&self) -> &StoredState {
        &self.state
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<StoredState, StoreError> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &StoredState) -> Result<(), StoreError> {
        self.state = state.clone();
        Ok(())
    }
}

/// Keeps the state in a single bincode file.
///
/// Reads and writes block on `std::fs`: [`SessionStore::save`] returns only
/// once the state is on disk, before the next line is read.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<StoredState, StoreError> {
        debug!("Reading session state from {}", self.path.display());
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No saved session found, starting fresh");
                return Ok(StoredState::default());
            }
            Err(err) => {
                return Err(err).context(ReadSnafu {
                    path: self.path.clone(),
                });
            }
        };

        let (state, _) = bincode::decode_from_slice(&bytes, bincode::config::standard())
            .context(DecodeSnafu {
                path: self.path.clone(),
            })?;
        Ok(state)
    }

    fn save(&mut self, state: &StoredState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context(WriteSnafu {
                    path: parent.to_path_buf(),
                })?;
            }
        }

        let bytes =
            bincode::encode_to_vec(state, bincode::config::standard()).context(EncodeSnafu)?;
        fs::write(&self.path, bytes).context(WriteSnafu {
            path: self.path.clone(),
        })?;
        debug!("Saved session state to {}", self.path.display());
        Ok(())
    }
}

/// Store picked at startup from the runtime configuration
#[derive(Debug, Clone)]
pub enum AnyStore {
    File(FileStore),
    Memory(MemoryStore),
}

impl SessionStore for AnyStore {
    fn load(&self) -> Result<StoredState, StoreError> {
        match self {
            AnyStore::File(store) => store.load(),
            AnyStore::Memory(store) => store.load(),
        }
    }

    fn save(&mut self, state: &StoredState) -> Result<(), StoreError> {
        match self {
            AnyStore::File(store) => store.save(state),
            AnyStore::Memory(store) => store.save(state),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum StoreError {
    #[snafu(display("Failed to read session state from {}", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write session state to {}", path.display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Session state in {} is corrupted", path.display()))]
    DecodeError {
        path: PathBuf,
        source: bincode::error::DecodeError,
    },
    #[snafu(display("Failed to serialize session state"))]
    EncodeError {
        source: bincode::error::EncodeError,
    },
}
