use serde::{Deserialize, Serialize};

/// One executed line as shown in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Input exactly as submitted
    pub raw: String,
    pub result: String,
    /// Path of the current directory when the line was submitted
    pub dir: String,
}

impl TranscriptEntry {
    pub fn new(raw: impl Into<String>, result: impl Into<String>, dir: impl Into<String>) -> Self {
        TranscriptEntry {
            raw: raw.into(),
            result: result.into(),
            dir: dir.into(),
        }
    }
}
