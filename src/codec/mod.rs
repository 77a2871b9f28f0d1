//! Text encodings for the persisted session: the cycle-broken directory tree
//! and the command transcript.

mod directory_codec;
mod history_codec;

pub use directory_codec::{
    DirectoryWithoutParent, FileWithoutParent, decode_directory, encode_directory, set_parent_dirs,
};
pub use history_codec::{decode_history, encode_history};

use snafu::Snafu;

use crate::filesystem::TreeError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CodecError {
    #[snafu(display("Failed to encode {}", what))]
    EncodeError {
        what: String,
        source: serde_json::Error,
    },
    #[snafu(display("Failed to decode {}", what))]
    DecodeError {
        what: String,
        source: serde_json::Error,
    },
    #[snafu(display("Stored directory tree is inconsistent"))]
    InvalidTreeError { source: TreeError },
}
