use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tracing::debug;

use super::{CodecError, DecodeSnafu, EncodeSnafu, InvalidTreeSnafu};
use crate::filesystem::{DirId, NodeName, Tree};

// Encoding and decoding recurse once per directory level; the stack is grown
// on demand so that depth is bounded by memory only.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

/// Borrowed view of a directory used for encoding. Parents are written as
/// their name label only, so the output never recurses back up the tree.
struct EncodedDirectory<'a> {
    tree: &'a Tree,
    dir: DirId,
}

#[derive(Serialize)]
struct EncodedFile<'a> {
    name: &'a str,
    parent: &'a str,
    content: &'a str,
}

impl Serialize for EncodedDirectory<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || -> Result<S::Ok, S::Error> {
            let tree = self.tree;
            let name = tree.name(self.dir);
            let subdirectories = tree.subdirectories(self.dir);
            let files = tree.files(self.dir);

            let mut state = serializer.serialize_struct("Directory", 4)?;
            state.serialize_field("name", name)?;
            match tree.parent(self.dir) {
                Some(parent) => state.serialize_field("parent", tree.name(parent))?,
                None => state.skip_field("parent")?,
            }
            if subdirectories.is_empty() {
                state.skip_field("subdirectories")?;
            } else {
                let subdirectories = subdirectories
                    .iter()
                    .map(|sub| EncodedDirectory { tree, dir: *sub })
                    .collect::<Vec<_>>();
                state.serialize_field("subdirectories", &subdirectories)?;
            }
            if files.is_empty() {
                state.skip_field("files")?;
            } else {
                let files = files
                    .iter()
                    .map(|file| EncodedFile {
                        name: tree.name(*file),
                        parent: name,
                        content: tree.file_content(*file),
                    })
                    .collect::<Vec<_>>();
                state.serialize_field("files", &files)?;
            }
            state.end()
        })
    }
}

/// Stored shape of a directory. Any `parent` label in the input is ignored;
/// links are rebuilt by [`set_parent_dirs`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryWithoutParent {
    pub name: String,
    #[serde(default)]
    pub subdirectories: Option<Vec<DirectoryWithoutParent>>,
    #[serde(default)]
    pub files: Option<Vec<FileWithoutParent>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileWithoutParent {
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// Encodes the subtree rooted at `dir` as JSON
pub fn encode_directory(tree: &Tree, dir: DirId) -> Result<String, CodecError> {
    let encoded = serde_json::to_string(&EncodedDirectory { tree, dir })
        .context(EncodeSnafu { what: "directory" })?;
    debug!("Encoded directory {} ({} bytes)", tree.name(dir), encoded.len());
    Ok(encoded)
}

/// Decodes a stored directory. The stored entry point becomes the root of the
/// returned tree, even when it was not the root when it was encoded.
pub fn decode_directory(text: &str) -> Result<Tree, CodecError> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let stored = DirectoryWithoutParent::deserialize(serde_stacker::Deserializer::new(
        &mut deserializer,
    ))
    .context(DecodeSnafu { what: "directory" })?;
    deserializer
        .end()
        .context(DecodeSnafu { what: "directory" })?;

    let root_name = NodeName::new(stored.name.as_str()).context(InvalidTreeSnafu)?;
    let mut tree = Tree::new(root_name);
    let root = tree.root();
    set_parent_dirs(&mut tree, root, stored)?;

    debug!("Decoded directory tree rooted at {}", tree.name(root));
    Ok(tree)
}

/// Attaches the children of `stored` below `dir`, linking every subdirectory
/// and file to its live parent, then descends into the subdirectories.
/// Siblings keep their stored order.
pub fn set_parent_dirs(
    tree: &mut Tree,
    dir: DirId,
    stored: DirectoryWithoutParent,
) -> Result<(), CodecError> {
    let mut pending = vec![(dir, stored)];

    while let Some((dir, stored)) = pending.pop() {
        for file in stored.files.unwrap_or_default() {
            let name = NodeName::new(file.name).context(InvalidTreeSnafu)?;
            tree.insert_file(dir, name, file.content)
                .context(InvalidTreeSnafu)?;
        }

        for subdirectory in stored.subdirectories.unwrap_or_default() {
            let name = NodeName::new(subdirectory.name.as_str()).context(InvalidTreeSnafu)?;
            let child = tree.insert_directory(dir, name).context(InvalidTreeSnafu)?;
            pending.push((child, subdirectory));
        }
    }

    Ok(())
}
