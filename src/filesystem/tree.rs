use derive_more::{Deref, Display, From};
use snafu::{Snafu, ensure};
use tracing::debug;

/// Name of the root directory of a freshly seeded tree
pub const ROOT_NAME: &str = "~";

/// Index of a directory inside a [`Tree`].
///
/// Ids are only handed out by the tree that owns the node. Using an id from
/// another tree is a bug and panics on access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("dir#{_0}")]
pub struct DirId(usize);

/// Index of a file inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("file#{_0}")]
pub struct FileId(usize);

/// Any node of the tree, directory or file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
pub enum NodeId {
    Directory(DirId),
    File(FileId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NodeKind {
    #[display("directory")]
    Directory,
    #[display("file")]
    File,
}

/// Non-empty node label. Case is kept for display, comparisons ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Display, Deref)]
pub struct NodeName(String);

impl NodeName {
    pub fn new(name: impl Into<String>) -> Result<Self, TreeError> {
        let name = name.into();
        ensure!(!name.is_empty(), EmptyNameSnafu);
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison used for lookup and collision checks
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

#[derive(Debug, Clone)]
struct DirectoryNode {
    name: NodeName,
    parent: Option<DirId>,
    subdirectories: Vec<DirId>,
    files: Vec<FileId>,
}

#[derive(Debug, Clone)]
struct FileNode {
    name: NodeName,
    parent: DirId,
    content: String,
}

/// Arena holding the directory hierarchy.
///
/// Directories own their children through the `subdirectories` and `files`
/// index lists. The `parent` index on every node is a plain back-reference and
/// is never followed when copying or encoding children. Nodes are appended and
/// never moved, so the parent chain is acyclic by construction.
#[derive(Debug, Clone)]
pub struct Tree {
    directories: Vec<DirectoryNode>,
    files: Vec<FileNode>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::with_default_layout()
    }
}

impl Tree {
    /// Creates a tree holding only a root directory with the given name
    pub fn new(root_name: NodeName) -> Self {
        Tree {
            directories: vec![DirectoryNode {
                name: root_name,
                parent: None,
                subdirectories: Vec::new(),
                files: Vec::new(),
            }],
            files: Vec::new(),
        }
    }

    /// The tree a brand new session starts with:
    /// `~` holding `Desktop/`, `Documents/` and an empty `README.md`
    pub fn with_default_layout() -> Self {
        let mut tree = Tree::new(NodeName(ROOT_NAME.to_string()));
        let root = tree.root();
        for name in ["Desktop", "Documents"] {
            tree.attach_directory(root, NodeName(name.to_string()));
        }
        tree.attach_file(root, NodeName("README.md".to_string()), String::new());
        tree
    }

    pub fn root(&self) -> DirId {
        DirId(0)
    }

    pub fn name(&self, node: impl Into<NodeId>) -> &str {
        match node.into() {
            NodeId::Directory(dir) => self.directory(dir).name.as_str(),
            NodeId::File(file) => self.file(file).name.as_str(),
        }
    }

    pub fn parent(&self, node: impl Into<NodeId>) -> Option<DirId> {
        match node.into() {
            NodeId::Directory(dir) => self.directory(dir).parent,
            NodeId::File(file) => Some(self.file(file).parent),
        }
    }

    pub fn subdirectories(&self, dir: DirId) -> &[DirId] {
        &self.directory(dir).subdirectories
    }

    pub fn files(&self, dir: DirId) -> &[FileId] {
        &self.directory(dir).files
    }

    pub fn file_content(&self, file: FileId) -> &str {
        &self.file(file).content
    }

    pub fn find_subdirectory(&self, dir: DirId, name: &str) -> Option<DirId> {
        self.subdirectories(dir)
            .iter()
            .copied()
            .find(|sub| self.directory(*sub).name.matches(name))
    }

    pub fn find_file(&self, dir: DirId, name: &str) -> Option<FileId> {
        self.files(dir)
            .iter()
            .copied()
            .find(|file| self.file(*file).name.matches(name))
    }

    /// Entries of `dir` as `ls` shows them: subdirectories first, each
    /// suffixed with `/`, then files, both in insertion order
    pub fn listing(&self, dir: DirId) -> Vec<String> {
        let subdirectories = self
            .subdirectories(dir)
            .iter()
            .map(|sub| format!("{}/", self.name(*sub)));
        let files = self
            .files(dir)
            .iter()
            .map(|file| self.name(*file).to_string());
        subdirectories.chain(files).collect()
    }

    /// Appends a single directory under `parent`
    pub fn insert_directory(&mut self, parent: DirId, name: NodeName) -> Result<DirId, TreeError> {
        ensure!(
            self.find_subdirectory(parent, &name).is_none(),
            NameCollisionSnafu {
                name: name.as_str(),
                kind: NodeKind::Directory,
            }
        );
        Ok(self.attach_directory(parent, name))
    }

    /// Appends a single file under `parent`
    pub fn insert_file(
        &mut self,
        parent: DirId,
        name: NodeName,
        content: String,
    ) -> Result<FileId, TreeError> {
        ensure!(
            self.find_file(parent, &name).is_none(),
            NameCollisionSnafu {
                name: name.as_str(),
                kind: NodeKind::File,
            }
        );
        Ok(self.attach_file(parent, name, content))
    }

    /// Creates a directory at a slash-delimited path relative to `parent`.
    /// Intermediate segments are descended into, or created when missing.
    /// Only the last segment may collide.
    pub fn create_directory(&mut self, parent: DirId, path: &str) -> Result<DirId, TreeError> {
        let (parent, name) = self.walk_to_terminal(parent, path)?;
        let dir = self.insert_directory(parent, name)?;
        debug!("Created directory {} under {}", path, parent);
        Ok(dir)
    }

    /// Creates an empty file at a slash-delimited path relative to `parent`,
    /// with the same intermediate directory handling as [`Tree::create_directory`]
    pub fn create_file(&mut self, parent: DirId, path: &str) -> Result<FileId, TreeError> {
        let (parent, name) = self.walk_to_terminal(parent, path)?;
        let file = self.insert_file(parent, name, String::new())?;
        debug!("Created file {} under {}", path, parent);
        Ok(file)
    }

    fn walk_to_terminal(
        &mut self,
        start: DirId,
        path: &str,
    ) -> Result<(DirId, NodeName), TreeError> {
        let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
        let mut current = start;

        while let Some(segment) = segments.next() {
            let name = NodeName::new(segment)?;
            if segments.peek().is_none() {
                return Ok((current, name));
            }
            current = match self.find_subdirectory(current, &name) {
                Some(existing) => existing,
                None => self.attach_directory(current, name),
            };
        }

        EmptyPathSnafu { path }.fail()
    }

    fn attach_directory(&mut self, parent: DirId, name: NodeName) -> DirId {
        let id = DirId(self.directories.len());
        self.directories.push(DirectoryNode {
            name,
            parent: Some(parent),
            subdirectories: Vec::new(),
            files: Vec::new(),
        });
        self.directory_mut(parent).subdirectories.push(id);
        id
    }

    fn attach_file(&mut self, parent: DirId, name: NodeName, content: String) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(FileNode {
            name,
            parent,
            content,
        });
        self.directory_mut(parent).files.push(id);
        id
    }

    fn directory(&self, dir: DirId) -> &DirectoryNode {
        &self.directories[dir.0]
    }

    fn directory_mut(&mut self, dir: DirId) -> &mut DirectoryNode {
        &mut self.directories[dir.0]
    }

    fn file(&self, file: FileId) -> &FileNode {
        &self.files[file.0]
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum TreeError {
    #[snafu(display("A {} named '{}' already exists", kind, name))]
    NameCollision { name: String, kind: NodeKind },
    #[snafu(display("Path '{}' does not name anything", path))]
    EmptyPath { path: String },
    #[snafu(display("Node names cannot be empty"))]
    EmptyName,
}
