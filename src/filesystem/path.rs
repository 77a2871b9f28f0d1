use super::tree::{NodeId, Tree};

/// What the root directory resolves to, whatever its stored name
pub const ROOT_SENTINEL: &str = "~";

/// Absolute path of `node`, e.g. `~/Documents/notes.txt`.
///
/// Walks parent links up to the parentless root of `tree`.
pub fn resolve_path(tree: &Tree, node: impl Into<NodeId>) -> String {
    let mut segments = Vec::new();
    let mut current = node.into();

    while let Some(parent) = tree.parent(current) {
        segments.push(tree.name(current));
        current = parent.into();
    }

    segments.reverse();
    std::iter::once(ROOT_SENTINEL)
        .chain(segments)
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::NodeName;
    use rstest::*;

    #[test]
    fn test_root_resolves_to_sentinel() {
        let tree = Tree::with_default_layout();
        assert_eq!(resolve_path(&tree, tree.root()), "~");
    }

    #[test]
    fn test_root_resolves_to_sentinel_regardless_of_name() {
        let tree = Tree::new(NodeName::new("Documents").unwrap());
        assert_eq!(resolve_path(&tree, tree.root()), "~");
    }

    #[rstest]
    #[case("Desktop", 1)]
    #[case("a/b", 2)]
    #[case("one/two/three/four", 4)]
    fn test_segment_count_matches_depth(#[case] path: &str, #[case] depth: usize) {
        let mut tree = Tree::with_default_layout();
        let root = tree.root();
        let dir = match tree.find_subdirectory(root, path) {
            Some(existing) => existing,
            None => tree.create_directory(root, path).unwrap(),
        };

        let resolved = resolve_path(&tree, dir);

        assert_eq!(resolved, format!("~/{path}"));
        assert_eq!(resolved.split('/').skip(1).count(), depth);
    }

    #[test]
    fn test_file_path_includes_parent_chain() {
        let mut tree = Tree::with_default_layout();
        let root = tree.root();
        let file = tree.create_file(root, "Documents/work/plan.md").unwrap();

        assert_eq!(resolve_path(&tree, file), "~/Documents/work/plan.md");
    }

    #[test]
    fn test_path_preserves_name_case() {
        let mut tree = Tree::with_default_layout();
        let root = tree.root();
        let dir = tree.create_directory(root, "MixedCase").unwrap();

        assert_eq!(resolve_path(&tree, dir), "~/MixedCase");
    }
}
