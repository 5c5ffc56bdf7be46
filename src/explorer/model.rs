use std::borrow::Cow;
use std::collections::HashSet;

/// Id of the tree root, fixed across reloads.
pub const ROOT_ID: &str = "root";

/// Suffix appended to a parent id to form its placeholder child id.
const PLACEHOLDER_SUFFIX: &str = "__empty";

/// Display name of placeholder rows.
const PLACEHOLDER_NAME: &str = "empty";

/// A node in the loaded project snapshot.
///
/// `id` is the tree-relative path of the node (`"root"` for the root, then
/// `"src"`, `"src/main.rs"`, …), unique across the tree and stable across
/// reloads for unchanged paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub is_directory: bool,
    /// Populated for directories only; insertion order is display order.
    pub children: Vec<TreeNode>,
    /// True only for synthesized "empty" rows, which are never part of a
    /// loaded snapshot and never interactive.
    pub is_placeholder: bool,
    /// Absolute path shown beside the root's display name. Root only.
    pub dir_path: Option<String>,
}

impl TreeNode {
    /// Create a file node.
    pub fn file(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_directory: false,
            children: Vec::new(),
            is_placeholder: false,
            dir_path: None,
        }
    }

    /// Create a directory node with the given children.
    pub fn directory(
        id: impl Into<String>,
        name: impl Into<String>,
        children: Vec<TreeNode>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_directory: true,
            children,
            is_placeholder: false,
            dir_path: None,
        }
    }

    /// Create the root node. The root id is always [`ROOT_ID`].
    pub fn root(name: impl Into<String>, dir_path: Option<String>, children: Vec<TreeNode>) -> Self {
        Self {
            id: ROOT_ID.to_string(),
            name: name.into(),
            is_directory: true,
            children,
            is_placeholder: false,
            dir_path,
        }
    }

    /// Synthesize the placeholder child for an empty directory.
    ///
    /// The id is derived deterministically from the parent id so it stays
    /// stable render-to-render without ever being stored in the snapshot.
    pub fn placeholder_for(parent_id: &str) -> Self {
        Self {
            id: format!("{parent_id}{PLACEHOLDER_SUFFIX}"),
            name: PLACEHOLDER_NAME.to_string(),
            is_directory: false,
            children: Vec::new(),
            is_placeholder: true,
            dir_path: None,
        }
    }

    /// Lightweight snapshot of this node for menu targeting.
    pub fn to_ref(&self) -> NodeRef {
        NodeRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// The children a directory presents for display.
///
/// An empty directory yields exactly one synthesized placeholder; everything
/// else yields its stored children unchanged (files yield an empty slice).
/// Pure and idempotent — the stored snapshot is never touched.
pub fn display_children(node: &TreeNode) -> Cow<'_, [TreeNode]> {
    if node.is_directory && node.children.is_empty() {
        Cow::Owned(vec![TreeNode::placeholder_for(&node.id)])
    } else {
        Cow::Borrowed(node.children.as_slice())
    }
}

/// Owned snapshot of a node's identity, captured by the context menu.
///
/// The id doubles as the node's tree-relative path. Holding a `NodeRef`
/// never borrows into the model, so a menu target stays valid (stale-safe)
/// even if a reload replaces the tree underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: String,
    pub name: String,
}

/// The loaded snapshot plus the project-name override for the root label.
#[derive(Debug, Clone)]
pub struct TreeModel {
    root: TreeNode,
    project_name: Option<String>,
}

impl TreeModel {
    /// Wrap a loaded snapshot.
    pub fn new(root: TreeNode) -> Self {
        Self {
            root,
            project_name: None,
        }
    }

    /// Fallback model used when the snapshot loader fails: an empty root.
    pub fn empty() -> Self {
        Self::new(TreeNode::root("project", None, Vec::new()))
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Replace the snapshot wholesale, keeping the project-name override.
    pub fn replace_root(&mut self, root: TreeNode) {
        self.root = root;
    }

    /// Override the root's display name. Id and children are untouched.
    pub fn set_project_name(&mut self, name: String) {
        self.project_name = Some(name);
    }

    /// The root's display label: the project-name override when present,
    /// the snapshot name otherwise.
    pub fn root_label(&self) -> &str {
        self.project_name.as_deref().unwrap_or(&self.root.name)
    }

    /// Find a node by id. Placeholders are synthesized on read and are
    /// therefore never found here.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        fn walk<'a>(node: &'a TreeNode, id: &str) -> Option<&'a TreeNode> {
            if node.id == id {
                return Some(node);
            }
            node.children.iter().find_map(|child| walk(child, id))
        }
        walk(&self.root, id)
    }

    #[allow(dead_code)]
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// All ids present in the snapshot, for reconciling the key sets after
    /// a reload.
    pub fn collect_ids(&self) -> HashSet<String> {
        fn walk(node: &TreeNode, ids: &mut HashSet<String>) {
            ids.insert(node.id.clone());
            for child in &node.children {
                walk(child, ids);
            }
        }
        let mut ids = HashSet::new();
        walk(&self.root, &mut ids);
        ids
    }
}
