use std::collections::HashSet;

use crate::explorer::model::{TreeNode, ROOT_ID};

/// Expansion and selection state for the tree, keyed by node id.
///
/// Both sets survive snapshot reloads: callers intersect them with the new
/// tree's ids via [`TreeViewState::retain`], so ids that still exist keep
/// their state and stale ids are silently dropped.
///
/// The expansion set holds directory ids only by caller discipline — the UI
/// never offers an expansion toggle on a file row. Selection is
/// single-select: the set holds at most one id.
#[derive(Debug, Clone)]
pub struct TreeViewState {
    expanded: HashSet<String>,
    selected: HashSet<String>,
}

impl Default for TreeViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeViewState {
    /// Fresh state: root expanded, nothing selected.
    pub fn new() -> Self {
        let mut expanded = HashSet::new();
        expanded.insert(ROOT_ID.to_string());
        Self {
            expanded,
            selected: HashSet::new(),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    #[allow(dead_code)]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// The selected id, if any.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.iter().next().map(String::as_str)
    }

    /// Replace the selection with this node. Placeholders are
    /// non-interactive and rejected.
    pub fn select(&mut self, node: &TreeNode) {
        if node.is_placeholder {
            return;
        }
        self.selected.clear();
        self.selected.insert(node.id.clone());
    }

    /// Add `id` to the expansion set if absent, remove it if present.
    /// Callers only pass directory ids.
    pub fn toggle_expansion(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    /// Reset the expansion set to exactly `{root}`.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.expanded.insert(ROOT_ID.to_string());
    }

    /// Intersect both sets with the ids of a freshly loaded tree.
    pub fn retain(&mut self, live: &HashSet<String>) {
        self.expanded.retain(|id| live.contains(id));
        self.selected.retain(|id| live.contains(id));
    }

    #[allow(dead_code)]
    pub fn expanded_ids(&self) -> &HashSet<String> {
        &self.expanded
    }
}
