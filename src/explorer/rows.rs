use crate::explorer::icons;
use crate::explorer::model::{display_children, TreeModel, TreeNode};
use crate::explorer::state::TreeViewState;

/// One line of the derived display list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub is_directory: bool,
    pub is_placeholder: bool,
    pub is_expanded: bool,
}

/// Derive the flat display row list from the model and the expansion set.
///
/// Placeholders are synthesized during the walk via
/// [`display_children`], never stored. The root row carries the
/// project-name override as its display name.
pub fn derive_rows(model: &TreeModel, state: &TreeViewState) -> Vec<Row> {
    let root = model.root();
    let root_expanded = state.is_expanded(&root.id);
    let mut rows = vec![Row {
        id: root.id.clone(),
        name: model.root_label().to_string(),
        depth: 0,
        is_directory: true,
        is_placeholder: false,
        is_expanded: root_expanded,
    }];
    if root_expanded {
        push_children(&display_children(root), 1, state, &mut rows);
    }
    rows
}

fn push_children(children: &[TreeNode], depth: usize, state: &TreeViewState, rows: &mut Vec<Row>) {
    for child in children {
        let expanded = child.is_directory && state.is_expanded(&child.id);
        rows.push(Row {
            id: child.id.clone(),
            name: child.name.clone(),
            depth,
            is_directory: child.is_directory,
            is_placeholder: child.is_placeholder,
            is_expanded: expanded,
        });
        if expanded {
            push_children(&display_children(child), depth + 1, state, rows);
        }
    }
}

/// How a single row should be rendered. Pure — no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAppearance {
    pub chevron_visible: bool,
    pub icon: &'static str,
    pub label: String,
    pub toolbar_visible: bool,
}

/// Compute the render description for a row.
pub fn row_appearance(row: &Row, is_selected: bool, use_icons: bool) -> RowAppearance {
    let icon = if row.is_placeholder {
        ""
    } else if row.is_directory {
        match (use_icons, row.is_expanded) {
            (true, true) => " ",
            (true, false) => " ",
            (false, _) => "[D] ",
        }
    } else if use_icons {
        icons::glyph_for(&row.name)
    } else {
        "[F] "
    };

    RowAppearance {
        chevron_visible: row.is_directory,
        icon,
        label: row.name.clone(),
        toolbar_visible: is_selected && row.is_directory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::model::TreeNode;

    fn sample_model() -> TreeModel {
        TreeModel::new(TreeNode::root(
            "demo",
            Some("/home/user/demo".to_string()),
            vec![
                TreeNode::directory(
                    "src",
                    "src",
                    vec![TreeNode::file("src/main.rs", "main.rs")],
                ),
                TreeNode::directory("assets", "assets", vec![]),
                TreeNode::file("README.md", "README.md"),
            ],
        ))
    }

    fn names(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn collapsed_children_are_hidden() {
        let model = sample_model();
        let state = TreeViewState::new();
        let rows = derive_rows(&model, &state);
        assert_eq!(names(&rows), vec!["demo", "src", "assets", "README.md"]);
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[1].depth, 1);
    }

    #[test]
    fn expanding_a_directory_reveals_children() {
        let model = sample_model();
        let mut state = TreeViewState::new();
        state.toggle_expansion("src");
        let rows = derive_rows(&model, &state);
        assert_eq!(
            names(&rows),
            vec!["demo", "src", "main.rs", "assets", "README.md"]
        );
        let main = rows.iter().find(|r| r.id == "src/main.rs").unwrap();
        assert_eq!(main.depth, 2);
    }

    #[test]
    fn expanded_empty_directory_shows_one_placeholder_row() {
        let model = sample_model();
        let mut state = TreeViewState::new();
        state.toggle_expansion("assets");
        let rows = derive_rows(&model, &state);
        let placeholders: Vec<&Row> = rows.iter().filter(|r| r.is_placeholder).collect();
        assert_eq!(placeholders.len(), 1);
        assert_eq!(placeholders[0].id, "assets__empty");
        assert_eq!(placeholders[0].name, "empty");
        assert_eq!(placeholders[0].depth, 2);
    }

    #[test]
    fn derivation_is_stable_across_calls() {
        let model = sample_model();
        let mut state = TreeViewState::new();
        state.toggle_expansion("assets");
        assert_eq!(derive_rows(&model, &state), derive_rows(&model, &state));
    }

    #[test]
    fn root_row_uses_project_name_override() {
        let mut model = sample_model();
        model.set_project_name("My Project".to_string());
        let rows = derive_rows(&model, &TreeViewState::new());
        assert_eq!(rows[0].name, "My Project");
        assert_eq!(rows[0].id, "root");
    }

    #[test]
    fn collapsed_root_yields_only_the_root_row() {
        let model = sample_model();
        let mut state = TreeViewState::new();
        state.toggle_expansion("root");
        let rows = derive_rows(&model, &state);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn directory_rows_show_a_chevron() {
        let model = sample_model();
        let rows = derive_rows(&model, &TreeViewState::new());
        let src = rows.iter().find(|r| r.id == "src").unwrap();
        let readme = rows.iter().find(|r| r.id == "README.md").unwrap();
        assert!(row_appearance(src, false, true).chevron_visible);
        assert!(!row_appearance(readme, false, true).chevron_visible);
    }

    #[test]
    fn placeholder_rows_are_plain() {
        let row = Row {
            id: "assets__empty".to_string(),
            name: "empty".to_string(),
            depth: 2,
            is_directory: false,
            is_placeholder: true,
            is_expanded: false,
        };
        let look = row_appearance(&row, false, true);
        assert!(!look.chevron_visible);
        assert!(!look.toolbar_visible);
        assert_eq!(look.icon, "");
        assert_eq!(look.label, "empty");
    }

    #[test]
    fn toolbar_shows_on_selected_directories_only() {
        let model = sample_model();
        let rows = derive_rows(&model, &TreeViewState::new());
        let src = rows.iter().find(|r| r.id == "src").unwrap();
        let readme = rows.iter().find(|r| r.id == "README.md").unwrap();
        assert!(row_appearance(src, true, true).toolbar_visible);
        assert!(!row_appearance(src, false, true).toolbar_visible);
        assert!(!row_appearance(readme, true, true).toolbar_visible);
    }

    #[test]
    fn ascii_mode_uses_bracket_indicators() {
        let model = sample_model();
        let rows = derive_rows(&model, &TreeViewState::new());
        let src = rows.iter().find(|r| r.id == "src").unwrap();
        let readme = rows.iter().find(|r| r.id == "README.md").unwrap();
        assert_eq!(row_appearance(src, false, false).icon, "[D] ");
        assert_eq!(row_appearance(readme, false, false).icon, "[F] ");
    }
}
