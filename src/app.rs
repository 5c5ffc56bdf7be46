use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::event::Event;
use crate::explorer::actions::ActionId;
use crate::explorer::confirm::ConfirmGate;
use crate::explorer::menu::ContextMenu;
use crate::explorer::model::{NodeRef, TreeModel, TreeNode};
use crate::explorer::rows::{derive_rows, Row};
use crate::explorer::source::ProjectSource;
use crate::explorer::state::TreeViewState;
use crate::theme::ThemeColors;

/// The explorer panel's composition root.
///
/// Owns the model, the key sets, the context menu, the confirm gate, and
/// the torn-down flag. All state mutation happens here, one event at a
/// time on the main loop.
pub struct App<S: ProjectSource> {
    pub source: S,
    pub model: TreeModel,
    pub view: TreeViewState,
    pub menu: ContextMenu,
    pub gate: ConfirmGate,
    pub theme: ThemeColors,
    pub use_icons: bool,
    /// True once both initial loads have completed.
    pub ready: bool,
    /// Set at teardown; any load completing afterwards is discarded.
    pub torn_down: bool,
    pub should_quit: bool,
    pub scroll_offset: usize,
}

impl<S: ProjectSource> App<S> {
    pub fn new(source: S, menu: ContextMenu, theme: ThemeColors, use_icons: bool) -> Self {
        Self {
            source,
            model: TreeModel::empty(),
            view: TreeViewState::new(),
            menu,
            gate: ConfirmGate::new(),
            theme,
            use_icons,
            ready: false,
            torn_down: false,
            should_quit: false,
            scroll_offset: 0,
        }
    }

    /// Kick off the two initial loads concurrently. Both must resolve
    /// before the tree is ready; the pair arrives as one event.
    pub fn start_initial_load(&self, tx: &UnboundedSender<Event>) {
        let source = self.source.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let (snapshot, name) =
                tokio::join!(source.load_snapshot(), source.load_project_name());
            let _ = tx.send(Event::ProjectLoaded { snapshot, name });
        });
    }

    /// Reload the snapshot only; the project name is kept.
    pub fn request_refresh(&self, tx: &UnboundedSender<Event>) {
        let source = self.source.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let snapshot = source.load_snapshot().await;
            let _ = tx.send(Event::SnapshotReloaded(snapshot));
        });
    }

    /// Apply the initial load pair. Either load failing falls back to a
    /// default (empty tree / snapshot root name) without crashing the view.
    pub fn handle_project_loaded(
        &mut self,
        snapshot: crate::error::Result<TreeNode>,
        name: crate::error::Result<String>,
    ) {
        if self.torn_down {
            debug!("initial load completed after teardown; discarding");
            return;
        }
        match snapshot {
            Ok(root) => self.model = TreeModel::new(root),
            Err(e) => {
                error!("failed to load project snapshot: {e}");
                self.model = TreeModel::empty();
            }
        }
        match name {
            Ok(n) => self.model.set_project_name(n),
            Err(e) => error!("failed to load project name: {e}"),
        }
        let live = self.model.collect_ids();
        self.view.retain(&live);
        self.ready = true;
    }

    /// Apply a reload: replace the model wholesale and reconcile the key
    /// sets, silently dropping ids that no longer exist. A failed reload
    /// keeps the current tree.
    pub fn handle_snapshot_reloaded(&mut self, snapshot: crate::error::Result<TreeNode>) {
        if self.torn_down {
            debug!("reload completed after teardown; discarding");
            return;
        }
        match snapshot {
            Ok(root) => {
                self.model.replace_root(root);
                let live = self.model.collect_ids();
                self.view.retain(&live);
            }
            Err(e) => error!("failed to reload project snapshot: {e}"),
        }
    }

    /// The current display row list.
    pub fn rows(&self) -> Vec<Row> {
        derive_rows(&self.model, &self.view)
    }

    /// Select the node behind a row. Placeholder rows are not in the model
    /// and are ignored.
    pub fn select_row(&mut self, row: &Row) {
        if let Some(node) = self.model.find(&row.id) {
            self.view.select(node);
        }
    }

    /// Move the selection up or down the row list, skipping placeholders
    /// and clamping at the ends. With no selection the first row is taken.
    pub fn move_cursor(&mut self, delta: isize) {
        let rows = self.rows();
        if rows.is_empty() {
            return;
        }
        let current = self
            .view
            .selected_id()
            .and_then(|id| rows.iter().position(|r| r.id == id));
        let next = match current {
            None => 0,
            Some(start) => step_selectable(&rows, start, delta),
        };
        let row = rows[next].clone();
        self.select_row(&row);
    }

    /// Toggle expansion of the selected row, directories only.
    pub fn toggle_selected_expansion(&mut self) {
        let rows = self.rows();
        let Some(row) = self
            .view
            .selected_id()
            .and_then(|id| rows.iter().find(|r| r.id == id))
        else {
            return;
        };
        if row.is_directory && !row.is_placeholder {
            self.view.toggle_expansion(&row.id);
        }
    }

    /// Open the context menu for a row at the given viewport position.
    /// Only directory rows are menu targets; placeholders never are. A row
    /// whose node has vanished from the model is silently ignored.
    pub fn open_menu_for_row(&mut self, x: u16, y: u16, row: &Row) {
        if !row.is_directory || row.is_placeholder {
            return;
        }
        let Some(node) = self.model.find(&row.id) else {
            return;
        };
        let target = node.to_ref();
        self.menu.open(x, y, target);
    }

    /// Dispatch an action for a target node.
    ///
    /// `collapse` and `refresh` mutate state directly; `delete` routes
    /// through the confirm gate first; the remaining file operations are
    /// logged no-ops.
    pub fn dispatch_action(
        &mut self,
        action: ActionId,
        target: NodeRef,
        tx: &UnboundedSender<Event>,
    ) {
        match action {
            ActionId::Close => {}
            ActionId::Collapse => self.view.collapse_all(),
            ActionId::Refresh => self.request_refresh(tx),
            ActionId::Delete => {
                let title = format!("Delete {}?", target.name);
                let message = format!("Remove \"{}\" from the project?", target.id);
                match self.gate.request(title, message) {
                    Ok(rx) => {
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            // A dropped gate counts as a dismissal.
                            let accepted = rx.await.unwrap_or(false);
                            let _ = tx.send(Event::ConfirmDecision {
                                action,
                                target,
                                accepted,
                            });
                        });
                    }
                    Err(e) => warn!("delete for {} not gated: {e}", target.id),
                }
            }
            other => info!(
                "action {} not implemented for {}",
                other.as_str(),
                target.id
            ),
        }
    }

    /// Apply a confirm-gate decision for a gated action.
    pub fn handle_confirm_decision(&mut self, action: ActionId, target: NodeRef, accepted: bool) {
        if !accepted {
            info!("{} cancelled for {}", action.as_str(), target.id);
            return;
        }
        match action {
            ActionId::Delete => info!("delete confirmed but not implemented for {}", target.id),
            other => info!("{} confirmed for {}", other.as_str(), target.id),
        }
    }

    /// Update the scroll offset to keep the selected row visible.
    pub fn update_scroll(&mut self, rows: &[Row], visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        let selected = self
            .view
            .selected_id()
            .and_then(|id| rows.iter().position(|r| r.id == id))
            .unwrap_or(0);
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + visible_height {
            self.scroll_offset = selected - visible_height + 1;
        }
    }

    /// Mark the panel as gone: loads resolving after this point are
    /// discarded instead of mutating state.
    pub fn teardown(&mut self) {
        self.torn_down = true;
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.teardown();
        self.should_quit = true;
    }
}

/// Step `delta` selectable rows from `start`, skipping placeholders and
/// stopping at the list edges.
fn step_selectable(rows: &[Row], start: usize, delta: isize) -> usize {
    let dir = delta.signum();
    if dir == 0 {
        return start;
    }
    let len = rows.len() as isize;
    let mut idx = start as isize;
    let mut remaining = delta.abs();
    while remaining > 0 {
        let mut next = idx + dir;
        while (0..len).contains(&next) && rows[next as usize].is_placeholder {
            next += dir;
        }
        if !(0..len).contains(&next) {
            break;
        }
        idx = next;
        remaining -= 1;
    }
    idx as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use crate::explorer::menu::directory_menu;
    use crate::theme::dark_theme;
    use tokio::sync::mpsc;

    fn sample_root() -> TreeNode {
        TreeNode::root(
            "demo",
            Some("/home/user/demo".to_string()),
            vec![
                TreeNode::directory(
                    "src",
                    "src",
                    vec![TreeNode::file("src/old.js", "old.js")],
                ),
                TreeNode::directory("assets", "assets", vec![]),
                TreeNode::file("README.md", "README.md"),
            ],
        )
    }

    #[derive(Clone)]
    struct StubSource;

    impl ProjectSource for StubSource {
        async fn load_snapshot(&self) -> Result<TreeNode> {
            Ok(sample_root())
        }

        async fn load_project_name(&self) -> Result<String> {
            Ok("Demo Project".to_string())
        }
    }

    fn setup_app() -> App<StubSource> {
        let mut app = App::new(
            StubSource,
            ContextMenu::new(directory_menu()),
            dark_theme(),
            true,
        );
        app.handle_project_loaded(Ok(sample_root()), Ok("Demo Project".to_string()));
        app
    }

    #[test]
    fn initial_load_applies_model_and_name() {
        let app = setup_app();
        assert!(app.ready);
        assert_eq!(app.model.root_label(), "Demo Project");
        assert_eq!(app.model.root().children.len(), 3);
    }

    #[test]
    fn load_after_teardown_is_discarded() {
        let mut app = App::new(
            StubSource,
            ContextMenu::new(directory_menu()),
            dark_theme(),
            true,
        );
        app.teardown();
        app.handle_project_loaded(Ok(sample_root()), Ok("Demo Project".to_string()));
        assert!(!app.ready);
        assert_eq!(app.model.root().children.len(), 0);
    }

    #[test]
    fn failed_snapshot_load_falls_back_to_empty_tree() {
        let mut app = App::new(
            StubSource,
            ContextMenu::new(directory_menu()),
            dark_theme(),
            true,
        );
        app.handle_project_loaded(
            Err(AppError::InvalidPath("gone".into())),
            Err(AppError::InvalidPath("gone".into())),
        );
        assert!(app.ready);
        assert_eq!(app.model.root_label(), "project");
        assert!(app.model.root().children.is_empty());
    }

    #[test]
    fn reload_drops_stale_selection() {
        let mut app = setup_app();
        let old = app.model.find("src/old.js").unwrap().clone();
        app.view.select(&old);
        assert_eq!(app.view.selected_id(), Some("src/old.js"));

        // The reloaded tree no longer contains src/old.js.
        let reloaded = TreeNode::root(
            "demo",
            None,
            vec![TreeNode::directory("src", "src", vec![])],
        );
        app.handle_snapshot_reloaded(Ok(reloaded));
        assert!(app.view.selected_id().is_none());
        assert_eq!(app.model.root_label(), "Demo Project");
    }

    #[test]
    fn reload_after_teardown_is_discarded() {
        let mut app = setup_app();
        app.teardown();
        let reloaded = TreeNode::root("demo", None, vec![]);
        app.handle_snapshot_reloaded(Ok(reloaded));
        assert_eq!(app.model.root().children.len(), 3);
    }

    #[test]
    fn failed_reload_keeps_current_tree() {
        let mut app = setup_app();
        app.handle_snapshot_reloaded(Err(AppError::InvalidPath("gone".into())));
        assert_eq!(app.model.root().children.len(), 3);
    }

    #[test]
    fn move_cursor_walks_rows_and_clamps() {
        let mut app = setup_app();
        app.move_cursor(1);
        assert_eq!(app.view.selected_id(), Some("root"));
        app.move_cursor(1);
        assert_eq!(app.view.selected_id(), Some("src"));
        app.move_cursor(-5);
        assert_eq!(app.view.selected_id(), Some("root"));
        app.move_cursor(100);
        assert_eq!(app.view.selected_id(), Some("README.md"));
    }

    #[test]
    fn move_cursor_skips_placeholder_rows() {
        let mut app = setup_app();
        app.view.toggle_expansion("assets");
        // Rows: demo, src, assets, assets__empty, README.md
        let assets = app.model.find("assets").unwrap().clone();
        app.view.select(&assets);
        app.move_cursor(1);
        assert_eq!(app.view.selected_id(), Some("README.md"));
        app.move_cursor(-1);
        assert_eq!(app.view.selected_id(), Some("assets"));
    }

    #[test]
    fn toggle_selected_expansion_ignores_files() {
        let mut app = setup_app();
        let readme = app.model.find("README.md").unwrap().clone();
        app.view.select(&readme);
        app.toggle_selected_expansion();
        assert!(!app.view.is_expanded("README.md"));

        let src = app.model.find("src").unwrap().clone();
        app.view.select(&src);
        app.toggle_selected_expansion();
        assert!(app.view.is_expanded("src"));
    }

    #[test]
    fn menu_opens_only_for_directory_rows() {
        let mut app = setup_app();
        let rows = app.rows();
        let src = rows.iter().find(|r| r.id == "src").unwrap().clone();
        let readme = rows.iter().find(|r| r.id == "README.md").unwrap().clone();

        app.open_menu_for_row(10, 4, &readme);
        assert!(!app.menu.is_open());

        app.open_menu_for_row(10, 4, &src);
        assert!(app.menu.is_open());
        assert_eq!(app.menu.target().unwrap().id, "src");
        assert_eq!(app.menu.position(), Some((10, 4)));
    }

    #[test]
    fn menu_never_targets_placeholders() {
        let mut app = setup_app();
        app.view.toggle_expansion("assets");
        let rows = app.rows();
        let placeholder = rows.iter().find(|r| r.is_placeholder).unwrap().clone();
        app.open_menu_for_row(10, 4, &placeholder);
        assert!(!app.menu.is_open());
    }

    #[tokio::test]
    async fn collapse_action_resets_expansion() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = setup_app();
        app.view.toggle_expansion("src");
        app.view.toggle_expansion("assets");
        let target = app.model.find("src").unwrap().to_ref();
        app.dispatch_action(ActionId::Collapse, target, &tx);
        assert_eq!(app.view.expanded_ids().len(), 1);
        assert!(app.view.is_expanded("root"));
    }

    #[tokio::test]
    async fn refresh_action_sends_a_reload_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = setup_app();
        let target = app.model.find("root").unwrap().to_ref();
        app.dispatch_action(ActionId::Refresh, target, &tx);
        match rx.recv().await {
            Some(Event::SnapshotReloaded(Ok(root))) => assert_eq!(root.id, "root"),
            other => panic!("expected SnapshotReloaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_action_routes_through_the_gate() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = setup_app();
        let target = app.model.find("src").unwrap().to_ref();
        app.dispatch_action(ActionId::Delete, target, &tx);
        assert!(app.gate.is_open());
        assert_eq!(app.gate.title(), "Delete src?");

        app.gate.resolve(true);
        match rx.recv().await {
            Some(Event::ConfirmDecision {
                action,
                target,
                accepted,
            }) => {
                assert_eq!(action, ActionId::Delete);
                assert_eq!(target.id, "src");
                assert!(accepted);
            }
            other => panic!("expected ConfirmDecision, got {other:?}"),
        }
        assert!(!app.gate.is_open());
    }

    #[tokio::test]
    async fn overlapping_delete_requests_keep_the_first_gate() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = setup_app();
        let src = app.model.find("src").unwrap().to_ref();
        let assets = app.model.find("assets").unwrap().to_ref();
        app.dispatch_action(ActionId::Delete, src, &tx);
        app.dispatch_action(ActionId::Delete, assets, &tx);
        // The second request was rejected; the first is still shown.
        assert_eq!(app.gate.title(), "Delete src?");
    }

    #[test]
    fn update_scroll_follows_selection() {
        let mut app = setup_app();
        app.view.toggle_expansion("src");
        let rows = app.rows();
        let last = rows.last().unwrap().clone();
        app.select_row(&last);
        app.update_scroll(&rows, 2);
        assert_eq!(app.scroll_offset, rows.len() - 2);

        let first = rows.first().unwrap().clone();
        app.select_row(&first);
        let rows = app.rows();
        app.update_scroll(&rows, 2);
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn quit_sets_flags() {
        let mut app = setup_app();
        app.quit();
        assert!(app.should_quit);
        assert!(app.torn_down);
    }
}
