use ratatui::layout::Rect;

use crate::explorer::actions::ActionId;
use crate::explorer::model::NodeRef;

/// One entry of the context menu's item table.
///
/// The table is injected at construction so independent panel instances
/// share no mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Action {
        id: ActionId,
        label: &'static str,
        shortcut: Option<&'static str>,
        enabled: bool,
    },
    Divider,
}

impl MenuEntry {
    pub fn action(id: ActionId, label: &'static str, shortcut: Option<&'static str>) -> Self {
        MenuEntry::Action {
            id,
            label,
            shortcut,
            enabled: true,
        }
    }

    /// True when activating this entry dispatches an action.
    pub fn is_actionable(&self) -> bool {
        matches!(self, MenuEntry::Action { enabled: true, .. })
    }
}

/// The default item table for directory rows.
pub fn directory_menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry::action(ActionId::NewFile, "New File", Some("n")),
        MenuEntry::action(ActionId::NewFolder, "New Folder", Some("N")),
        MenuEntry::Divider,
        MenuEntry::action(ActionId::Refresh, "Refresh", Some("r")),
        MenuEntry::action(ActionId::Collapse, "Collapse All", Some("c")),
        MenuEntry::Divider,
        MenuEntry::action(ActionId::Cut, "Cut", None),
        MenuEntry::action(ActionId::Copy, "Copy", None),
        MenuEntry::action(ActionId::Paste, "Paste", None),
        MenuEntry::Divider,
        MenuEntry::action(ActionId::Rename, "Rename", None),
        MenuEntry::action(ActionId::Delete, "Delete", Some("d")),
        MenuEntry::Divider,
        MenuEntry::action(ActionId::Close, "Close Menu", Some("Esc")),
    ]
}

/// Whether the menu is visible, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Open {
        /// Viewport coordinates captured at open time. The menu stays
        /// anchored here even if the panel scrolls underneath it.
        x: u16,
        y: u16,
        target: NodeRef,
    },
}

/// Context-menu state machine: `Closed` or `Open(position, target)`.
///
/// At most one menu is ever visible — opening over an open menu closes the
/// existing one first.
#[derive(Debug)]
pub struct ContextMenu {
    entries: Vec<MenuEntry>,
    state: MenuState,
    /// Index into `entries` of the highlighted item; always actionable
    /// while the menu is open.
    highlight: usize,
}

impl ContextMenu {
    pub fn new(entries: Vec<MenuEntry>) -> Self {
        Self {
            entries,
            state: MenuState::Closed,
            highlight: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, MenuState::Open { .. })
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    pub fn target(&self) -> Option<&NodeRef> {
        match &self.state {
            MenuState::Open { target, .. } => Some(target),
            MenuState::Closed => None,
        }
    }

    pub fn position(&self) -> Option<(u16, u16)> {
        match &self.state {
            MenuState::Open { x, y, .. } => Some((*x, *y)),
            MenuState::Closed => None,
        }
    }

    /// Open the menu at the given viewport position, targeting `target`.
    /// An already-open menu is closed first.
    pub fn open(&mut self, x: u16, y: u16, target: NodeRef) {
        self.close();
        self.highlight = self.first_actionable().unwrap_or(0);
        self.state = MenuState::Open { x, y, target };
    }

    pub fn close(&mut self) {
        self.state = MenuState::Closed;
    }

    /// Move the highlight down to the next actionable entry, wrapping.
    pub fn highlight_next(&mut self) {
        self.step_highlight(1);
    }

    /// Move the highlight up to the previous actionable entry, wrapping.
    pub fn highlight_previous(&mut self) {
        self.step_highlight(-1);
    }

    fn step_highlight(&mut self, dir: isize) {
        if !self.is_open() || self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as isize;
        let mut idx = self.highlight as isize;
        for _ in 0..len {
            idx = (idx + dir).rem_euclid(len);
            if self.entries[idx as usize].is_actionable() {
                self.highlight = idx as usize;
                return;
            }
        }
    }

    fn first_actionable(&self) -> Option<usize> {
        self.entries.iter().position(MenuEntry::is_actionable)
    }

    /// Activate the entry at `index`.
    ///
    /// An actionable entry yields `(ActionId, target)` and unconditionally
    /// closes the menu. Dividers and disabled entries dispatch nothing and
    /// leave the menu open.
    pub fn activate(&mut self, index: usize) -> Option<(ActionId, NodeRef)> {
        let target = self.target()?.clone();
        match self.entries.get(index) {
            Some(MenuEntry::Action {
                id, enabled: true, ..
            }) => {
                let id = *id;
                self.close();
                Some((id, target))
            }
            _ => None,
        }
    }

    /// Activate the highlighted entry.
    pub fn activate_highlighted(&mut self) -> Option<(ActionId, NodeRef)> {
        self.activate(self.highlight)
    }

    /// The rectangle the open menu occupies, in viewport coordinates.
    ///
    /// Geometry is shared by the widget and by mouse hit-testing. The menu
    /// is anchored at its captured position and simply clips at the screen
    /// edge — it is never repositioned after open.
    pub fn bounds(&self) -> Option<Rect> {
        let (x, y) = self.position()?;
        let inner_width = self
            .entries
            .iter()
            .map(|entry| match entry {
                MenuEntry::Action {
                    label, shortcut, ..
                } => label.len() + shortcut.map_or(0, |s| s.len() + 2),
                MenuEntry::Divider => 0,
            })
            .max()
            .unwrap_or(0)
            .max(12) as u16;
        // One cell of horizontal padding on each side, plus the borders.
        let width = inner_width + 4;
        let height = self.entries.len() as u16 + 2;
        Some(Rect::new(x, y, width, height))
    }

    /// True when the point lies inside the open menu's bounds.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.bounds()
            .is_some_and(|rect| rect.contains(ratatui::layout::Position::new(x, y)))
    }

    /// Map a click position to an entry index, if it lands on one.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<usize> {
        let rect = self.bounds()?;
        if x <= rect.x || x >= rect.right().saturating_sub(1) {
            return None;
        }
        if y <= rect.y || y >= rect.bottom().saturating_sub(1) {
            return None;
        }
        let index = (y - rect.y - 1) as usize;
        (index < self.entries.len()).then_some(index)
    }
}

impl Default for ContextMenu {
    fn default() -> Self {
        Self::new(directory_menu())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: &str) -> NodeRef {
        NodeRef {
            id: id.to_string(),
            name: id.to_string(),
        }
    }

    #[test]
    fn starts_closed() {
        let menu = ContextMenu::default();
        assert!(!menu.is_open());
        assert!(menu.target().is_none());
        assert!(menu.bounds().is_none());
    }

    #[test]
    fn open_captures_position_and_target() {
        let mut menu = ContextMenu::default();
        menu.open(120, 80, target("src"));
        assert!(menu.is_open());
        assert_eq!(menu.position(), Some((120, 80)));
        assert_eq!(menu.target().unwrap().id, "src");
    }

    #[test]
    fn escape_closes_and_clears_target() {
        let mut menu = ContextMenu::default();
        menu.open(120, 80, target("src"));
        menu.close();
        assert!(!menu.is_open());
        assert!(menu.target().is_none());
    }

    #[test]
    fn open_over_open_leaves_one_menu_at_new_position() {
        let mut menu = ContextMenu::default();
        menu.open(120, 80, target("src"));
        menu.open(40, 12, target("assets"));
        assert!(menu.is_open());
        assert_eq!(menu.position(), Some((40, 12)));
        assert_eq!(menu.target().unwrap().id, "assets");
    }

    #[test]
    fn activating_an_action_dispatches_and_closes() {
        let mut menu = ContextMenu::default();
        menu.open(10, 10, target("src"));
        let idx = menu
            .entries()
            .iter()
            .position(|e| matches!(e, MenuEntry::Action { id: ActionId::Refresh, .. }))
            .unwrap();
        let (action, node) = menu.activate(idx).unwrap();
        assert_eq!(action, ActionId::Refresh);
        assert_eq!(node.id, "src");
        assert!(!menu.is_open());
    }

    #[test]
    fn dividers_never_dispatch() {
        let mut menu = ContextMenu::default();
        menu.open(10, 10, target("src"));
        let idx = menu
            .entries()
            .iter()
            .position(|e| matches!(e, MenuEntry::Divider))
            .unwrap();
        assert!(menu.activate(idx).is_none());
        // A non-action click leaves the menu open.
        assert!(menu.is_open());
    }

    #[test]
    fn disabled_entries_never_dispatch() {
        let mut menu = ContextMenu::new(vec![MenuEntry::Action {
            id: ActionId::Paste,
            label: "Paste",
            shortcut: None,
            enabled: false,
        }]);
        menu.open(10, 10, target("src"));
        assert!(menu.activate(0).is_none());
        assert!(menu.is_open());
    }

    #[test]
    fn activate_when_closed_is_none() {
        let mut menu = ContextMenu::default();
        assert!(menu.activate(0).is_none());
    }

    #[test]
    fn highlight_skips_dividers_and_wraps() {
        let mut menu = ContextMenu::new(vec![
            MenuEntry::action(ActionId::NewFile, "New File", None),
            MenuEntry::Divider,
            MenuEntry::action(ActionId::Delete, "Delete", None),
        ]);
        menu.open(0, 0, target("src"));
        assert_eq!(menu.highlight(), 0);
        menu.highlight_next();
        assert_eq!(menu.highlight(), 2);
        menu.highlight_next();
        assert_eq!(menu.highlight(), 0);
        menu.highlight_previous();
        assert_eq!(menu.highlight(), 2);
    }

    #[test]
    fn hit_test_maps_rows_inside_the_border() {
        let mut menu = ContextMenu::new(vec![
            MenuEntry::action(ActionId::NewFile, "New File", None),
            MenuEntry::action(ActionId::Delete, "Delete", None),
        ]);
        menu.open(10, 5, target("src"));
        // First row of the interior is one cell below the top border.
        assert_eq!(menu.hit_test(12, 6), Some(0));
        assert_eq!(menu.hit_test(12, 7), Some(1));
        // The border itself and the outside are misses.
        assert_eq!(menu.hit_test(10, 5), None);
        assert_eq!(menu.hit_test(0, 0), None);
        assert!(!menu.contains(0, 0));
        assert!(menu.contains(10, 5));
    }
}
