use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::App;
use crate::components::dialog::confirm_dialog_rect;
use crate::event::Event;
use crate::explorer::actions::ActionId;
use crate::explorer::rows::Row;
use crate::explorer::source::ProjectSource;

/// Handle a key event.
///
/// The confirm dialog captures all keys while open; the context menu is
/// next; everything else drives the tree.
pub fn handle_key_event<S: ProjectSource>(
    app: &mut App<S>,
    key: KeyEvent,
    tx: &UnboundedSender<Event>,
) {
    if app.gate.is_open() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.gate.resolve(true),
            KeyCode::Char('n') | KeyCode::Esc => app.gate.resolve(false),
            _ => {}
        }
        return;
    }

    if app.menu.is_open() {
        match key.code {
            KeyCode::Esc => app.menu.close(),
            KeyCode::Down | KeyCode::Char('j') => app.menu.highlight_next(),
            KeyCode::Up | KeyCode::Char('k') => app.menu.highlight_previous(),
            KeyCode::Enter => {
                if let Some((action, target)) = app.menu.activate_highlighted() {
                    app.dispatch_action(action, target, tx);
                }
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char('q') => app.quit(),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected_expansion(),
        KeyCode::Char('r') => dispatch_shortcut(app, ActionId::Refresh, tx),
        KeyCode::Char('c') => dispatch_shortcut(app, ActionId::Collapse, tx),
        KeyCode::Char('n') => dispatch_shortcut(app, ActionId::NewFile, tx),
        KeyCode::Char('N') => dispatch_shortcut(app, ActionId::NewFolder, tx),
        KeyCode::Char('d') => dispatch_shortcut(app, ActionId::Delete, tx),
        _ => {}
    }
}

/// Dispatch a toolbar shortcut against the selected node, or the root when
/// nothing is selected.
fn dispatch_shortcut<S: ProjectSource>(
    app: &mut App<S>,
    action: ActionId,
    tx: &UnboundedSender<Event>,
) {
    let target = app
        .view
        .selected_id()
        .and_then(|id| app.model.find(id))
        .map(|node| node.to_ref())
        .unwrap_or_else(|| app.model.root().to_ref());
    app.dispatch_action(action, target, tx);
}

/// Handle a mouse event. `area` is the full frame the panel was drawn in.
pub fn handle_mouse_event<S: ProjectSource>(
    app: &mut App<S>,
    mouse: MouseEvent,
    area: Rect,
    tx: &UnboundedSender<Event>,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            handle_primary_down(app, mouse.column, mouse.row, area, tx);
        }
        MouseEventKind::Down(MouseButton::Right) => {
            handle_secondary_down(app, mouse.column, mouse.row, area);
        }
        MouseEventKind::ScrollDown => app.move_cursor(1),
        MouseEventKind::ScrollUp => app.move_cursor(-1),
        _ => {}
    }
}

fn handle_primary_down<S: ProjectSource>(
    app: &mut App<S>,
    x: u16,
    y: u16,
    area: Rect,
    tx: &UnboundedSender<Event>,
) {
    if app.gate.is_open() {
        // A primary click outside the dialog is a dismissal.
        let rect = confirm_dialog_rect(&app.gate, area);
        if !rect.contains(Position::new(x, y)) {
            app.gate.resolve(false);
        }
        return;
    }

    if app.menu.is_open() {
        if let Some(index) = app.menu.hit_test(x, y) {
            if let Some((action, target)) = app.menu.activate(index) {
                app.dispatch_action(action, target, tx);
            }
        } else if !app.menu.contains(x, y) {
            app.menu.close();
        }
        return;
    }

    if let Some(row) = row_at(app, y, area) {
        if row.is_placeholder {
            return;
        }
        app.select_row(&row);
        if row.is_directory {
            app.view.toggle_expansion(&row.id);
        }
    }
}

fn handle_secondary_down<S: ProjectSource>(app: &mut App<S>, x: u16, y: u16, area: Rect) {
    if app.gate.is_open() {
        return;
    }
    if let Some(row) = row_at(app, y, area) {
        if row.is_directory && !row.is_placeholder {
            // open() closes any existing menu first, so at most one menu
            // is ever visible.
            app.open_menu_for_row(x, y, &row);
            return;
        }
    }
    app.menu.close();
}

/// Map a viewport y coordinate to the display row under it, accounting for
/// the panel border and the scroll offset.
fn row_at<S: ProjectSource>(app: &App<S>, y: u16, area: Rect) -> Option<Row> {
    let top = area.y + 1;
    let bottom = area.bottom().saturating_sub(1);
    if y < top || y >= bottom {
        return None;
    }
    let index = app.scroll_offset + (y - top) as usize;
    app.rows().get(index).cloned()
}
