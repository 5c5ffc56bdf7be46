use ratatui::{
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::dialog::ConfirmDialogWidget;
use crate::components::menu::ContextMenuWidget;
use crate::components::tree::TreeWidget;
use crate::explorer::source::ProjectSource;

/// Render the explorer panel and its overlays.
pub fn render<S: ProjectSource>(app: &mut App<S>, frame: &mut Frame) {
    let area = frame.area();

    let rows = app.rows();
    // Keep the selected row visible; account for the border.
    let visible_height = area.height.saturating_sub(2) as usize;
    app.update_scroll(&rows, visible_height);

    let title = if app.ready { " Explorer " } else { " Explorer (loading…) " };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));

    let tree = TreeWidget::new(
        &rows,
        app.view.selected_id(),
        app.model.root().dir_path.as_deref(),
        app.scroll_offset,
        &app.theme,
        app.use_icons,
    )
    .block(block);
    frame.render_widget(tree, area);

    if app.menu.is_open() {
        frame.render_widget(ContextMenuWidget::new(&app.menu, &app.theme), area);
    }

    if app.gate.is_open() {
        frame.render_widget(ConfirmDialogWidget::new(&app.gate, &app.theme), area);
    }
}
