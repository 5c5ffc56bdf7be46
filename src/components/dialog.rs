use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::explorer::confirm::ConfirmGate;
use crate::theme::ThemeColors;

/// The rectangle the confirm dialog occupies, centered in `area`.
///
/// Shared by the widget and by mouse hit-testing (a primary click outside
/// this rectangle dismisses the dialog).
pub fn confirm_dialog_rect(gate: &ConfirmGate, area: Rect) -> Rect {
    let width = (gate.message().len() as u16 + 6)
        .max(gate.title().len() as u16 + 6)
        .max(40)
        .min(area.width.saturating_sub(4));
    let height = 6;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Confirm-dialog overlay rendered from the gate's pending request.
pub struct ConfirmDialogWidget<'a> {
    gate: &'a ConfirmGate,
    theme: &'a ThemeColors,
}

impl<'a> ConfirmDialogWidget<'a> {
    pub fn new(gate: &'a ConfirmGate, theme: &'a ThemeColors) -> Self {
        Self { gate, theme }
    }
}

impl<'a> Widget for ConfirmDialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.gate.is_open() {
            return;
        }

        let rect = confirm_dialog_rect(self.gate, area);
        Clear.render(rect, buf);

        let block = Block::default()
            .title(format!(" {} ", self.gate.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.error_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));

        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let msg_line = Line::from(Span::styled(
            self.gate.message().to_string(),
            Style::default()
                .fg(self.theme.warning_fg)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(inner.x, inner.y + 1, &msg_line, inner.width);

        let hint = "[y/Enter] Confirm  [n/Esc] Cancel";
        let hint_line = Line::from(Span::styled(
            hint,
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM),
        ));
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}
