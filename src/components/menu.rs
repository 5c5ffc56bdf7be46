use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::explorer::menu::{ContextMenu, MenuEntry};
use crate::theme::ThemeColors;

/// Context-menu overlay, anchored at the position captured when the menu
/// opened. The menu clips at the screen edge rather than repositioning.
pub struct ContextMenuWidget<'a> {
    menu: &'a ContextMenu,
    theme: &'a ThemeColors,
}

impl<'a> ContextMenuWidget<'a> {
    pub fn new(menu: &'a ContextMenu, theme: &'a ThemeColors) -> Self {
        Self { menu, theme }
    }
}

impl<'a> Widget for ContextMenuWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(bounds) = self.menu.bounds() else {
            return;
        };
        let rect = bounds.intersection(area);
        if rect.width < 3 || rect.height < 3 {
            return;
        }

        Clear.render(rect, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.menu_border_fg))
            .style(Style::default().bg(self.theme.menu_bg));
        let inner = block.inner(rect);
        block.render(rect, buf);

        for (i, entry) in self.menu.entries().iter().enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.bottom() {
                break;
            }

            let line = match entry {
                MenuEntry::Divider => Line::from(Span::styled(
                    "─".repeat(inner.width as usize),
                    Style::default().fg(self.theme.menu_divider_fg),
                )),
                MenuEntry::Action {
                    label,
                    shortcut,
                    enabled,
                    ..
                } => {
                    let is_highlighted = i == self.menu.highlight();
                    let label_style = if !enabled {
                        Style::default().fg(self.theme.dim_fg)
                    } else if is_highlighted {
                        Style::default()
                            .bg(self.theme.menu_highlight_bg)
                            .fg(self.theme.menu_highlight_fg)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(self.theme.menu_fg)
                    };

                    let width = inner.width as usize;
                    let shortcut = shortcut.unwrap_or("");
                    // Label padded left, shortcut right-aligned.
                    let pad = width
                        .saturating_sub(1 + label.len() + shortcut.len())
                        .max(1);
                    let text = format!(" {label}{}{shortcut}", " ".repeat(pad));

                    let mut line = Line::from(Span::styled(text, label_style));
                    if !shortcut.is_empty() && !is_highlighted {
                        // Re-style the shortcut column.
                        line = Line::from(vec![
                            Span::styled(
                                format!(" {label}{}", " ".repeat(pad)),
                                label_style,
                            ),
                            Span::styled(
                                shortcut.to_string(),
                                Style::default().fg(self.theme.menu_shortcut_fg),
                            ),
                        ]);
                    }
                    line
                }
            };
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
