use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::explorer::rows::{row_appearance, Row};
use crate::theme::ThemeColors;

/// Hint shown on the selected directory row when its toolbar is visible.
const TOOLBAR_HINT: &str = "n N r c d";

/// Tree widget that renders the derived display rows.
pub struct TreeWidget<'a> {
    rows: &'a [Row],
    selected_id: Option<&'a str>,
    /// Absolute path shown dimmed after the root's label.
    root_path: Option<&'a str>,
    scroll_offset: usize,
    theme: &'a ThemeColors,
    use_icons: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(
        rows: &'a [Row],
        selected_id: Option<&'a str>,
        root_path: Option<&'a str>,
        scroll_offset: usize,
        theme: &'a ThemeColors,
        use_icons: bool,
    ) -> Self {
        Self {
            rows,
            selected_id,
            root_path,
            scroll_offset,
            theme,
            use_icons,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if self.rows.is_empty() || visible_height == 0 {
            return;
        }

        let visible_rows = self
            .rows
            .iter()
            .skip(self.scroll_offset)
            .take(visible_height);

        for (i, row) in visible_rows.enumerate() {
            let y = inner_area.y + i as u16;
            let is_selected = self.selected_id == Some(row.id.as_str());
            let look = row_appearance(row, is_selected, self.use_icons);

            let style = if is_selected {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if row.is_placeholder {
                Style::default()
                    .fg(self.theme.tree_placeholder_fg)
                    .add_modifier(Modifier::ITALIC)
            } else if row.is_directory {
                Style::default()
                    .fg(self.theme.tree_dir_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.tree_file_fg)
            };

            let indent = "  ".repeat(row.depth);
            let chevron = if look.chevron_visible {
                if row.is_expanded {
                    "▾ "
                } else {
                    "▸ "
                }
            } else {
                "  "
            };

            let mut spans = vec![Span::styled(
                format!("{indent}{chevron}{}{}", look.icon, look.label),
                style,
            )];

            // The root row shows the project's absolute path, dimmed.
            if row.depth == 0 {
                if let Some(path) = self.root_path {
                    spans.push(Span::styled(
                        format!("  {path}"),
                        Style::default().fg(self.theme.tree_root_path_fg),
                    ));
                }
            }

            if look.toolbar_visible {
                spans.push(Span::styled(
                    format!("  [{TOOLBAR_HINT}]"),
                    Style::default().fg(self.theme.dim_fg),
                ));
            }

            let line = Line::from(spans);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
