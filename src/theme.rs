//! Theme data model: built-in palettes and resolution from config.
//!
//! The theme system provides two built-in palettes (dark and light) and
//! supports custom color overrides from the config file. The resolved
//! tokens are passed into widgets at construction, never read from a
//! global.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
///
/// Constructed from a config-level `ThemeConfig` via `resolve_theme()`.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panel
    pub tree_bg: Color,
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub tree_dir_fg: Color,
    pub tree_file_fg: Color,
    pub tree_placeholder_fg: Color,
    pub tree_root_path_fg: Color,

    // Context menu
    pub menu_bg: Color,
    pub menu_fg: Color,
    pub menu_border_fg: Color,
    pub menu_highlight_bg: Color,
    pub menu_highlight_fg: Color,
    pub menu_shortcut_fg: Color,
    pub menu_divider_fg: Color,

    // Borders & chrome
    pub border_fg: Color,

    // Dialogs
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    // Semantic colors (not configurable, consistent across themes)
    pub error_fg: Color,
    pub warning_fg: Color,
    pub info_fg: Color,
    pub dim_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        // Tree panel — dark base
        tree_bg: Color::Reset,
        tree_fg: Color::Rgb(205, 214, 244),       // #cdd6f4 (text)
        tree_selected_bg: Color::Rgb(69, 71, 90), // #45475a (surface1)
        tree_selected_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        tree_dir_fg: Color::Rgb(137, 180, 250),   // #89b4fa (blue)
        tree_file_fg: Color::Rgb(205, 214, 244),  // #cdd6f4
        tree_placeholder_fg: Color::Rgb(108, 112, 134), // #6c7086 (overlay0)
        tree_root_path_fg: Color::Rgb(108, 112, 134), // #6c7086

        // Context menu
        menu_bg: Color::Rgb(49, 50, 68),          // #313244 (surface0)
        menu_fg: Color::Rgb(205, 214, 244),       // #cdd6f4
        menu_border_fg: Color::Rgb(88, 91, 112),  // #585b70 (surface2)
        menu_highlight_bg: Color::Rgb(69, 71, 90), // #45475a (surface1)
        menu_highlight_fg: Color::Rgb(205, 214, 244),
        menu_shortcut_fg: Color::Rgb(108, 112, 134), // #6c7086
        menu_divider_fg: Color::Rgb(88, 91, 112), // #585b70

        // Borders
        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)

        // Dialogs
        dialog_bg: Color::Rgb(49, 50, 68), // #313244 (surface0)
        dialog_border_fg: Color::Rgb(137, 180, 250),

        // Semantic
        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        info_fg: Color::Rgb(137, 180, 250),    // #89b4fa (blue)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086
    }
}

/// Light theme — complementary light palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        // Tree panel — light base
        tree_bg: Color::Reset,
        tree_fg: Color::Rgb(76, 79, 105), // #4c4f69 (text)
        tree_selected_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        tree_selected_fg: Color::Rgb(76, 79, 105),
        tree_dir_fg: Color::Rgb(30, 102, 245), // #1e66f5 (blue)
        tree_file_fg: Color::Rgb(76, 79, 105),
        tree_placeholder_fg: Color::Rgb(156, 160, 176), // #9ca0b0 (overlay0)
        tree_root_path_fg: Color::Rgb(156, 160, 176),

        // Context menu
        menu_bg: Color::Rgb(230, 233, 239), // #e6e9ef (surface0)
        menu_fg: Color::Rgb(76, 79, 105),
        menu_border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        menu_highlight_bg: Color::Rgb(204, 208, 218),
        menu_highlight_fg: Color::Rgb(76, 79, 105),
        menu_shortcut_fg: Color::Rgb(156, 160, 176),
        menu_divider_fg: Color::Rgb(172, 176, 190),

        // Borders
        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)

        // Dialogs
        dialog_bg: Color::Rgb(230, 233, 239), // #e6e9ef (surface0)
        dialog_border_fg: Color::Rgb(30, 102, 245),

        // Semantic
        error_fg: Color::Rgb(210, 15, 57),    // #d20f39 (red)
        warning_fg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
        info_fg: Color::Rgb(30, 102, 245),
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Parse a hex color string, falling back to the provided default on error.
fn parse_or(hex_opt: Option<&str>, fallback: Color) -> Color {
    hex_opt.and_then(parse_hex_color).unwrap_or(fallback)
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default): dark Catppuccin palette
/// - `"light"`: light Catppuccin palette
/// - `"custom"`: start from dark palette, then override with custom hex values
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    let scheme = config.scheme.as_deref().unwrap_or("dark");
    match scheme {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(), // "dark" or any unrecognized value
    }
}

/// Apply custom hex color overrides on top of an existing theme.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    if let Some(ref c) = custom.tree_bg {
        theme.tree_bg = parse_or(Some(c), theme.tree_bg);
    }
    if let Some(ref c) = custom.tree_fg {
        theme.tree_fg = parse_or(Some(c), theme.tree_fg);
    }
    if let Some(ref c) = custom.tree_selected_bg {
        theme.tree_selected_bg = parse_or(Some(c), theme.tree_selected_bg);
    }
    if let Some(ref c) = custom.tree_selected_fg {
        theme.tree_selected_fg = parse_or(Some(c), theme.tree_selected_fg);
    }
    if let Some(ref c) = custom.tree_dir_fg {
        theme.tree_dir_fg = parse_or(Some(c), theme.tree_dir_fg);
    }
    if let Some(ref c) = custom.tree_file_fg {
        theme.tree_file_fg = parse_or(Some(c), theme.tree_file_fg);
    }
    if let Some(ref c) = custom.tree_placeholder_fg {
        theme.tree_placeholder_fg = parse_or(Some(c), theme.tree_placeholder_fg);
    }
    if let Some(ref c) = custom.menu_bg {
        theme.menu_bg = parse_or(Some(c), theme.menu_bg);
    }
    if let Some(ref c) = custom.menu_fg {
        theme.menu_fg = parse_or(Some(c), theme.menu_fg);
    }
    if let Some(ref c) = custom.menu_border_fg {
        theme.menu_border_fg = parse_or(Some(c), theme.menu_border_fg);
    }
    if let Some(ref c) = custom.menu_highlight_bg {
        theme.menu_highlight_bg = parse_or(Some(c), theme.menu_highlight_bg);
    }
    if let Some(ref c) = custom.border_fg {
        theme.border_fg = parse_or(Some(c), theme.border_fg);
    }
    if let Some(ref c) = custom.dialog_bg {
        theme.dialog_bg = parse_or(Some(c), theme.dialog_bg);
    }
    if let Some(ref c) = custom.dialog_border_fg {
        theme.dialog_border_fg = parse_or(Some(c), theme.dialog_border_fg);
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color_valid() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#00ff00"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_hex_color("#0000ff"), Some(Color::Rgb(0, 0, 255)));
        assert_eq!(parse_hex_color("#1a1b26"), Some(Color::Rgb(26, 27, 38)));
    }

    #[test]
    fn test_parse_hex_color_without_hash() {
        assert_eq!(parse_hex_color("ff0000"), Some(Color::Rgb(255, 0, 0)));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None); // too short
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#"), None);
    }

    #[test]
    fn test_resolve_dark_theme() {
        let config = ThemeConfig {
            scheme: Some("dark".to_string()),
            custom: None,
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.tree_dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_resolve_light_theme() {
        let config = ThemeConfig {
            scheme: Some("light".to_string()),
            custom: None,
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.tree_dir_fg, Color::Rgb(30, 102, 245));
    }

    #[test]
    fn test_resolve_default_is_dark() {
        let config = ThemeConfig::default();
        let theme = resolve_theme(&config);
        assert_eq!(theme.tree_dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_resolve_custom_overrides() {
        let config = ThemeConfig {
            scheme: Some("custom".to_string()),
            custom: Some(ThemeColorsConfig {
                tree_bg: Some("#1a1b26".to_string()),
                tree_fg: Some("#c0caf5".to_string()),
                ..Default::default()
            }),
        };
        let theme = resolve_theme(&config);
        // Custom values applied
        assert_eq!(theme.tree_bg, Color::Rgb(26, 27, 38));
        assert_eq!(theme.tree_fg, Color::Rgb(192, 202, 245));
        // Non-custom values fall back to dark theme
        assert_eq!(theme.tree_dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_custom_with_invalid_hex_falls_back() {
        let config = ThemeConfig {
            scheme: Some("custom".to_string()),
            custom: Some(ThemeColorsConfig {
                tree_bg: Some("#zzzzzz".to_string()),
                ..Default::default()
            }),
        };
        let theme = resolve_theme(&config);
        // Invalid hex keeps the dark theme default (Color::Reset for tree_bg)
        assert_eq!(theme.tree_bg, Color::Reset);
    }

    #[test]
    fn test_unknown_scheme_falls_back_to_dark() {
        let config = ThemeConfig {
            scheme: Some("neon".to_string()),
            custom: None,
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.tree_dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_dark_and_light_different() {
        let dark = dark_theme();
        let light = light_theme();
        // Key colors should differ between themes
        assert_ne!(dark.tree_fg, light.tree_fg);
        assert_ne!(dark.tree_selected_bg, light.tree_selected_bg);
        assert_ne!(dark.tree_dir_fg, light.tree_dir_fg);
        assert_ne!(dark.error_fg, light.error_fg);
    }
}
