//! Extension-to-glyph mapping for file rows.

/// Get a Nerd Font icon for a file based on its extension.
pub fn glyph_for(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "rs" => " ",
        "py" => " ",
        "js" | "jsx" => " ",
        "ts" | "tsx" => " ",
        "html" | "htm" => " ",
        "css" | "scss" | "sass" => " ",
        "json" => " ",
        "toml" | "yaml" | "yml" | "ini" | "cfg" => " ",
        "md" | "markdown" | "rst" | "txt" => " ",
        "sh" | "bash" | "zsh" | "fish" => " ",
        "go" => " ",
        "c" | "h" => " ",
        "cpp" | "cxx" | "cc" | "hpp" => " ",
        "lock" => " ",
        "gitignore" | "gitmodules" | "gitattributes" => " ",
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "svg" | "ico" | "webp" => " ",
        "zip" | "tar" | "gz" | "xz" | "bz2" | "rar" | "7z" => " ",
        "pdf" => " ",
        _ => " ",
    }
}
