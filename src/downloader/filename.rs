// Filesystem-safe filename derivation

use regex::Regex;

/// Base name used when the media has no title
pub const FALLBACK_BASE: &str = "media_file";

const MAX_BASE_CHARS: usize = 100;

lazy_static::lazy_static! {
    static ref FORBIDDEN_RE: Regex = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Turn a title and extension into a filename.
///
/// A missing or empty title falls back to `media_file`.
/// Forbidden characters become `_`, whitespace runs collapse to one `_`, the
/// base is cut to 100 characters. `ext` wins over `default_ext` unless it
/// is missing or blank. Other unicode passes through unchanged.
pub fn derive_filename(base_title: Option<&str>, ext: Option<&str>, default_ext: &str) -> String {
    let base = base_title.filter(|t| !t.is_empty()).unwrap_or(FALLBACK_BASE);
    let replaced = FORBIDDEN_RE.replace_all(base, "_");
    let collapsed = WHITESPACE_RE.replace_all(&replaced, "_");
    let truncated: String = collapsed.chars().take(MAX_BASE_CHARS).collect();

    let extension = ext
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(default_ext);

    format!("{}.{}", truncated, extension)
}
