use once_cell::sync::Lazy;
use regex::Regex;

static DENYLIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[&/\\#,+()$~%.'":*?<>{}]"#).expect("DENYLIST is a valid regex pattern")
});

/// Turns a free-text search term into a literal, case-insensitive title
/// pattern. Denylisted characters are dropped, anything else that regex
/// would interpret is escaped. Returns `None` when nothing is left to match.
pub fn title_pattern(term: &str) -> Option<String> {
    let stripped = DENYLIST.replace_all(term, "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(regex::escape(trimmed))
}
