//! String helpers shared by the extractor, synthesizer and reports
//!
//! All truncation is UTF-8 safe: slicing only ever happens on a char boundary.

/// Safely truncate a string at a UTF-8 char boundary.
///
/// # Examples
/// ```
/// use testwright::utils::truncate_to_char_boundary;
///
/// assert_eq!(truncate_to_char_boundary("hello world", 5), "hello");
/// let s = "abc੨def"; // '੨' spans bytes 3-5
/// assert_eq!(truncate_to_char_boundary(s, 4), "abc");
/// ```
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Truncate and append "..." when anything was cut
pub fn truncate_with_ellipsis(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        s.to_string()
    } else {
        format!("{}...", truncate_to_char_boundary(s, max_bytes))
    }
}

/// Python `str.capitalize()`: first char uppercased, the rest lowercased
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Normalize docstring text the way `inspect.cleandoc` does.
///
/// The first line is stripped of leading whitespace, the remaining lines are
/// dedented by their common indentation, and blank lines at either end are
/// dropped.
pub fn clean_docstring(raw: &str) -> String {
    let expanded = raw.replace('\t', "        ");
    let mut lines: Vec<&str> = expanded.lines().collect();
    if lines.is_empty() {
        return String::new();
    }

    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    cleaned.push(lines.remove(0).trim().to_string());
    for line in lines {
        let stripped = line.get(margin..).unwrap_or_else(|| line.trim_start());
        cleaned.push(stripped.trim_end().to_string());
    }

    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii_cut() {
        assert_eq!(truncate_to_char_boundary("hello world", 5), "hello");
        assert_eq!(truncate_to_char_boundary("hello", 100), "hello");
    }

    #[test]
    fn test_truncate_utf8_multibyte() {
        let s = "ab𐍈cd";
        assert_eq!(truncate_to_char_boundary(s, 3), "ab");
        assert_eq!(truncate_to_char_boundary(s, 6), "ab𐍈");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello", 100), "hello");
        assert_eq!(truncate_with_ellipsis("abc੨def", 4), "abc...");
    }

    #[test]
    fn test_capitalize_matches_python() {
        assert_eq!(capitalize("parse_HTML"), "Parse_html");
        assert_eq!(capitalize("add"), "Add");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_clean_docstring_dedents() {
        let raw = "\n    Check the totals.\n\n    Second paragraph.\n    ";
        assert_eq!(clean_docstring(raw), "Check the totals.\n\nSecond paragraph.");
    }

    #[test]
    fn test_clean_docstring_blank() {
        assert_eq!(clean_docstring("   \n   "), "");
    }
}
