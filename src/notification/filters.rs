use std::sync::LazyLock;

use unicode_segmentation::UnicodeSegmentation;

static AMMONIA: LazyLock<ammonia::Builder> = LazyLock::new(|| ammonia::Builder::empty());

/// Strip HTML tags from a string
pub(crate) fn to_text(value: &str) -> String {
    // The cleaner hands back serialized HTML; undo its text escaping so
    // renderers are free to escape once.
    AMMONIA
        .clean(value)
        .to_string()
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Shorten a string to at most `limit` graphemes, including `omission`.
/// Cuts at a word boundary when one fits, otherwise mid-word. Whitespace runs
/// collapse to a single space first.
///
/// # Examples
///
/// ```text
/// assert_eq!(summarize("Lorem ipsum dolor sit amet", 14, "..."), "Lorem ipsum...");
/// assert_eq!(summarize("Lorem ipsum", 50, "..."), "Lorem ipsum");
/// ```
pub(crate) fn summarize(value: &str, limit: usize, omission: &str) -> String {
    let text = to_text(value)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.graphemes(true).count() <= limit {
        return text;
    }

    let omission_len = omission.graphemes(true).count();
    if omission_len >= limit {
        return text.graphemes(true).take(limit).collect();
    }
    let budget = limit - omission_len;
    let mut used = 0;
    let mut result = String::new();
    for word in text.split_word_bounds() {
        let len = word.graphemes(true).count();
        if used + len > budget {
            break;
        }
        result.push_str(word);
        used += len;
    }
    if result.trim().is_empty() {
        result = text.graphemes(true).take(budget).collect();
    }

    let mut result = result.trim_end().to_string();
    result.push_str(omission);
    result
}

/// Lowercase, ASCII-dash separated form of a title for use in paths.
pub(crate) fn slugify(value: &str) -> String {
    let mut slug = String::new();
    let mut separate = false;
    for c in value.chars() {
        if c.is_alphanumeric() {
            if separate && !slug.is_empty() {
                slug.push('-');
            }
            separate = false;
            slug.extend(c.to_lowercase());
        } else if c != '\'' && c != '\u{2019}' {
            separate = true;
        }
    }
    slug
}
