//! HTML text extraction for link ingestion.
//!
//! Markup is not interpreted: script/style/comment blocks are dropped,
//! remaining tags are replaced with spaces, and a fixed set of entities
//! is decoded. Anything heavier (rendering, JavaScript) is out of scope.

/// Extract the page title from the first `<title>` tag, if present.
pub fn extract_title(html: &str) -> Option<String> {
    let open = find_ignore_ascii_case(html, "<title")?;
    let rest = &html[open..];
    let content_start = open + rest.find('>')? + 1;
    let content = &html[content_start..];
    let content_end = find_ignore_ascii_case(content, "</title")?;

    let title = content[..content_end].trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Strip markup and decode entities, leaving whitespace-separated text.
///
/// The result still carries redundant whitespace; callers are expected
/// to run it through [`crate::sanitize`].
pub fn extract_text(html: &str) -> String {
    decode_entities(&strip_markup(html))
}

fn strip_markup(html: &str) -> String {
    let mut out = Vec::with_capacity(html.len());
    let bytes = html.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            let rest = &html[i..];
            if rest.starts_with("<!--") {
                i += rest.find("-->").map(|p| p + 3).unwrap_or(rest.len());
            } else if starts_with_ignore_ascii_case(rest, "<script") {
                i += skip_element(rest, "</script");
            } else if starts_with_ignore_ascii_case(rest, "<style") {
                i += skip_element(rest, "</style");
            } else {
                i += rest.find('>').map(|p| p + 1).unwrap_or(rest.len());
            }
            out.push(b' ');
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    // Only ASCII-delimited regions were removed, so the bytes are
    // still valid UTF-8.
    String::from_utf8(out).unwrap_or_default()
}

/// Length of an element including its content and closing tag.
fn skip_element(rest: &str, close_tag: &str) -> usize {
    match find_ignore_ascii_case(rest, close_tag) {
        Some(close) => {
            let after = &rest[close..];
            close + after.find('>').map(|p| p + 1).unwrap_or(after.len())
        }
        None => rest.len(),
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&apos;", "'")
}

fn starts_with_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack.len() >= needle.len()
        && haystack.as_bytes()[..needle.len()].eq_ignore_ascii_case(needle.as_bytes())
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}
