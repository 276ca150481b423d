//! Text sanitization.

/// Sanitize raw extracted text.
///
/// Removes NUL bytes and other non-whitespace control characters,
/// collapses every whitespace run to a single space, and trims. Pure
/// and total: always returns a string, possibly empty, and applying it
/// twice gives the same result as applying it once.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else if c.is_control() {
            // Non-whitespace control characters are noise from binary
            // formats and terminal escapes.
            continue;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize("a\0b\x01c\x7fd"), "abcd");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(sanitize("  hello \t\n  world\r\n "), "hello world");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize(" \t \n "), "");
        assert_eq!(sanitize("\0\x08"), "");
    }

    #[test]
    fn test_preserves_unicode_text() {
        assert_eq!(sanitize("日本語  テスト"), "日本語 テスト");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "plain text",
            "  messy \0 input \n with\tcontrols\x1f ",
            "",
            "日本語\u{0007}と  空白",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", input);
        }
    }
}
