// Output formatting for terminal display.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending an
/// ellipsis if anything was cut. Operates on characters, not bytes, so
/// multi-byte text never splits mid-character.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate_chars("hello world", 5), "hello…");
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let s = "héllo wörld";
        let t = truncate_chars(s, 4);
        assert_eq!(t, "héll…");
    }
}
