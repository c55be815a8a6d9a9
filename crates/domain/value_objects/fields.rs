/// Optional text that is present but blank is never written to the tree.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Rejects keys the realtime tree cannot address as a single path segment.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key
            .chars()
            .any(|c| matches!(c, '/' | '.' | '#' | '$' | '[' | ']') || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_collapse_to_none() {
        assert_eq!(non_blank(Some(String::new())), None);
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(
            non_blank(Some("https://cdn.example/a.mp4".to_string())),
            Some("https://cdn.example/a.mp4".to_string())
        );
    }

    #[test]
    fn keys_with_path_characters_are_rejected() {
        assert!(is_valid_key("-NxA1b2C3"));
        assert!(is_valid_key("uid_123"));
        for key in ["", "a/b", "a.b", "a#b", "$a", "a[0]", "..", "a\nb"] {
            assert!(!is_valid_key(key), "expected `{key}` to be rejected");
        }
    }
}
