//! Redaction of identifying strings before they reach any log line

/// Token substituted for hidden characters
pub const MASK: &str = "***";

/// Shown in place of a value that was never learned
pub const UNKNOWN: &str = "unknown";

/// Number of leading characters kept visible
const VISIBLE: usize = 2;

/// Mask an email address or a username.
///
/// Emails keep the first two characters of the local part and the whole
/// domain; other text keeps its first two characters. Anything two characters
/// or shorter is masked entirely. Empty input is returned unchanged.
///
/// ```
/// use ablesci_checkin::utils::privacy::redact;
///
/// assert_eq!(redact("alice@example.com"), "al***@example.com");
/// assert_eq!(redact("username"), "us***");
/// assert_eq!(redact("ab"), "***");
/// ```
pub fn redact(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    match text.split_once('@') {
        Some((local, domain)) => format!("{}@{}", mask_prefix(local), domain),
        None => mask_prefix(text),
    }
}

/// [`redact`] for values that may not have been scraped
pub fn redact_opt(text: Option<&str>) -> String {
    match text {
        Some(text) => redact(text),
        None => UNKNOWN.to_string(),
    }
}

fn mask_prefix(text: &str) -> String {
    if text.chars().count() > VISIBLE {
        let visible: String = text.chars().take(VISIBLE).collect();
        format!("{}{}", visible, MASK)
    } else {
        MASK.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc@example.com", "ab***@example.com")]
    #[case("ab@example.com", "***@example.com")]
    #[case("a@example.com", "***@example.com")]
    #[case("@example.com", "***@example.com")]
    #[case("username", "us***")]
    #[case("abc", "ab***")]
    #[case("ab", "***")]
    #[case("a", "***")]
    #[case("", "")]
    fn test_redact(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(redact(input), expected);
    }

    #[test]
    fn test_redact_counts_characters_not_bytes() {
        assert_eq!(redact("科研通用户"), "科研***");
        assert_eq!(redact("张三"), "***");
        assert_eq!(redact("科研通@example.cn"), "科研***@example.cn");
    }

    #[test]
    fn test_redact_keeps_everything_after_first_at() {
        assert_eq!(redact("alice@mail@example.com"), "al***@mail@example.com");
    }

    #[test]
    fn test_redact_opt() {
        assert_eq!(redact_opt(Some("username")), "us***");
        assert_eq!(redact_opt(None), UNKNOWN);
    }
}
