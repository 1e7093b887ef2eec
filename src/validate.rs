//! Field validators and normalizers for employee records.
//!
//! Validators are total: they answer `false` for bad input and never touch
//! the store. Uniqueness is the duplicate checker's job.
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{3,20}$").expect("valid identifier regex"));

pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 15;
pub const MIN_NAME_CHARS: usize = 2;

pub fn validate_email(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}

pub fn validate_phone(text: &str) -> bool {
    let count = digits_only(text).len();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&count)
}

pub fn validate_identifier_format(text: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(&text.to_uppercase())
}

pub fn validate_name(text: &str) -> bool {
    text.trim().chars().count() >= MIN_NAME_CHARS
}

/// Trim and uppercase a PF number.
pub fn normalize_identifier(text: &str) -> String {
    text.trim().to_uppercase()
}

pub fn normalize_email(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Canonical `+<digits>` phone form, or `None` when the digit count is out of
/// range. Exactly ten digits without `country_code` in front are a local
/// number: one leading trunk `0` is dropped and the code prepended.
pub fn normalize_phone(text: &str, country_code: &str) -> Option<String> {
    if !validate_phone(text) {
        return None;
    }
    let digits = digits_only(text);
    if digits.len() == MIN_PHONE_DIGITS && !digits.starts_with(country_code) {
        let local = digits.strip_prefix('0').unwrap_or(&digits);
        return Some(format!("+{country_code}{local}"));
    }
    Some(format!("+{digits}"))
}

pub fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

pub fn is_all_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|ch| ch.is_ascii_digit())
}

/// Parse a salary entry: digits with at most one decimal point.
pub fn parse_salary(text: &str) -> Option<f64> {
    let text = text.trim();
    let dots = text.chars().filter(|ch| *ch == '.').count();
    let digits = text.chars().filter(char::is_ascii_digit).count();
    if dots > 1 || digits == 0 || digits + dots != text.chars().count() {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| *value >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_standard_addresses() {
        assert!(validate_email("a@b.co"));
        assert!(validate_email("first.last+hr@mail.example.org"));
        assert!(validate_email("jane_doe%x@co-op.ke"));
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        assert!(!validate_email("a@b"));
        assert!(!validate_email("a@b.c"));
        assert!(!validate_email("@b.co"));
        assert!(!validate_email("a b@c.co"));
        assert!(!validate_email("a@b.co1"));
        assert!(!validate_email(""));
    }

    #[test]
    fn phone_counts_digits_only() {
        assert!(validate_phone("123-456-7890"));
        assert!(validate_phone("+254 712 345 678"));
        assert!(validate_phone("123456789012345"));
        assert!(!validate_phone("12345"));
        assert!(!validate_phone("1234567890123456"));
        assert!(!validate_phone("phone"));
    }

    #[test]
    fn identifier_format_is_case_insensitive() {
        assert!(validate_identifier_format("emp001"));
        assert!(validate_identifier_format("ABC"));
        assert!(validate_identifier_format("A1234567890123456789"));
        assert!(!validate_identifier_format("AB"));
        assert!(!validate_identifier_format("A12345678901234567890"));
        assert!(!validate_identifier_format("EMP-001"));
        assert!(!validate_identifier_format(""));
    }

    #[test]
    fn identifier_normalization_is_idempotent() {
        for raw in ["emp001", "  Mgr010 ", "ABC", "x-y", ""] {
            let once = normalize_identifier(raw);
            assert_eq!(normalize_identifier(&once), once, "input {raw:?}");
            assert_eq!(
                validate_identifier_format(&once),
                validate_identifier_format(&normalize_identifier(&once))
            );
        }
    }

    #[test]
    fn phone_normalization_applies_country_code_to_local_numbers() {
        assert_eq!(
            normalize_phone("0712345678", "254").as_deref(),
            Some("+254712345678")
        );
        assert_eq!(
            normalize_phone("0798765432", "254").as_deref(),
            Some("+254798765432")
        );
        assert_eq!(
            normalize_phone("(071) 234-5678", "254").as_deref(),
            Some("+254712345678")
        );
        // Only one trunk zero is dropped; a local number without one keeps
        // every digit.
        assert_eq!(
            normalize_phone("0071234567", "254").as_deref(),
            Some("+254071234567")
        );
        assert_eq!(
            normalize_phone("7123456789", "254").as_deref(),
            Some("+2547123456789")
        );
        assert_eq!(
            normalize_phone("0612345678", "1").as_deref(),
            Some("+1612345678")
        );
    }

    #[test]
    fn phone_normalization_keeps_prefixed_numbers() {
        assert_eq!(
            normalize_phone("254712345678", "254").as_deref(),
            Some("+254712345678")
        );
        assert_eq!(
            normalize_phone("+254 712-345-678", "254").as_deref(),
            Some("+254712345678")
        );
        // Ten digits that already start with the prefix are left alone.
        assert_eq!(
            normalize_phone("2547123456", "254").as_deref(),
            Some("+2547123456")
        );
        assert_eq!(normalize_phone("12345", "254"), None);
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("research and development"), "Research And Development");
        assert_eq!(title_case("qUALITY assurance"), "Quality Assurance");
        assert_eq!(title_case("r&d"), "R&D");
    }

    #[test]
    fn salary_accepts_plain_decimals_only() {
        assert_eq!(parse_salary("50000"), Some(50000.0));
        assert_eq!(parse_salary("1234.50"), Some(1234.5));
        assert_eq!(parse_salary(".5"), Some(0.5));
        assert_eq!(parse_salary(""), None);
        assert_eq!(parse_salary("."), None);
        assert_eq!(parse_salary("1.2.3"), None);
        assert_eq!(parse_salary("-100"), None);
        assert_eq!(parse_salary("1e5"), None);
        assert_eq!(parse_salary("KES 100"), None);
    }

    #[test]
    fn name_requires_two_characters_after_trim() {
        assert!(validate_name("Al"));
        assert!(!validate_name(" A "));
        assert!(!validate_name(""));
    }
}
