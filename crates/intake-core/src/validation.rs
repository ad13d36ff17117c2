//! Contact format validation.
//!
//! Validity is a derived flag: invalid contacts change the initial order
//! status but never abort order creation.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

// Russian mobile numbers only, matching what the intake form promises.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+7\d{10}$").expect("phone regex is valid"));

/// True when the string looks like an email address. Empty is invalid.
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_RE.is_match(email)
}

/// True when the string is a `+7XXXXXXXXXX` phone number. Empty is invalid.
pub fn is_valid_phone(phone: &str) -> bool {
    !phone.is_empty() && PHONE_RE.is_match(phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("ivanov@mail.ru"));
        assert!(is_valid_email("a@b.co"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("bad"));
        assert!(!is_valid_email("no at.example.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("nodot@example"));
    }

    #[test]
    fn test_valid_phone() {
        assert!(is_valid_phone("+79161234567"));
    }

    #[test]
    fn test_invalid_phone() {
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("89161234567"));
        assert!(!is_valid_phone("+7916123456"));
        assert!(!is_valid_phone("+791612345678"));
        assert!(!is_valid_phone("+7916123456a"));
    }
}
