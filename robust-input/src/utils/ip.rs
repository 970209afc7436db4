//! # Address validators
//!
//! Predicates for network-ish prompts, usable directly as
//! [`crate::utils::InputConfigBuilder::custom_validator`] arguments.
//!
//! ```rust
//! use robust_input::utils::{is_hostname, is_ipv4_dotted_quad};
//!
//! assert!(is_ipv4_dotted_quad("192.168.1.1"));
//! assert!(!is_ipv4_dotted_quad("192.168.01.1"));
//! assert!(is_hostname("api.example.com"));
//! ```
use regex::Regex;
use std::sync::LazyLock;

/// Lives outside the shared [`crate::utils::PatternCache`].
static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,3}\.){3}[0-9]{1,3}$").expect("Invalid dotted quad regex")
});

/// Checks for four decimal octets in `0..=255` separated by single dots.
///
/// # Rules
/// - Exactly four octets of one to three digits
/// - No leading zeros (`0` on its own is fine)
/// - Each octet at most 255
pub fn is_ipv4_dotted_quad(input: &str) -> bool {
    if !DOTTED_QUAD.is_match(input) {
        return false;
    }

    input.split('.').all(|octet| {
        if octet.len() > 1 && octet.starts_with('0') {
            return false;
        }
        octet.parse::<u16>().is_ok_and(|n| n <= 255)
    })
}

/// Checks if the provided string is a valid DNS host name.
///
/// # Rules
/// - Maximum length: 253 characters
/// - Each label 1 to 63 characters
/// - Cannot start or end with `-`
/// - Only ASCII alphanumeric characters and `-` allowed
pub fn is_hostname(input: &str) -> bool {
    if input.is_empty() || input.len() > 253 {
        return false;
    }

    input.split('.').all(|label| {
        if label.is_empty() || label.len() > 63 {
            return false;
        }

        if label.starts_with('-') || label.ends_with('-') {
            return false;
        }

        label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_valid() {
        assert!(is_ipv4_dotted_quad("192.168.1.1"));
        assert!(is_ipv4_dotted_quad("0.0.0.0"));
        assert!(is_ipv4_dotted_quad("255.255.255.255"));
        assert!(is_ipv4_dotted_quad("10.0.100.9"));
    }

    #[test]
    fn test_ipv4_octet_out_of_range() {
        assert!(!is_ipv4_dotted_quad("256.1.1.1"));
        assert!(!is_ipv4_dotted_quad("1.1.1.999"));
    }

    #[test]
    fn test_ipv4_leading_zero() {
        assert!(!is_ipv4_dotted_quad("192.168.01.1"));
        assert!(!is_ipv4_dotted_quad("00.1.1.1"));
    }

    #[test]
    fn test_ipv4_wrong_shape() {
        assert!(!is_ipv4_dotted_quad("192.168.1"));
        assert!(!is_ipv4_dotted_quad("192.168.1.1.1"));
        assert!(!is_ipv4_dotted_quad("192..168.1"));
        assert!(!is_ipv4_dotted_quad("192.168.1.1 "));
        assert!(!is_ipv4_dotted_quad("a.b.c.d"));
        assert!(!is_ipv4_dotted_quad(""));
    }

    #[test]
    fn test_ipv4_check_leaves_shared_cache_alone() {
        for i in 0..50 {
            assert!(is_ipv4_dotted_quad(&format!("10.0.0.{}", i)));
        }
        let shared = crate::utils::PatternCache::shared();
        assert!(!shared.lock().contains(DOTTED_QUAD.as_str()));
    }

    #[test]
    fn test_hostname_valid() {
        assert!(is_hostname("localhost"));
        assert!(is_hostname("example.com"));
        assert!(is_hostname("my-host-01.internal"));
    }

    #[test]
    fn test_hostname_invalid() {
        assert!(!is_hostname(""));
        assert!(!is_hostname("exa$mple.com"));
        assert!(!is_hostname("-edge.com"));
        assert!(!is_hostname("double..dot"));
        assert!(!is_hostname(&"a".repeat(64)));
        assert!(!is_hostname(&format!("{}.com", "a.".repeat(130))));
    }
}
