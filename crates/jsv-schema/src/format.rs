//! # Format Registry
//!
//! Maps `format` keyword names to string predicates. The registry is an
//! ordinary value owned by a [`SchemaValidator`](crate::SchemaValidator),
//! so tests can build isolated registries and register their own checkers.
//!
//! Built-in checkers:
//!
//! - `email` — exactly one `@`, non-empty local and domain parts, dotted domain.
//! - `date` — strict `YYYY-MM-DD`, calendar-valid (leap years included).
//! - `uri` — absolute URI with a scheme, parsed per RFC 3986 by `url`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use url::Url;

/// A format predicate. Must be shareable across batch workers.
pub type FormatPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Result of checking a value against a named format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCheck {
    /// The value satisfies the format.
    Valid,
    /// The value violates the format.
    Invalid,
    /// No checker is registered under that name.
    Unknown,
}

/// Named format predicates consulted by the `format` keyword.
#[derive(Clone)]
pub struct FormatRegistry {
    checkers: HashMap<String, FormatPredicate>,
}

impl FormatRegistry {
    /// A registry with no checkers at all.
    pub fn empty() -> Self {
        Self {
            checkers: HashMap::new(),
        }
    }

    /// A registry preloaded with `email`, `date` and `uri`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("email", is_email);
        registry.register("date", is_date);
        registry.register("uri", is_uri);
        registry
    }

    /// Register (or replace) the checker for `name`.
    pub fn register<F>(&mut self, name: &str, predicate: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.checkers.insert(name.to_string(), Arc::new(predicate));
    }

    /// Check `value` against the format called `name`.
    pub fn check(&self, name: &str, value: &str) -> FormatCheck {
        match self.checkers.get(name) {
            Some(predicate) if predicate(value) => FormatCheck::Valid,
            Some(_) => FormatCheck::Invalid,
            None => FormatCheck::Unknown,
        }
    }

    /// Whether a checker is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.checkers.contains_key(name)
    }

    /// Registered format names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.checkers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.names())
            .finish()
    }
}

/// Practical email check, not full RFC 5321: exactly one `@`, both sides
/// non-empty, and a `.` somewhere in the domain.
pub fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && domain.contains('.')
        }
        None => false,
    }
}

/// Strict `YYYY-MM-DD` with calendar validation.
pub fn is_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return false;
    }
    let (Ok(year), Ok(month), Ok(day)) = (
        value[0..4].parse::<i32>(),
        value[5..7].parse::<u32>(),
        value[8..10].parse::<u32>(),
    ) else {
        return false;
    };
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// Absolute URI: `scheme:` prefix plus an RFC 3986 plausible remainder.
pub fn is_uri(value: &str) -> bool {
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    scheme_ok && Url::parse(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_practical_addresses() {
        assert!(is_email("user@example.com"));
        assert!(is_email("first.last+tag@mail.example.org"));
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        assert!(!is_email("not-an-email"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("user@"));
        assert!(!is_email("user@localhost"));
        assert!(!is_email("a@b@example.com"));
    }

    #[test]
    fn email_checks_only_at_sign_and_domain_dot() {
        assert!(is_email("user@.com"));
        assert!(is_email("user@example."));
        assert!(is_email("user name@example.com"));
        assert!(!is_email("user@example"));
    }

    #[test]
    fn date_validates_calendar() {
        assert!(is_date("2024-02-29"));
        assert!(is_date("2000-02-29"));
        assert!(is_date("2023-12-31"));
        assert!(!is_date("2023-02-29"));
        assert!(!is_date("1900-02-29"));
        assert!(!is_date("2024-02-30"));
        assert!(!is_date("2024-13-01"));
        assert!(!is_date("2024-00-10"));
    }

    #[test]
    fn date_requires_exact_shape() {
        assert!(!is_date("2024-2-01"));
        assert!(!is_date("2024/02/01"));
        assert!(!is_date("24-02-01"));
        assert!(!is_date("2024-02-01T00:00:00Z"));
        assert!(!is_date("２０２４-02-01"));
    }

    #[test]
    fn uri_requires_scheme() {
        assert!(is_uri("https://example.com/path?q=1#frag"));
        assert!(is_uri("mailto:user@example.com"));
        assert!(is_uri("urn:isbn:0451450523"));
        assert!(!is_uri("example.com/path"));
        assert!(!is_uri("/relative/path"));
        assert!(!is_uri("1http://example.com"));
        assert!(!is_uri("http://exa mple.com"));
    }

    #[test]
    fn unknown_format_reports_unknown() {
        let registry = FormatRegistry::with_builtins();
        assert_eq!(registry.check("hostname", "anything"), FormatCheck::Unknown);
        assert_eq!(FormatRegistry::empty().check("email", "x"), FormatCheck::Unknown);
    }

    #[test]
    fn custom_checker_can_be_registered() {
        let mut registry = FormatRegistry::empty();
        registry.register("even-length", |s| s.len() % 2 == 0);
        assert_eq!(registry.check("even-length", "ab"), FormatCheck::Valid);
        assert_eq!(registry.check("even-length", "abc"), FormatCheck::Invalid);
        assert_eq!(registry.names(), vec!["even-length"]);
    }
}
