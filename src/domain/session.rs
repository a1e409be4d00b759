//! User identity for history scoping.
//!
//! Authentication itself is an external collaborator; this crate only needs
//! "current identity or none". History operations take the identity
//! explicitly rather than consulting ambient session state.

use serde::{Deserialize, Serialize};

/// An account identity, typically an email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sanitized form for use inside persistence keys: ASCII alphanumerics
    /// and `@ . - _` are kept, everything else becomes `_`, lowercased.
    #[must_use]
    pub fn sanitized(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '-' | '_') {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_keeps_email_characters() {
        let user = UserId::new("Jane.Doe-99@example.com");
        assert_eq!(user.sanitized(), "jane.doe-99@example.com");
    }

    #[test]
    fn test_sanitized_replaces_everything_else() {
        let user = UserId::new("weird user!#æ");
        assert_eq!(user.sanitized(), "weird_user___");
    }
}
