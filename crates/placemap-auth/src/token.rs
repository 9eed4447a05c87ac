use serde::{Deserialize, Serialize};

/// Bearer token returned by the token endpoint.
///
/// A run is short and never refreshes; the expiry is only checked once
/// before the sheet is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,

    /// Unix timestamp
    pub expires_at: i64,

    /// Scopes the endpoint reported as granted
    pub scopes: Vec<String>,
}

impl TokenSet {
    /// Seconds until expiry at `now`, negative once expired.
    pub fn remaining_secs(&self, now: i64) -> i64 {
        self.expires_at - now
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs(chrono::Utc::now().timestamp()) <= 0
    }

    /// True when the token expires within `margin_secs` from now.
    pub fn expires_within(&self, margin_secs: i64) -> bool {
        self.remaining_secs(chrono::Utc::now().timestamp()) <= margin_secs
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_at: i64, scopes: &[&str]) -> TokenSet {
        TokenSet {
            access_token: "ya29.test".to_string(),
            expires_at,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_remaining_secs() {
        let t = token(1_000, &[]);
        assert_eq!(t.remaining_secs(400), 600);
        assert_eq!(t.remaining_secs(1_500), -500);
    }

    #[test]
    fn test_expiry_checks() {
        let now = chrono::Utc::now().timestamp();

        assert!(token(now - 60, &[]).is_expired());
        assert!(!token(now + 3600, &[]).is_expired());

        let soon = token(now + 120, &[]);
        assert!(!soon.is_expired());
        assert!(soon.expires_within(300));
        assert!(!soon.expires_within(10));
    }

    #[test]
    fn test_has_scope() {
        let t = token(0, &["https://www.googleapis.com/auth/spreadsheets.readonly"]);
        assert!(t.has_scope("https://www.googleapis.com/auth/spreadsheets.readonly"));
        assert!(!t.has_scope("https://www.googleapis.com/auth/drive"));
    }
}
