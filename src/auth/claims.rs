/// JWT claim set
///
/// A fixed, typed structure rather than an open-ended map, so nothing beyond
/// the subject and the timestamps can ever ride along in a token.

use serde::{Deserialize, Serialize};

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's email
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims for a subject expiring `ttl_seconds` from now.
    pub fn new(subject: &str, ttl_seconds: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: subject.to_string(),
            exp: now + ttl_seconds,
            iat: now,
        }
    }

    /// A token is valid only while its expiry is strictly in the future,
    /// so a ttl of zero is expired from the moment it is issued.
    pub fn is_expired(&self) -> bool {
        self.exp <= chrono::Utc::now().timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_carry_subject_and_expiry() {
        let claims = Claims::new("ana@x.com", 3600);

        assert_eq!(claims.sub, "ana@x.com");
        assert_eq!(claims.exp, claims.iat + 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn zero_ttl_is_immediately_expired() {
        let claims = Claims::new("ana@x.com", 0);
        assert!(claims.is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        let claims = Claims::new("ana@x.com", -60);
        assert!(claims.is_expired());
    }
}
