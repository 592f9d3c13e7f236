/// JWT issuance and validation
///
/// Tokens are self-contained and stateless: validity is decided entirely by
/// the HMAC signature and the expiry claim, never by server-side state.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};

/// Issue a signed access token for a subject.
///
/// The claim set is `{sub, exp = now + configured TTL, iat}` signed with the
/// configured algorithm. Only fails when the signing configuration itself is
/// unusable, which `main` already treats as fatal at startup.
pub fn issue_access_token(subject: &str, config: &AuthSettings) -> Result<String, AppError> {
    if config.secret.is_empty() {
        return Err(AppError::Config("signing secret is not set".to_string()));
    }

    let algorithm = config.signing_algorithm()?;
    let claims = Claims::new(subject, config.token_expiry_minutes * 60);

    encode(
        &Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token generation failed: {}", e)))
}

/// Validate a token and extract its claims.
///
/// Malformed, tampered, and expired tokens all collapse into the same
/// `InvalidToken` error. Signature comparison inside jsonwebtoken is
/// constant-time; expiry is checked strictly with zero leeway, so a token
/// whose expiry equals the current second is already invalid.
pub fn validate_access_token(token: &str, config: &AuthSettings) -> Result<Claims, AppError> {
    let algorithm = config.signing_algorithm()?;

    let mut validation = Validation::new(algorithm);
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!(error = %e, "token validation failed");
        AppError::Auth(AuthError::InvalidToken)
    })?;

    // jsonwebtoken accepts exp == now; the contract here is strict.
    if claims.is_expired() {
        return Err(AppError::Auth(AuthError::InvalidToken));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthSettings {
        AuthSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            algorithm: "HS256".to_string(),
            token_expiry_minutes: 30,
        }
    }

    #[test]
    fn issued_token_validates_and_carries_subject() {
        let config = test_config();

        let token = issue_access_token("ana@x.com", &config).expect("failed to issue token");
        let claims = validate_access_token(&token, &config).expect("failed to validate token");

        assert_eq!(claims.sub, "ana@x.com");
        assert_eq!(claims.exp, claims.iat + 30 * 60);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let config = test_config();

        let result = validate_access_token("not.a.token", &config);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let config = test_config();
        let token = issue_access_token("ana@x.com", &config).expect("failed to issue token");

        // Flip the last character of the signature segment.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert_ne!(token, tampered);

        let result = validate_access_token(&tampered, &config);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = test_config();
        let mut other = test_config();
        other.secret = "another-secret-that-is-also-long-enough".to_string();

        let token = issue_access_token("ana@x.com", &other).expect("failed to issue token");

        let result = validate_access_token(&token, &config);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn zero_ttl_token_is_immediately_invalid() {
        let mut config = test_config();
        config.token_expiry_minutes = 0;

        let token = issue_access_token("ana@x.com", &config).expect("failed to issue token");

        let result = validate_access_token(&token, &config);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn token_expired_in_the_past_is_invalid() {
        // Equivalent to validating a 30 minute token with the clock advanced
        // 31 minutes.
        let mut config = test_config();
        config.token_expiry_minutes = -1;

        let token = issue_access_token("ana@x.com", &config).expect("failed to issue token");

        let result = validate_access_token(&token, &config);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let mut config = test_config();
        config.secret = String::new();

        let result = issue_access_token("ana@x.com", &config);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn hs384_and_hs512_roundtrip() {
        for alg in ["HS384", "HS512"] {
            let mut config = test_config();
            config.algorithm = alg.to_string();

            let token = issue_access_token("ana@x.com", &config).expect("failed to issue token");
            let claims =
                validate_access_token(&token, &config).expect("failed to validate token");
            assert_eq!(claims.sub, "ana@x.com");
        }
    }
}
