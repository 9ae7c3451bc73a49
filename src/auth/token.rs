use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, SecurityConfig};

const MAX_EXPIRY_HOURS: u64 = 24 * 365 * 10;

const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Identity claims carried inside a signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    /// Stringified user id
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("malformed token")]
    Malformed,

    #[error("token signature rejected")]
    Signature,

    #[error("token outside its validity window")]
    Expired,

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl TokenError {
    fn from_decode(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => TokenError::Signature,
            ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Issues and verifies HMAC-signed bearer tokens.
///
/// Built once from `SecurityConfig` and shared read-only across requests.
#[derive(Clone)]
pub struct TokenService {
    secret: Option<String>,
    lifetime: Duration,
    issuer: String,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("lifetime", &self.lifetime)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Self {
        let hours = security.jwt_expiry_hours.min(MAX_EXPIRY_HOURS) as i64;
        Self {
            secret: security.jwt_secret.clone().filter(|s| !s.is_empty()),
            lifetime: Duration::hours(hours),
            issuer: security.jwt_issuer.clone(),
        }
    }

    /// Token lifetime in seconds.
    pub fn expires_in(&self) -> i64 {
        self.lifetime.num_seconds()
    }

    fn secret(&self) -> Result<&str, TokenError> {
        self.secret
            .as_deref()
            .ok_or(TokenError::Config(ConfigError::Missing("JWT_SECRET")))
    }

    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, email, Utc::now())
    }

    pub fn issue_at(&self, user_id: i64, email: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let secret = self.secret()?;
        let issued = now.timestamp();

        let claims = Claims {
            user_id,
            email: email.to_string(),
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            iat: issued,
            nbf: issued,
            exp: (now + self.lifetime).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature and algorithm, then require `nbf <= now <= exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let secret = self.secret()?;

        // Only the HMAC family is accepted; any other declared alg is rejected
        check_declared_algorithm(token)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map_err(TokenError::from_decode)?
            .claims;

        let now = now.timestamp();
        if now < claims.nbf || now > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Read the raw `alg` header before jsonwebtoken does. Names it cannot
/// represent (`none`, `HS1`) would otherwise surface as a JSON error.
fn check_declared_algorithm(token: &str) -> Result<(), TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(TokenError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: serde_json::Value = serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

    let accepted = header
        .get("alg")
        .and_then(|alg| alg.as_str())
        .and_then(|alg| alg.parse::<Algorithm>().ok())
        .map_or(false, |alg| ACCEPTED_ALGORITHMS.contains(&alg));

    if !accepted {
        return Err(TokenError::Signature);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_for_testing_purposes_only";

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SecurityConfig::new(secret))
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let tokens = service(SECRET);
        let now = Utc::now();

        let token = tokens.issue_at(42, "user@example.com", now).unwrap();
        let claims = tokens.verify_at(&token, now + Duration::minutes(5)).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, "notes-api");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp, claims.iat + 24 * 3600);
    }

    #[test]
    fn test_expiry_window_is_configurable() {
        let mut security = SecurityConfig::new(SECRET);
        security.jwt_expiry_hours = 2;
        let tokens = TokenService::new(&security);
        let now = Utc::now();

        let token = tokens.issue_at(1, "a@b.co", now).unwrap();
        assert!(tokens.verify_at(&token, now + Duration::hours(2)).is_ok());
        assert!(matches!(
            tokens.verify_at(&token, now + Duration::hours(2) + Duration::seconds(1)),
            Err(TokenError::Expired)
        ));
        assert_eq!(tokens.expires_in(), 7200);
    }

    #[test]
    fn test_token_expires_after_window() {
        let tokens = service(SECRET);
        let now = Utc::now();
        let token = tokens.issue_at(7, "a@b.co", now).unwrap();

        assert!(tokens.verify_at(&token, now + Duration::hours(1)).is_ok());
        assert!(matches!(
            tokens.verify_at(&token, now + Duration::hours(25)),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_not_yet_valid_token() {
        let tokens = service(SECRET);
        let now = Utc::now();
        let token = tokens.issue_at(7, "a@b.co", now).unwrap();

        assert!(matches!(
            tokens.verify_at(&token, now - Duration::minutes(1)),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service("secret-A").issue(3, "a@b.co").unwrap();
        assert!(matches!(service("secret-B").verify(&token), Err(TokenError::Signature)));
    }

    #[test]
    fn test_other_hmac_variants_accepted() {
        let now = Utc::now();
        let claims = Claims {
            user_id: 9,
            email: "a@b.co".into(),
            sub: "9".into(),
            iss: "notes-api".into(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: now.timestamp() + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(service(SECRET).verify_at(&token, now).unwrap(), claims);
    }

    #[test]
    fn test_non_hmac_algorithm_rejected() {
        let tokens = service(SECRET);
        let token = tokens.issue(5, "a@b.co").unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        // {"alg":"RS256","typ":"JWT"}
        parts[0] = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";
        let forged = parts.join(".");

        assert!(matches!(tokens.verify(&forged), Err(TokenError::Signature)));
    }

    fn with_header(token: &str, header: &str) -> String {
        let parts: Vec<&str> = token.split('.').collect();
        format!("{}.{}.{}", URL_SAFE_NO_PAD.encode(header), parts[1], parts[2])
    }

    #[test]
    fn test_unknown_algorithm_names_rejected() {
        let tokens = service(SECRET);
        let token = tokens.issue(5, "a@b.co").unwrap();

        for header in [
            r#"{"alg":"none","typ":"JWT"}"#,
            r#"{"alg":"HS1","typ":"JWT"}"#,
            r#"{"alg":"ES256","typ":"JWT"}"#,
            r#"{"typ":"JWT"}"#,
        ] {
            let forged = with_header(&token, header);
            assert!(
                matches!(tokens.verify(&forged), Err(TokenError::Signature)),
                "header {}",
                header
            );
        }

        // alg:none with the signature stripped entirely
        let parts: Vec<&str> = token.split('.').collect();
        let unsigned = format!("{}.{}.", URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#), parts[1]);
        assert!(matches!(tokens.verify(&unsigned), Err(TokenError::Signature)));
    }

    #[test]
    fn test_header_that_is_not_json_is_malformed() {
        let tokens = service(SECRET);
        let token = tokens.issue(5, "a@b.co").unwrap();
        let forged = with_header(&token, "not json");
        assert!(matches!(tokens.verify(&forged), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let tokens = service(SECRET);
        let token = tokens.issue(5, "a@b.co").unwrap();
        let other = tokens.issue(6, "c@d.co").unwrap();
        let a: Vec<&str> = token.split('.').collect();
        let b: Vec<&str> = other.split('.').collect();
        let spliced = format!("{}.{}.{}", a[0], b[1], a[2]);

        assert!(matches!(tokens.verify(&spliced), Err(TokenError::Signature)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let tokens = service(SECRET);
        assert!(matches!(tokens.verify("not-a-token"), Err(TokenError::Malformed)));
        assert!(matches!(tokens.verify("a.b.c"), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let tokens = TokenService::new(&SecurityConfig {
            jwt_secret: None,
            ..SecurityConfig::new("unused")
        });
        assert!(matches!(tokens.issue(1, "a@b.co"), Err(TokenError::Config(_))));
        assert!(matches!(tokens.verify("a.b.c"), Err(TokenError::Config(_))));
    }
}
