// HTTP Basic authentication
//
// Credentials come from BENCHMARK_API_USER / BENCHMARK_API_PASS.
// Comparison goes through SHA-256 digests so it does not leak credential
// length or a matching prefix through timing.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha2::{Digest, Sha256};

use crate::benchmark::ErrorResponse;

const DEFAULT_USER: &str = "admin";
const DEFAULT_PASS: &str = "password";

/// Expected credentials for the benchmark endpoint.
#[derive(Debug, Clone)]
pub struct BasicAuthConfig {
    username: String,
    password: String,
}

impl BasicAuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Load credentials from the environment, falling back to the demo
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            username: std::env::var("BENCHMARK_API_USER").unwrap_or_else(|_| DEFAULT_USER.into()),
            password: std::env::var("BENCHMARK_API_PASS").unwrap_or_else(|_| DEFAULT_PASS.into()),
        }
    }

    /// Check a presented username/password pair.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        digest_eq(username, &self.username) & digest_eq(password, &self.password)
    }
}

fn digest_eq(presented: &str, expected: &str) -> bool {
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}

/// Extract the username/password pair from a Basic Authorization header.
fn parse_basic(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (username, password) = text.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Middleware guarding the benchmark routes.
pub async fn require_basic_auth(
    State(config): State<BasicAuthConfig>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic)
        .map(|(username, password)| config.verify(&username, &password))
        .unwrap_or(false);

    if !authorized {
        return unauthorized();
    }

    next.run(request).await
}

fn unauthorized() -> Response {
    let mut response = (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            detail: "Incorrect username or password".to_string(),
        }),
    )
        .into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        header::HeaderValue::from_static("Basic"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        // "admin:password"
        let parsed = parse_basic("Basic YWRtaW46cGFzc3dvcmQ=").unwrap();
        assert_eq!(parsed.0, "admin");
        assert_eq!(parsed.1, "password");
    }

    #[test]
    fn test_parse_basic_rejects_other_schemes() {
        assert!(parse_basic("Bearer abc123").is_none());
        assert!(parse_basic("Basic not-base64!!").is_none());
    }

    #[test]
    fn test_password_with_colon() {
        // "user:pa:ss" - only the first colon separates
        let encoded = BASE64.encode("user:pa:ss");
        let parsed = parse_basic(&format!("Basic {}", encoded)).unwrap();
        assert_eq!(parsed.0, "user");
        assert_eq!(parsed.1, "pa:ss");
    }

    #[test]
    fn test_verify() {
        let config = BasicAuthConfig::new("admin", "secret");
        assert!(config.verify("admin", "secret"));
        assert!(!config.verify("admin", "wrong"));
        assert!(!config.verify("other", "secret"));
    }
}
