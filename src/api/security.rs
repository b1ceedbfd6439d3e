use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderValue, AUTHORIZATION, WWW_AUTHENTICATE};
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpResponse};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use subtle::ConstantTimeEq;

use super::errors::{ErrorResponse, UNAUTHORIZED};
use crate::config::SecurityConfig;

// ============================================================================
// HTTP Basic credential check
// ============================================================================
//
// One credential pair, built from config at startup and registered as app
// data. Requests without app data are refused.
//
// ============================================================================

const REALM: &str = "Basic realm=\"customer-api\"";

#[derive(Clone)]
pub struct ApiCredentials {
    enabled: bool,
    username: String,
    password: String,
}

impl ApiCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            enabled: true,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Accept every request.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            username: String::new(),
            password: String::new(),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        if config.enabled {
            Self::new(config.username.clone(), config.password.clone())
        } else {
            Self::disabled()
        }
    }

    /// Check an `Authorization` header value against the configured pair.
    pub fn verify(&self, header: Option<&HeaderValue>) -> bool {
        if !self.enabled {
            return true;
        }

        let Some((username, password)) = header.and_then(parse_basic) else {
            return false;
        };

        // Compare both halves so timing does not reveal which one differs
        let username_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let password_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        (username_ok & password_ok).into()
    }
}

fn parse_basic(header: &HeaderValue) -> Option<(String, String)> {
    let value = header.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Middleware guarding the /api scope.
pub async fn require_basic_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, Error> {
    let authorized = match req.app_data::<web::Data<ApiCredentials>>() {
        Some(credentials) => credentials.verify(req.headers().get(AUTHORIZATION)),
        None => {
            tracing::error!("No API credentials registered, refusing request");
            false
        }
    };

    if authorized {
        return next.call(req).await.map(ServiceResponse::map_into_left_body);
    }

    tracing::warn!(path = %req.path(), "Rejected unauthenticated request");
    let response = HttpResponse::Unauthorized()
        .insert_header((WWW_AUTHENTICATE, REALM))
        .json(ErrorResponse::new(UNAUTHORIZED));
    Ok(req.into_response(response).map_into_right_body())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(username: &str, password: &str) -> HeaderValue {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        HeaderValue::from_str(&format!("Basic {encoded}")).unwrap()
    }

    #[test]
    fn test_verify_accepts_matching_pair() {
        let credentials = ApiCredentials::new("api_user", "verysecurepassword");
        assert!(credentials.verify(Some(&basic("api_user", "verysecurepassword"))));
    }

    #[test]
    fn test_verify_rejects_wrong_or_missing() {
        let credentials = ApiCredentials::new("api_user", "verysecurepassword");
        assert!(!credentials.verify(None));
        assert!(!credentials.verify(Some(&basic("api_user", "wrong"))));
        assert!(!credentials.verify(Some(&basic("someone", "verysecurepassword"))));
        assert!(!credentials.verify(Some(&HeaderValue::from_static("Bearer abc"))));
        assert!(!credentials.verify(Some(&HeaderValue::from_static("Basic !!!not-base64"))));
    }

    #[test]
    fn test_password_may_contain_colon() {
        let credentials = ApiCredentials::new("api_user", "pass:word");
        assert!(credentials.verify(Some(&basic("api_user", "pass:word"))));
    }

    #[test]
    fn test_disabled_accepts_everything() {
        assert!(ApiCredentials::disabled().verify(None));
    }

    #[test]
    fn test_from_config() {
        let config = SecurityConfig {
            enabled: false,
            username: "api_user".to_string(),
            password: "secret".to_string(),
        };
        assert!(ApiCredentials::from_config(&config).verify(None));

        let config = SecurityConfig {
            enabled: true,
            ..config
        };
        let credentials = ApiCredentials::from_config(&config);
        assert!(!credentials.verify(None));
        assert!(credentials.verify(Some(&basic("api_user", "secret"))));
    }
}
