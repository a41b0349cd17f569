use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{
    auth::dto::SessionUser,
    config::SessionConfig,
    cookies,
    flash::{self, Notice},
    state::AppState,
};

pub const SESSION_COOKIE: &str = "session";

/// Signed session payload stored in the browser.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user: SessionUser,
    pub iat: usize,     // issued at (unix timestamp)
    pub exp: usize,     // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
}

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
    pub secure: bool,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        let SessionConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
            secure_cookie,
        } = state.config.session.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::minutes(ttl_minutes),
            secure: secure_cookie,
        }
    }
}

impl SessionKeys {
    pub fn sign(&self, user: &SessionUser) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + self.ttl;
        let claims = SessionClaims {
            user: user.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = user.id, "session signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<SessionUser> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<SessionClaims>(token, &self.decoding, &validation)?;
        Ok(data.claims.user)
    }

    /// `Set-Cookie` value that starts (or replaces) the session for `user`.
    pub fn set_cookie(&self, user: &SessionUser) -> anyhow::Result<String> {
        let token = self.sign(user)?;
        Ok(cookies::set(SESSION_COOKIE, token, self.ttl, self.secure))
    }

    /// Session of the request, if it carries a valid token.
    pub fn read(&self, parts: &Parts) -> Option<SessionUser> {
        let token = cookies::read(&parts.headers, SESSION_COOKIE)?;
        match self.verify(&token) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "invalid or expired session");
                None
            }
        }
    }
}

/// `Set-Cookie` value that ends the session.
pub fn clear_cookie() -> String {
    cookies::removal(SESSION_COOKIE)
}

/// Session user when logged in, `None` otherwise.
pub struct MaybeUser(pub Option<SessionUser>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(SessionKeys::from_ref(state).read(parts)))
    }
}

/// Session user of a route that requires login. Without a session the
/// request is redirected to the login page with a prompt.
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        match keys.read(parts) {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                debug!(path = %parts.uri.path(), "login required");
                Err(flash::redirect_with(Notice::LoginRequired, "/login", keys.secure))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request, StatusCode};

    fn alice() -> SessionUser {
        SessionUser {
            id: 7,
            username: "alice".into(),
            email: "alice@example.com".into(),
            full_name: Some("Alice".into()),
            bio: None,
        }
    }

    fn parts_with_cookie(cookie: &str) -> Parts {
        Request::builder()
            .uri("/profile")
            .header(header::COOKIE, cookie)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn sign_and_verify_session() {
        let state = AppState::in_memory().await;
        let keys = SessionKeys::from_ref(&state);
        let token = keys.sign(&alice()).expect("sign");
        assert_eq!(keys.verify(&token).expect("verify"), alice());
    }

    #[tokio::test]
    async fn verify_rejects_foreign_secret_and_tampering() {
        let state = AppState::in_memory().await;
        let keys = SessionKeys::from_ref(&state);
        let mut other = keys.clone();
        other.encoding = EncodingKey::from_secret(b"another-secret");
        let forged = other.sign(&alice()).unwrap();
        assert!(keys.verify(&forged).is_err());

        let mut token = keys.sign(&alice()).unwrap();
        token.push('x');
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn claims_carry_public_fields_only() {
        let state = AppState::in_memory().await;
        let keys = SessionKeys::from_ref(&state);
        let token = keys.sign(&alice()).unwrap();
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&keys.audience));
        let data = decode::<serde_json::Value>(&token, &keys.decoding, &validation).unwrap();
        let user = data.claims["user"].as_object().unwrap();
        let mut keys_seen: Vec<_> = user.keys().map(String::as_str).collect();
        keys_seen.sort();
        assert_eq!(keys_seen, ["bio", "email", "full_name", "id", "username"]);
    }

    #[tokio::test]
    async fn largest_accepted_profile_fits_in_one_cookie() {
        use crate::auth::services::{MAX_BIO_LEN, MAX_EMAIL_LEN, MAX_FULL_NAME_LEN, MAX_USERNAME_LEN};

        let state = AppState::in_memory().await;
        let keys = SessionKeys::from_ref(&state);
        // Quotes double in size once the claims are JSON encoded.
        let user = SessionUser {
            id: i64::MAX,
            username: "\"".repeat(MAX_USERNAME_LEN),
            email: "\"".repeat(MAX_EMAIL_LEN),
            full_name: Some("\"".repeat(MAX_FULL_NAME_LEN)),
            bio: Some("\"".repeat(MAX_BIO_LEN)),
        };
        let cookie = keys.set_cookie(&user).unwrap();
        assert!(cookie.len() < 4096, "session cookie is {} bytes", cookie.len());
        assert_eq!(keys.verify(&keys.sign(&user).unwrap()).unwrap(), user);
    }

    #[tokio::test]
    async fn current_user_from_cookie() {
        let state = AppState::in_memory().await;
        let token = SessionKeys::from_ref(&state).sign(&alice()).unwrap();
        let mut parts = parts_with_cookie(&format!("{}={}", SESSION_COOKIE, token));
        let Ok(CurrentUser(user)) = CurrentUser::from_request_parts(&mut parts, &state).await
        else {
            panic!("session should be accepted");
        };
        assert_eq!(user, alice());
    }

    #[tokio::test]
    async fn missing_session_redirects_to_login() {
        let state = AppState::in_memory().await;
        let mut parts = parts_with_cookie("session=garbage");
        let Err(res) = CurrentUser::from_request_parts(&mut parts, &state).await else {
            panic!("garbage session must be rejected");
        };
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/login");

        let MaybeUser(user) = MaybeUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(user.is_none());
    }
}
