//! Session-based authentication module.
//!
//! Sessions live in an in-process map keyed by a random id; the cookie value
//! is `<id>.<hmac-sha256-hex>` so a tampered id fails verification before any
//! lookup. A restart drops the map and logs everyone out.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::distr::{Alphanumeric, SampleString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use crate::errors::ErrorBody;

/// Cookie carrying the signed session id.
pub const SESSION_COOKIE: &str = "reef_session";

/// Sessions expire this long after login, with no sliding renewal.
const SESSION_TTL_HOURS: i64 = 24;

const SESSION_ID_LEN: usize = 64;

type HmacSha256 = Hmac<Sha256>;

/// Role attached to a session. Computed once at login; nothing else in the
/// codebase compares emails against the configured admin address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Exact, case-sensitive match against the configured admin email.
    pub fn for_email(email: &str, admin_email: Option<&str>) -> Role {
        match admin_email {
            Some(admin) if admin == email => Role::Admin,
            _ => Role::Member,
        }
    }
}

/// One logged-in session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// In-process session store.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    secret: String,
}

impl SessionStore {
    pub fn new(secret: String) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            secret,
        }
    }

    /// Create a session and return the value to set as the cookie.
    pub async fn create(&self, user_id: &str, email: &str, role: Role) -> String {
        let id = Alphanumeric.sample_string(&mut rand::rng(), SESSION_ID_LEN);
        let session = Session {
            user_id: user_id.to_string(),
            email: email.to_string(),
            role,
            expires_at: Utc::now() + Duration::hours(SESSION_TTL_HOURS),
        };
        self.sessions.write().await.insert(id.clone(), session);
        let signature = self.sign(&id);
        format!("{}.{}", id, signature)
    }

    /// Resolve a cookie value to a live session. Expired sessions are evicted
    /// on the way out.
    pub async fn resolve(&self, cookie_value: &str) -> Option<Session> {
        let id = self.verify(cookie_value)?;
        let mut sessions = self.sessions.write().await;
        match sessions.get(&id) {
            Some(session) if session.expires_at > Utc::now() => Some(session.clone()),
            Some(_) => {
                sessions.remove(&id);
                None
            }
            None => None,
        }
    }

    /// Drop the session behind a cookie value. No-op for unknown or tampered
    /// cookies, so logout stays idempotent.
    pub async fn destroy(&self, cookie_value: &str) {
        if let Some(id) = self.verify(cookie_value) {
            self.sessions.write().await.remove(&id);
        }
    }

    /// Resolve the session referenced by the request's cookie header, if any.
    pub async fn from_headers(&self, headers: &HeaderMap) -> Option<Session> {
        let cookie_value = cookie_from_headers(headers, SESSION_COOKIE)?;
        self.resolve(&cookie_value).await
    }

    fn sign(&self, id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Check the cookie signature and return the bare session id.
    fn verify(&self, cookie_value: &str) -> Option<String> {
        let (id, signature) = cookie_value.split_once('.')?;
        let expected = self.sign(id);
        if constant_time_compare(signature, &expected) {
            Some(id.to_string())
        } else {
            None
        }
    }
}

/// Build the Set-Cookie value for a fresh session.
pub fn session_cookie(value: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        value,
        SESSION_TTL_HOURS * 3600
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Pull one cookie value out of the Cookie header.
pub fn cookie_from_headers(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=') {
            if key == name {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Perform constant-time string comparison.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}

/// Gate for the admin API: any request without an admin session is turned
/// away before the handler runs.
pub async fn require_admin(sessions: Arc<SessionStore>, request: Request, next: Next) -> Response {
    match sessions.from_headers(request.headers()).await {
        Some(session) if session.is_admin() => next.run(request).await,
        Some(_) => unauthorized_response("Admin access required"),
        None => unauthorized_response("Authentication required"),
    }
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: message.to_string(),
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_role_requires_exact_email_match() {
        assert_eq!(
            Role::for_email("admin@reef.test", Some("admin@reef.test")),
            Role::Admin
        );
        assert_eq!(
            Role::for_email("Admin@reef.test", Some("admin@reef.test")),
            Role::Member
        );
        assert_eq!(
            Role::for_email("other@reef.test", Some("admin@reef.test")),
            Role::Member
        );
        assert_eq!(Role::for_email("admin@reef.test", None), Role::Member);
    }

    #[tokio::test]
    async fn test_session_roundtrip() {
        let store = SessionStore::new("secret".to_string());
        let cookie = store.create("u1", "user@reef.test", Role::Member).await;

        let session = store.resolve(&cookie).await.unwrap();
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.email, "user@reef.test");
        assert!(!session.is_admin());

        store.destroy(&cookie).await;
        assert!(store.resolve(&cookie).await.is_none());
    }

    #[tokio::test]
    async fn test_tampered_cookie_rejected() {
        let store = SessionStore::new("secret".to_string());
        let cookie = store.create("u1", "user@reef.test", Role::Admin).await;

        let (id, signature) = cookie.split_once('.').unwrap();
        let mut forged_id = id.to_string();
        forged_id.replace_range(0..1, if id.starts_with('a') { "b" } else { "a" });

        assert!(store
            .resolve(&format!("{}.{}", forged_id, signature))
            .await
            .is_none());
        assert!(store.resolve(id).await.is_none());
        assert!(store.resolve("not-a-cookie").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_evicted() {
        let store = SessionStore::new("secret".to_string());
        let cookie = store.create("u1", "user@reef.test", Role::Member).await;

        let (id, _) = cookie.split_once('.').unwrap();
        store
            .sessions
            .write()
            .await
            .get_mut(id)
            .unwrap()
            .expires_at = Utc::now() - Duration::minutes(1);

        assert!(store.resolve(&cookie).await.is_none());
        assert!(store.sessions.read().await.is_empty());
    }

    #[test]
    fn test_cookie_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("other=1; reef_session=abc.def; theme=dark"),
        );

        assert_eq!(
            cookie_from_headers(&headers, SESSION_COOKIE).as_deref(),
            Some("abc.def")
        );
        assert!(cookie_from_headers(&headers, "missing").is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc.def", false);
        assert!(cookie.starts_with("reef_session=abc.def;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(!cookie.contains("Secure"));

        assert!(session_cookie("abc.def", true).contains("Secure"));
        assert!(clear_session_cookie(false).contains("Max-Age=0"));
    }
}
