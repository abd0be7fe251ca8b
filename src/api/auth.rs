//! Authentication handlers: register, login, logout, session probe and
//! account recovery.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use chrono::Utc;
use rand::distr::{Alphanumeric, SampleString};
use serde::Serialize;
use tokio::task;
use uuid::Uuid;

use super::{required, Ack, ApiResult};
use crate::auth::{
    clear_session_cookie, cookie_from_headers, session_cookie, Role, SESSION_COOKIE,
};
use crate::errors::AppError;
use crate::gateway::Notification;
use crate::models::{LoginRequest, RecoverAccountRequest, RegisterRequest, SessionUser, User};
use crate::AppState;

const MIN_PASSWORD_LEN: usize = 6;
const RECOVERY_PASSWORD_LEN: usize = 12;

/// Login acknowledgement: `{"success": true, "user": {...}}`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: SessionUser,
}

/// POST /api/register - Create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Ack> {
    let email = required(request.email, "Email and password are required")?;
    let password = required(request.password, "Email and password are required")?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let hash =
        task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST)).await??;

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.clone(),
        password: hash,
        created_at: Utc::now().to_rfc3339(),
        reset_at: None,
    };
    state.repos.users.insert(user).await?;

    state.notifier.enqueue(Notification::ContactSync {
        email,
        first_name: request.first_name,
    });

    Ok(Ack::ok())
}

/// POST /api/login - Authenticate and open a session.
///
/// Unknown email and wrong password produce the same response, so the
/// endpoint does not reveal which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = required(request.email, "Email and password are required")?;
    let password = required(request.password, "Email and password are required")?;

    let user = state
        .repos
        .users
        .find(|u| u.email == email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let stored_hash = user.password.clone();
    let verified =
        task::spawn_blocking(move || bcrypt::verify(password, &stored_hash).unwrap_or(false))
            .await?;
    if !verified {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let role = Role::for_email(&user.email, state.config.admin_email.as_deref());
    let cookie_value = state.sessions.create(&user.id, &user.email, role).await;
    let cookie = session_cookie(&cookie_value, state.config.cookie_secure());

    let body = LoginResponse {
        success: true,
        user: SessionUser {
            id: user.id,
            email: user.email,
            is_admin: role == Role::Admin,
        },
    };
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(body)))
}

/// POST /api/logout - Drop the session. Succeeds whether or not one exists.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(cookie_value) = cookie_from_headers(&headers, SESSION_COOKIE) {
        state.sessions.destroy(&cookie_value).await;
    }
    let cookie = clear_session_cookie(state.config.cookie_secure());
    (AppendHeaders([(SET_COOKIE, cookie)]), Ack::ok())
}

/// GET /api/user - Identity probe for the logged-in session.
pub async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionUser>> {
    let session = state
        .sessions
        .from_headers(&headers)
        .await
        .ok_or_else(|| AppError::Unauthorized("Not logged in".to_string()))?;

    let is_admin = session.is_admin();
    Ok(Json(SessionUser {
        id: session.user_id,
        email: session.email,
        is_admin,
    }))
}

/// POST /api/recoverAccount - Replace a forgotten password and mail it out.
pub async fn recover_account(
    State(state): State<AppState>,
    Json(request): Json<RecoverAccountRequest>,
) -> ApiResult<Ack> {
    let email = required(request.email, "Email is required")?;

    let user = state
        .repos
        .users
        .find(|u| u.email == email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let new_password = Alphanumeric.sample_string(&mut rand::rng(), RECOVERY_PASSWORD_LEN);
    let to_hash = new_password.clone();
    let hash = task::spawn_blocking(move || bcrypt::hash(to_hash, bcrypt::DEFAULT_COST)).await??;

    // Mail first: if the relay is down the old password must stay valid
    state
        .mailer
        .send_password_reset(&user.email, &new_password)
        .await?;

    state
        .repos
        .users
        .update(&user.id, |u| {
            u.password = hash;
            u.reset_at = Some(Utc::now().to_rfc3339());
        })
        .await?;

    Ok(Ack::ok())
}
