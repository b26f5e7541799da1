//! Route handlers.
//!
//! Argon2 work runs on the blocking pool; everything else is in-memory.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;

use crate::access::{available_choices, check_access, MenuChoice};
use crate::error::PortalError;
use crate::http::response::{self, MSG_EXIT, MSG_NOT_AUTHORIZED, MSG_USER_CREATED};
use crate::http::server::AppState;

/// Body of the login and registration forms.
#[derive(Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// Run blocking hashing work, flattening a panicked task into an internal error.
async fn blocking<T, F>(f: F) -> Result<T, PortalError>
where
    F: FnOnce() -> Result<T, PortalError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PortalError::Hashing(format!("hashing task failed: {}", e)))?
}

pub async fn login_form(State(state): State<AppState>) -> Response {
    if state.lockout.is_globally_locked() {
        return PortalError::Locked.into_response();
    }
    response::login_page(None).into_response()
}

pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Redirect, PortalError> {
    let lockout = state.lockout.clone();
    let authenticator = state.authenticator.clone();
    let username = form.username.clone();

    blocking(move || {
        lockout.guarded_attempt(&form.username, || {
            authenticator.login(&form.username, &form.password)
        })
    })
    .await?;

    tracing::info!(username = %username, "Login succeeded");
    // Only stored usernames can log in, and those are URL-safe.
    Ok(Redirect::to(&format!("/menu/{}", username)))
}

pub async fn new_user_form() -> Response {
    response::new_user_page(None).into_response()
}

pub async fn new_user_submit(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, PortalError> {
    let authenticator = state.authenticator.clone();
    let role = state.default_role;

    blocking(move || authenticator.register(&form.username, &form.password, role)).await?;

    Ok((StatusCode::CREATED, response::login_page(Some(MSG_USER_CREATED))).into_response())
}

pub async fn menu(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response, PortalError> {
    let role = state.authenticator.store().get_role(&username)?;
    let choices = available_choices(role);
    Ok(response::menu_page(&username, &choices).into_response())
}

pub async fn menu_option(
    State(state): State<AppState>,
    Path((username, choice)): Path<(String, u32)>,
) -> Response {
    let choice = MenuChoice::from(choice);

    let allowed = match state.authenticator.store().get_role(&username) {
        Ok(role) => check_access(role, choice),
        Err(e) => {
            tracing::warn!(error = %e, choice = %choice, "Menu access for unknown user denied");
            false
        }
    };

    if allowed {
        (StatusCode::OK, choice.content()).into_response()
    } else {
        (StatusCode::FORBIDDEN, MSG_NOT_AUTHORIZED).into_response()
    }
}

pub async fn exit() -> &'static str {
    MSG_EXIT
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "users": state.authenticator.store().len(),
    }))
}
