//! Response rendering and error mapping.
//!
//! # Responsibilities
//! - Render the minimal login, registration and menu pages
//! - Map `PortalError` to a status code and a fixed user-facing message
//!
//! # Design Decisions
//! - No error detail reaches the client; internal failures log and return 500
//! - Pages never echo raw request input

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::access::MenuChoice;
use crate::error::PortalError;

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const MSG_LOCKED: &str = "You are locked from the system for too many attempts";
pub const MSG_USERNAME_TAKEN: &str = "Username not available";
pub const MSG_WEAK_PASSWORD: &str = "Password not complex enough";
pub const MSG_INVALID_USERNAME: &str = "Invalid username";
pub const MSG_USER_CREATED: &str = "User successfully created";
pub const MSG_NOT_AUTHORIZED: &str = "You are not authorized to access this area";
pub const MSG_USER_NOT_FOUND: &str = "User not found";
pub const MSG_EXIT: &str = "Exiting the system";
pub const MSG_INTERNAL: &str = "Internal error";

fn credentials_form(title: &str, action: &str, message: Option<&str>, footer: &str) -> Html<String> {
    let message = message
        .map(|m| format!("<p class=\"message\">{}</p>\n", m))
        .unwrap_or_default();
    Html(format!(
        "<!DOCTYPE html>\n<html><head><title>{title}</title></head><body>\n\
         <h1>{title}</h1>\n{message}\
         <form method=\"post\" action=\"{action}\">\n\
         <label>Username <input name=\"username\" required></label>\n\
         <label>Password <input name=\"password\" type=\"password\" required></label>\n\
         <button type=\"submit\">{title}</button>\n</form>\n{footer}\n</body></html>\n"
    ))
}

pub fn login_page(message: Option<&str>) -> Html<String> {
    credentials_form("Login", "/", message, "<a href=\"/new_user\">Create an account</a>")
}

pub fn new_user_page(message: Option<&str>) -> Html<String> {
    credentials_form("Create Account", "/new_user", message, "<a href=\"/\">Back to login</a>")
}

/// Menu listing only the areas the user may open. `username` must already be
/// validated (it is embedded in links).
pub fn menu_page(username: &str, choices: &[MenuChoice]) -> Html<String> {
    let items: String = choices
        .iter()
        .map(|c| {
            format!(
                "<li><a href=\"/menu_option/{}/{}\">{}. {}</a></li>\n",
                username,
                c.number(),
                c.number(),
                c.label()
            )
        })
        .collect();
    Html(format!(
        "<!DOCTYPE html>\n<html><head><title>Menu</title></head><body>\n\
         <h1>Welcome, {username}</h1>\n<ul>\n{items}</ul>\n</body></html>\n"
    ))
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        match self {
            PortalError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, login_page(Some(MSG_INVALID_CREDENTIALS))).into_response()
            }
            PortalError::Locked => (StatusCode::TOO_MANY_REQUESTS, MSG_LOCKED).into_response(),
            PortalError::AlreadyExists(_) => {
                (StatusCode::CONFLICT, new_user_page(Some(MSG_USERNAME_TAKEN))).into_response()
            }
            PortalError::PolicyViolation => {
                (StatusCode::UNPROCESSABLE_ENTITY, new_user_page(Some(MSG_WEAK_PASSWORD))).into_response()
            }
            PortalError::InvalidUsername(_) => {
                (StatusCode::BAD_REQUEST, new_user_page(Some(MSG_INVALID_USERNAME))).into_response()
            }
            PortalError::NotFound(_) => (StatusCode::NOT_FOUND, MSG_USER_NOT_FOUND).into_response(),
            PortalError::SourceUnavailable(_)
            | PortalError::Hashing(_)
            | PortalError::Storage(_)
            | PortalError::Config(_) => {
                tracing::error!(error = %self, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (PortalError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (PortalError::Locked, StatusCode::TOO_MANY_REQUESTS),
            (PortalError::AlreadyExists("a".into()), StatusCode::CONFLICT),
            (PortalError::PolicyViolation, StatusCode::UNPROCESSABLE_ENTITY),
            (PortalError::InvalidUsername("a b".into()), StatusCode::BAD_REQUEST),
            (PortalError::NotFound("a".into()), StatusCode::NOT_FOUND),
            (PortalError::Storage("disk full".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (PortalError::Config("bad role".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_menu_page_links() {
        let Html(body) = menu_page("alice", &[MenuChoice::TimeReporting, MenuChoice::Exit]);
        assert!(body.contains("/menu_option/alice/1"));
        assert!(body.contains("/menu_option/alice/5"));
        assert!(!body.contains("Accounting"));
    }

    #[test]
    fn test_login_page_message() {
        let Html(body) = login_page(Some(MSG_INVALID_CREDENTIALS));
        assert!(body.contains(MSG_INVALID_CREDENTIALS));
        let Html(body) = login_page(None);
        assert!(!body.contains("class=\"message\""));
    }
}
