//! HTTP client for a GoTrue-style auth API with a PostgREST-style user table.
//!
//! # Responsibility
//! - Implement [`IdentityBackend`] and [`UserDirectory`] over blocking HTTP.
//! - Map backend status codes onto [`AuthError`] variants.
//!
//! # Invariants
//! - Every request carries the project `apikey` header.
//! - User-scoped calls authenticate with the session's bearer token.

use crate::auth::hosted::{HostedSession, HostedUser, IdentityBackend, UserDirectory};
use crate::auth::{AuthError, AuthResult};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking REST implementation of the hosted backend.
pub struct RestIdentityBackend {
    client: Client,
    base_url: String,
    api_key: String,
    users_table: String,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    access_token: Option<String>,
    user: Option<HostedUser>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: HostedUser,
}

/// How the backend answered a token-scoped call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenStatus {
    Accepted,
    /// Token expired, revoked or unknown.
    Rejected,
    Failed,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl RestIdentityBackend {
    /// Builds a client for the project at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        users_table: impl Into<String>,
    ) -> AuthResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            users_table: users_table.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("apikey", &self.api_key)
    }

    fn password_body(email: &str, password: &str) -> serde_json::Value {
        serde_json::json!({ "email": email, "password": password })
    }
}

impl IdentityBackend for RestIdentityBackend {
    fn sign_up(&self, email: &str, password: &str) -> AuthResult<HostedSession> {
        let response = self
            .request(Method::POST, "/auth/v1/signup")
            .bearer_auth(&self.api_key)
            .json(&Self::password_body(email, password))
            .send()?;
        debug!("event=http module=auth op=sign_up status={}", response.status());

        if !response.status().is_success() {
            let (status, message) = read_failure(response);
            return Err(classify_sign_up_failure(status, message, email));
        }
        parse_sign_up(&response.text()?, email)
    }

    fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<HostedSession> {
        let response = self
            .request(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", "password")])
            .bearer_auth(&self.api_key)
            .json(&Self::password_body(email, password))
            .send()?;
        debug!("event=http module=auth op=sign_in status={}", response.status());

        if !response.status().is_success() {
            let (status, message) = read_failure(response);
            return Err(classify_sign_in_failure(status, message));
        }
        let token: TokenResponse = response.json()?;
        Ok(HostedSession {
            access_token: token.access_token,
            user: token.user,
        })
    }

    fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let response = self
            .request(Method::POST, "/auth/v1/logout")
            .bearer_auth(access_token)
            .send()?;
        debug!("event=http module=auth op=sign_out status={}", response.status());

        match classify_sign_out(response.status().as_u16()) {
            TokenStatus::Accepted | TokenStatus::Rejected => Ok(()),
            TokenStatus::Failed => {
                let (status, message) = read_failure(response);
                Err(AuthError::Backend { status, message })
            }
        }
    }

    fn get_user(&self, access_token: &str) -> AuthResult<Option<HostedUser>> {
        let response = self
            .request(Method::GET, "/auth/v1/user")
            .bearer_auth(access_token)
            .send()?;
        debug!("event=http module=auth op=get_user status={}", response.status());

        match classify_get_user(response.status().as_u16()) {
            TokenStatus::Accepted => Ok(Some(response.json()?)),
            TokenStatus::Rejected => Ok(None),
            TokenStatus::Failed => {
                let (status, message) = read_failure(response);
                Err(AuthError::Backend { status, message })
            }
        }
    }
}

impl UserDirectory for RestIdentityBackend {
    fn user_record_exists(&self, access_token: &str, user_id: &str) -> AuthResult<bool> {
        let response = self
            .request(Method::GET, &format!("/rest/v1/{}", self.users_table))
            .query(&[("id", format!("eq.{user_id}")), ("select", "id".to_string())])
            .bearer_auth(access_token)
            .send()?;

        if !response.status().is_success() {
            let (status, message) = read_failure(response);
            return Err(AuthError::Backend { status, message });
        }
        let rows: Vec<serde_json::Value> = response.json()?;
        Ok(!rows.is_empty())
    }

    fn insert_user_record(&self, access_token: &str, user: &HostedUser) -> AuthResult<()> {
        let response = self
            .request(Method::POST, &format!("/rest/v1/{}", self.users_table))
            .header("Prefer", "return=minimal")
            .bearer_auth(access_token)
            .json(user)
            .send()?;

        match response.status().as_u16() {
            200..=299 => Ok(()),
            // Inserted concurrently by another client.
            409 => Ok(()),
            _ => {
                let (status, message) = read_failure(response);
                Err(AuthError::Backend { status, message })
            }
        }
    }
}

fn read_failure(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    (status, extract_error_message(&body))
}

fn extract_error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

fn classify_sign_out(status: u16) -> TokenStatus {
    match status {
        200..=299 => TokenStatus::Accepted,
        // A revoked or expired token has nothing left to sign out.
        401 | 403 | 404 => TokenStatus::Rejected,
        _ => TokenStatus::Failed,
    }
}

fn classify_get_user(status: u16) -> TokenStatus {
    match status {
        200..=299 => TokenStatus::Accepted,
        401 | 403 => TokenStatus::Rejected,
        _ => TokenStatus::Failed,
    }
}

fn classify_sign_in_failure(status: u16, message: String) -> AuthError {
    match status {
        400 | 401 => AuthError::InvalidCredentials,
        _ => AuthError::Backend { status, message },
    }
}

fn classify_sign_up_failure(status: u16, message: String, email: &str) -> AuthError {
    if status == 422 || message.to_ascii_lowercase().contains("already registered") {
        AuthError::AccountExists(email.to_string())
    } else {
        AuthError::Backend { status, message }
    }
}

fn parse_sign_up(body: &str, email: &str) -> AuthResult<HostedSession> {
    let parsed: SignUpResponse =
        serde_json::from_str(body).map_err(|err| AuthError::Backend {
            status: 200,
            message: format!("unexpected sign-up response: {err}"),
        })?;

    match (parsed.access_token, parsed.user) {
        (Some(access_token), Some(user)) => Ok(HostedSession { access_token, user }),
        _ => Err(AuthError::ConfirmationRequired(
            parsed.email.unwrap_or_else(|| email.to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let backend = RestIdentityBackend::new("https://example.test/", "key", "users").unwrap();
        assert_eq!(
            backend.url("/auth/v1/user"),
            "https://example.test/auth/v1/user"
        );
    }

    #[test]
    fn error_message_prefers_known_fields() {
        assert_eq!(
            extract_error_message(r#"{"code":400,"msg":"User already registered"}"#),
            "User already registered"
        );
        assert_eq!(
            extract_error_message(
                r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#
            ),
            "Invalid login credentials"
        );
        assert_eq!(extract_error_message("  gateway timeout "), "gateway timeout");
    }

    #[test]
    fn sign_in_bad_request_means_invalid_credentials() {
        assert!(matches!(
            classify_sign_in_failure(400, "Invalid login credentials".into()),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            classify_sign_in_failure(500, "boom".into()),
            AuthError::Backend { status: 500, .. }
        ));
    }

    #[test]
    fn get_user_treats_unauthorized_as_signed_out() {
        assert_eq!(classify_get_user(200), TokenStatus::Accepted);
        assert_eq!(classify_get_user(401), TokenStatus::Rejected);
        assert_eq!(classify_get_user(403), TokenStatus::Rejected);
        assert_eq!(classify_get_user(404), TokenStatus::Failed);
        assert_eq!(classify_get_user(500), TokenStatus::Failed);
    }

    #[test]
    fn sign_out_tolerates_dead_tokens() {
        assert_eq!(classify_sign_out(204), TokenStatus::Accepted);
        for status in [401, 403, 404] {
            assert_eq!(classify_sign_out(status), TokenStatus::Rejected);
        }
        assert_eq!(classify_sign_out(502), TokenStatus::Failed);
    }

    #[test]
    fn sign_up_duplicate_maps_to_account_exists() {
        assert!(matches!(
            classify_sign_up_failure(422, "email_exists".into(), "a@example.com"),
            AuthError::AccountExists(email) if email == "a@example.com"
        ));
        assert!(matches!(
            classify_sign_up_failure(400, "User already registered".into(), "a@example.com"),
            AuthError::AccountExists(_)
        ));
        assert!(matches!(
            classify_sign_up_failure(429, "rate limited".into(), "a@example.com"),
            AuthError::Backend { status: 429, .. }
        ));
    }

    #[test]
    fn sign_up_with_session_yields_hosted_session() {
        let body = r#"{
            "access_token": "tok",
            "token_type": "bearer",
            "user": { "id": "u-1", "email": "a@example.com", "role": "authenticated" }
        }"#;
        let hosted = parse_sign_up(body, "a@example.com").unwrap();
        assert_eq!(hosted.access_token, "tok");
        assert_eq!(hosted.user.id, "u-1");
    }

    #[test]
    fn sign_up_without_session_requires_confirmation() {
        let body = r#"{ "id": "u-1", "email": "a@example.com", "confirmation_sent_at": "2024-01-01T00:00:00Z" }"#;
        let err = parse_sign_up(body, "a@example.com").unwrap_err();
        assert!(matches!(err, AuthError::ConfirmationRequired(email) if email == "a@example.com"));
    }
}
