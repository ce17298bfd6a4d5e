use anyhow::anyhow;
use dioxus::logger::tracing;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::session::SessionUser;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Sign-up form. New accounts are always patients; staff accounts are
/// created by an admin.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    #[serde(default)]
    message: Option<String>,
    user: serde_json::Value,
}

impl UserResponse {
    fn into_user(self, action: &str) -> anyhow::Result<SessionUser> {
        tracing::debug!("{action}: {}", self.message.as_deref().unwrap_or("ok"));

        SessionUser::from_value(&self.user).ok_or_else(|| anyhow!("{action} response carried no user id"))
    }
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

// the backend answers 401 without a session cookie and 404 once the user row is gone
fn session_gone(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND)
}

async fn failure(response: reqwest::Response, action: &str) -> anyhow::Error {
    let status = response.status();

    match response.json::<ErrorResponse>().await {
        Ok(body) => anyhow!(body.error),
        Err(_) => anyhow!("{action} failed with status {status}"),
    }
}

/// Backend auth endpoints. The base may be absolute or relative to the page
/// origin.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: &'static str,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self { base_url: "/api" }
    }
}

impl ApiClient {
    pub fn with_base_url(mut self, s: &'static str) -> Self {
        self.base_url = s;
        self
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        let base = match Url::parse(self.base_url) {
            Ok(base) => base,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let Some(window) = web_sys::window() else {
                    anyhow::bail!("window not available");
                };

                let Ok(origin) = window.location().origin() else {
                    anyhow::bail!("location origin not available");
                };

                Url::parse(&origin)?.join(self.base_url)?
            }
            Err(err) => return Err(err.into()),
        };

        join_path(&base, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<SessionUser> {
        let url = self.endpoint("auth/login")?;

        let response = with_credentials(reqwest::Client::new().post(url))
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(failure(response, "login").await);
        }

        response.json::<UserResponse>().await?.into_user("login")
    }

    /// Creates a patient account. The backend does not open a session for
    /// it; callers log in afterwards.
    pub async fn register(&self, registration: &Registration) -> anyhow::Result<SessionUser> {
        let url = self.endpoint("auth/register")?;

        let response = with_credentials(reqwest::Client::new().post(url))
            .json(registration)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(failure(response, "registration").await);
        }

        response.json::<UserResponse>().await?.into_user("registration")
    }

    /// Current user as the backend sees it, or `None` when its session is
    /// gone and the local marker is stale.
    pub async fn me(&self) -> anyhow::Result<Option<SessionUser>> {
        let url = self.endpoint("auth/me")?;

        let response = with_credentials(reqwest::Client::new().get(url)).send().await?;

        if session_gone(response.status()) {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(failure(response, "profile refresh").await);
        }

        response.json::<UserResponse>().await?.into_user("profile refresh").map(Some)
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> anyhow::Result<String> {
        let url = self.endpoint("auth/change-password")?;

        let response = with_credentials(reqwest::Client::new().put(url))
            .json(&ChangePasswordRequest {
                current_password,
                new_password,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(failure(response, "password change").await);
        }

        Ok(response.json::<MessageResponse>().await?.message)
    }

    pub async fn logout(&self) -> anyhow::Result<()> {
        let url = self.endpoint("auth/logout")?;

        with_credentials(reqwest::Client::new().post(url))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

fn join_path(base: &Url, path: &str) -> anyhow::Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }

    Ok(base.join(path)?)
}

// the backend keeps its own cookie session next to the local marker
fn with_credentials(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    #[cfg(target_arch = "wasm32")]
    let builder = builder.fetch_credentials_include();

    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_base_joins_endpoints() {
        let client = ApiClient::default().with_base_url("http://localhost:5000/api");

        assert_eq!(
            client.endpoint("auth/login").unwrap().as_str(),
            "http://localhost:5000/api/auth/login"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_optional() {
        let base = Url::parse("https://clinic.test/api/").unwrap();

        assert_eq!(
            join_path(&base, "auth/logout").unwrap().as_str(),
            "https://clinic.test/api/auth/logout"
        );
    }

    #[test]
    fn login_response_exposes_typed_user() {
        let body: UserResponse = serde_json::from_str(
            r#"{"message":"Login successful","user":{"id":4,"name":"Ann","role":"admin","email":"a@b.c"}}"#,
        )
        .unwrap();

        let user = body.into_user("login").unwrap();
        assert_eq!(user.name.as_deref(), Some("Ann"));
        assert_eq!(user.role.dashboard(), crate::routing::RouteName::AdminDashboard);
    }

    #[test]
    fn user_payload_without_id_is_an_error() {
        let body: UserResponse = serde_json::from_str(r#"{"user":{"id":null,"name":"Ann"}}"#).unwrap();

        let err = body.into_user("registration").unwrap_err();
        assert_eq!(err.to_string(), "registration response carried no user id");
    }

    #[test]
    fn registration_serializes_backend_fields() {
        let registration = Registration {
            name: "Pat".to_owned(),
            email: "pat@clinic.test".to_owned(),
            password: "secret".to_owned(),
            phone: String::new(),
        };

        assert_eq!(
            serde_json::to_value(&registration).unwrap(),
            serde_json::json!({
                "name": "Pat",
                "email": "pat@clinic.test",
                "password": "secret",
                "phone": ""
            })
        );
    }

    #[test]
    fn change_password_request_uses_backend_names() {
        let body = ChangePasswordRequest {
            current_password: "old",
            new_password: "new",
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"current_password": "old", "new_password": "new"})
        );

        let reply: MessageResponse = serde_json::from_str(r#"{"message":"Password changed successfully"}"#).unwrap();
        assert_eq!(reply.message, "Password changed successfully");
    }

    #[test]
    fn stale_backend_session_statuses() {
        assert!(session_gone(StatusCode::UNAUTHORIZED));
        assert!(session_gone(StatusCode::NOT_FOUND));
        assert!(!session_gone(StatusCode::OK));
        assert!(!session_gone(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn error_body_carries_message() {
        let body: ErrorResponse = serde_json::from_str(r#"{"error":"Invalid email or password"}"#).unwrap();

        assert_eq!(body.error, "Invalid email or password");
    }
}
