use crate::domain::Backend;
use crate::remote::RemoteClient;
use crate::session::Credentials;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TokenResponse {
    access_token: Option<String>,
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

/// Exchanges a username and password for tokens at the management API.
#[instrument(skip(client, password))]
pub async fn login(client: &RemoteClient, username: &str, password: &str) -> Result<Credentials, LoginError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(LoginError::MissingInput);
    }

    info!("🔑 Signing in...");
    let response = client
        .http()
        .post(client.url(Backend::Management, "auth/login"))
        .json(&LoginRequest { username, password })
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    // Error replies are not guaranteed to be JSON
    let data = serde_json::from_str::<Value>(&body).unwrap_or(Value::Null);

    if !status.is_success() {
        let message = ["message", "error", "error_description"]
            .iter()
            .find_map(|key| data.get(key).and_then(Value::as_str))
            .unwrap_or("authentication failed")
            .to_string();
        warn!(status_code = %status, "🔑 Signing in... failed, {}", message);
        return Err(LoginError::Rejected(message));
    }

    let tokens = data.get("AuthenticationResult").cloned().unwrap_or(data);
    let tokens: TokenResponse = serde_json::from_value(tokens)?;
    let access_token = tokens.access_token.ok_or(LoginError::MissingToken)?;

    info!("🔑 Signing in... OK");
    Ok(Credentials {
        access_token,
        id_token: tokens.id_token,
        refresh_token: tokens.refresh_token,
        expires_at: tokens.expires_in.map(|seconds| Utc::now() + Duration::seconds(seconds)),
    })
}

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("enter e-mail and password")]
    MissingInput,
    #[error("{0}")]
    Rejected(String),
    #[error("the identity provider did not issue an access token")]
    MissingToken,
    #[error("unable to reach the server: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected token response: {0}")]
    Decode(#[from] serde_json::Error),
}
