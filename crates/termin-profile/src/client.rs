use crate::error::ProfileError;
use std::time::Duration;
use termin_types::{ApiErrorBody, ProfileRecord};

const PROFILE_PATH: &str = "/api/practice/profile";
const EXTENDED_PROFILE_PATH: &str = "/api/practice/profile/extended";

/// Timeout for a single profile request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("terminfinder/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

/// Client for the practice profile endpoints.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ProfileClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: build_http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sends `token` as a bearer token on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetches the practice profile of the signed-in doctor.
    pub async fn fetch(&self) -> Result<ProfileRecord, ProfileError> {
        let url = format!("{}{}", self.base_url, PROFILE_PATH);
        let response = self.authorize(self.http.get(&url)).send().await?;
        // The editor adds the "Fehler beim Laden" prefix itself.
        let response = check_status(response, "Unerwartete Antwort vom Server").await?;
        let body = response.bytes().await?;
        let record = serde_json::from_slice(&body)?;
        tracing::debug!(url = %url, "fetched practice profile");
        Ok(record)
    }

    /// Replaces the extended profile with `record`.
    pub async fn update(&self, record: &ProfileRecord) -> Result<(), ProfileError> {
        let url = format!("{}{}", self.base_url, EXTENDED_PROFILE_PATH);
        let response = self
            .authorize(self.http.put(&url))
            .json(record)
            .send()
            .await?;
        check_status(response, "Fehler beim Speichern").await?;
        tracing::debug!(url = %url, "updated practice profile");
        Ok(())
    }
}

/// Turns a non-OK response into `ProfileError::Api`, preferring the
/// backend's `{error}` message over `fallback`.
async fn check_status(
    response: reqwest::Response,
    fallback: &str,
) -> Result<reqwest::Response, ProfileError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| fallback.to_string());

    Err(ProfileError::Api {
        status: status.as_u16(),
        message,
    })
}
