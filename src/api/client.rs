//! Authenticated session against the Story Spoiler service

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method};

use crate::common::{Error, Result};

use super::types::{
    self, ApiResponse, AuthResponse, Credentials, StoryDraft, AUTHENTICATION, STORY_ALL,
    STORY_CREATE,
};

/// HTTP client bound to a base URL that sends a bearer token on every call
pub struct Session {
    http: Client,
    base_url: String,
}

impl Session {
    /// Exchange credentials for a token and build the shared client
    ///
    /// Fails when the service rejects the credentials, answers with something
    /// other than JSON, or does not return a non-empty `accessToken`.
    pub async fn bootstrap(
        base_url: &str,
        credentials: &Credentials,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let token = fetch_token(&base_url, credentials, timeout).await?;

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            Error::InvalidResponse {
                endpoint: AUTHENTICATION.to_string(),
                message: "accessToken is not a valid header value".to_string(),
            }
        })?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let http = builder(timeout).default_headers(headers).build()?;

        tracing::info!("Authenticated as '{}' against {}", credentials.username, base_url);

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn create_story(&self, story: &StoryDraft) -> Result<ApiResponse> {
        self.send(Method::POST, STORY_CREATE, Some(story)).await
    }

    pub async fn edit_story(&self, id: &str, story: &StoryDraft) -> Result<ApiResponse> {
        self.send(Method::PUT, &types::story_edit(id), Some(story)).await
    }

    pub async fn list_stories(&self) -> Result<ApiResponse> {
        self.send(Method::GET, STORY_ALL, None).await
    }

    pub async fn delete_story(&self, id: &str) -> Result<ApiResponse> {
        self.send(Method::DELETE, &types::story_delete(id), None).await
    }

    /// Release the client and its pooled connections
    pub fn close(self) {
        tracing::info!("Closing session for {}", self.base_url);
        drop(self.http);
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&StoryDraft>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(story) = body {
            tracing::debug!("Request body: {}", serde_json::to_string(story)?);
            request = request.json(story);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(path, e))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(path, e))?;

        tracing::debug!("Response {}: {}", status, text);

        Ok(ApiResponse::new(path, status, text))
    }
}

fn builder(timeout: Option<Duration>) -> reqwest::ClientBuilder {
    let builder =
        Client::builder().user_agent(concat!("spoiler-check/", env!("CARGO_PKG_VERSION")));
    match timeout {
        Some(t) => builder.timeout(t),
        None => builder,
    }
}

/// Validate the base URL and strip any trailing slash
fn normalize_base_url(base_url: &str) -> Result<String> {
    let parsed =
        reqwest::Url::parse(base_url).map_err(|_| Error::InvalidBaseUrl(base_url.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidBaseUrl(base_url.to_string()));
    }
    Ok(base_url.trim_end_matches('/').to_string())
}

async fn fetch_token(
    base_url: &str,
    credentials: &Credentials,
    timeout: Option<Duration>,
) -> Result<String> {
    // Separate client: the login call must not carry an Authorization header
    let login = builder(timeout).build()?;
    let url = format!("{}{}", base_url, AUTHENTICATION);

    let response = login
        .post(&url)
        .json(credentials)
        .send()
        .await
        .map_err(|e| Error::transport(AUTHENTICATION, e))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| Error::transport(AUTHENTICATION, e))?;

    if !status.is_success() {
        return Err(Error::AuthenticationFailed {
            status: status.as_u16(),
            message: text,
        });
    }

    let auth: AuthResponse =
        serde_json::from_str(&text).map_err(|e| Error::AuthenticationFailed {
            status: status.as_u16(),
            message: format!("response is not JSON ({})", e),
        })?;

    match auth.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::MissingAccessToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://example.com/").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8080").unwrap(),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(Error::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(Error::InvalidBaseUrl(_))
        ));
    }
}
