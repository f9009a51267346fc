//! GitHub API client - HTTP client for the Code Scanning REST endpoints
//!
//! This module provides a thin client for the analyses endpoints:
//! - Listing and viewing Code Scanning analyses
//! - Uploading SARIF files
//! - Deleting analyses (raw responses, classified by the caller)

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    ACCEPT_GITHUB_JSON, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_GITHUB_HOST, DEFAULT_TIMEOUT_SECS,
    GITHUB_API_VERSION, USER_AGENT,
};

/// Authenticated client bound to one API base URL
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    token: String,
}

/// A Code Scanning analysis as returned by the analyses endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
    pub id: u64,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub commit_sha: String,
    pub analysis_key: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub error: String,
    pub created_at: String,
    #[serde(default)]
    pub results_count: u64,
    #[serde(default)]
    pub rules_count: u64,
    pub url: String,
    #[serde(default)]
    pub sarif_id: String,
    pub tool: AnalysisTool,
    #[serde(default)]
    pub deletable: bool,
    #[serde(default)]
    pub warning: String,
}

/// Tool block nested in an analysis
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisTool {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
}

impl AnalysisTool {
    /// Renders as `name@version` when the server reports a version.
    pub fn label(&self) -> String {
        match &self.version {
            Some(version) if !version.is_empty() => format!("{}@{}", self.name, version),
            _ => self.name.clone(),
        }
    }
}

/// Request body for the SARIF upload endpoint
#[derive(Debug, Serialize)]
pub struct SarifUploadRequest {
    pub commit_sha: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sarif: String,
    pub validate: bool,
}

/// Receipt returned by an accepted SARIF upload
#[derive(Debug, Deserialize)]
pub struct SarifUploadReceipt {
    pub id: String,
    pub url: String,
}

/// Error payload returned by the GitHub API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GitHubClient {
    /// Create a client for the given API base URL.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to create HTTP client")?;

        // A trailing slash keeps Url::join from clobbering the base path.
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url =
            Url::parse(&base).with_context(|| format!("invalid API base URL {base:?}"))?;

        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
        })
    }

    /// Resolve an endpoint path or absolute URL against the API base.
    pub fn resolve(&self, path_or_url: &str) -> Result<Url> {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            Url::parse(path_or_url).with_context(|| format!("invalid URL {path_or_url:?}"))
        } else {
            self.base_url
                .join(path_or_url.trim_start_matches('/'))
                .with_context(|| format!("invalid endpoint path {path_or_url:?}"))
        }
    }

    fn request(&self, method: Method, url: Url, accept: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, accept)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    /// GET an endpoint, returning the raw response body.
    pub async fn get(&self, path_or_url: &str) -> Result<String> {
        self.get_with_accept(path_or_url, ACCEPT_GITHUB_JSON).await
    }

    /// GET an endpoint with an explicit Accept header.
    pub async fn get_with_accept(&self, path_or_url: &str, accept: &str) -> Result<String> {
        let url = self.resolve(path_or_url)?;
        tracing::debug!("GET {url}");
        let response = self
            .request(Method::GET, url.clone(), accept)
            .send()
            .await
            .map_err(|e| request_error("GET", &url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read response body")?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(body)
    }

    /// POST a JSON body, returning the status and raw body of a 2xx response.
    pub async fn post_json<T: Serialize>(
        &self,
        path_or_url: &str,
        payload: &T,
    ) -> Result<(StatusCode, String)> {
        let url = self.resolve(path_or_url)?;
        tracing::debug!("POST {url}");
        let response = self
            .request(Method::POST, url.clone(), ACCEPT_GITHUB_JSON)
            .json(payload)
            .send()
            .await
            .map_err(|e| request_error("POST", &url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read response body")?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok((status, body))
    }

    /// DELETE a URL, returning the status and body without mapping
    /// non-success statuses to errors. Deletion endpoints report expected
    /// conditions through 400 and 404, so callers classify those.
    pub async fn delete_raw(&self, url: &Url) -> Result<(StatusCode, String)> {
        tracing::debug!("DELETE {url}");
        let response = self
            .request(Method::DELETE, url.clone(), ACCEPT_GITHUB_JSON)
            .send()
            .await
            .map_err(|e| request_error("DELETE", url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read response body")?;
        Ok((status, body))
    }
}

fn request_error(method: &str, url: &Url, err: reqwest::Error) -> anyhow::Error {
    anyhow::anyhow!(
        "{method} {url} failed: {err} (is_connect: {}, is_timeout: {})",
        err.is_connect(),
        err.is_timeout()
    )
}

/// Map a non-success API response to an error with the server's message.
pub(crate) fn api_error(status: StatusCode, body: &str) -> anyhow::Error {
    let message = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    };

    match status {
        StatusCode::UNAUTHORIZED => anyhow::anyhow!("authentication failed: {message}"),
        StatusCode::FORBIDDEN => anyhow::anyhow!("access denied: {message}"),
        StatusCode::NOT_FOUND => anyhow::anyhow!("not found: {message}"),
        StatusCode::TOO_MANY_REQUESTS => anyhow::anyhow!("rate limit exceeded: {message}"),
        _ => anyhow::anyhow!("request failed (HTTP {}): {message}", status.as_u16()),
    }
}

/// Resolve an auth token for the given host from the environment.
pub fn resolve_token(host: &str) -> Result<String> {
    let names: &[&str] = if host.eq_ignore_ascii_case(DEFAULT_GITHUB_HOST) {
        &["GH_TOKEN", "GITHUB_TOKEN"]
    } else {
        &[
            "GH_ENTERPRISE_TOKEN",
            "GITHUB_ENTERPRISE_TOKEN",
            "GH_TOKEN",
            "GITHUB_TOKEN",
        ]
    };

    for name in names {
        if let Ok(value) = std::env::var(name) {
            if !value.is_empty() {
                tracing::debug!("using auth token from {name}");
                return Ok(value);
            }
        }
    }

    Err(anyhow::anyhow!(
        "no auth token found for {host}; set GH_TOKEN or GITHUB_TOKEN"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_paths_against_base() {
        let client = GitHubClient::new("https://api.github.com", "t").unwrap();
        let url = client.resolve("repos/octo/hello/code-scanning/analyses").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo/hello/code-scanning/analyses"
        );
    }

    #[test]
    fn resolve_keeps_enterprise_base_path() {
        let client = GitHubClient::new("https://ghe.corp.net/api/v3", "t").unwrap();
        let url = client.resolve("repos/octo/hello/code-scanning/analyses/1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.corp.net/api/v3/repos/octo/hello/code-scanning/analyses/1"
        );
    }

    #[test]
    fn resolve_preserves_query_markers() {
        let client = GitHubClient::new("https://api.github.com/", "t").unwrap();
        let url = client
            .resolve("repos/octo/hello/code-scanning/analyses/9?confirm_delete")
            .unwrap();
        assert_eq!(url.query(), Some("confirm_delete"));
    }

    #[test]
    fn resolve_passes_absolute_urls_through() {
        let client = GitHubClient::new("https://api.github.com", "t").unwrap();
        let url = client
            .resolve("https://other.example/repos/octo/hello/code-scanning/analyses/2")
            .unwrap();
        assert_eq!(url.host_str(), Some("other.example"));
    }

    #[test]
    fn tool_label_with_and_without_version() {
        let tool = AnalysisTool {
            name: "CodeQL".to_string(),
            version: Some("2.20.0".to_string()),
            guid: None,
        };
        assert_eq!(tool.label(), "CodeQL@2.20.0");

        let bare = AnalysisTool {
            name: "CodeQL".to_string(),
            version: None,
            guid: None,
        };
        assert_eq!(bare.label(), "CodeQL");
    }

    #[test]
    fn api_error_uses_server_message() {
        let err = api_error(StatusCode::NOT_FOUND, r#"{"message": "Not Found"}"#);
        assert_eq!(err.to_string(), "not found: Not Found");

        let err = api_error(StatusCode::BAD_GATEWAY, "<html>nope</html>");
        assert_eq!(err.to_string(), "request failed (HTTP 502): Bad Gateway");
    }
}
