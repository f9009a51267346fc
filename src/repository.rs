//! Repository identification and resolution
//!
//! A target repository is resolved from the `--repo` flag (or `GH_REPO`),
//! then `GITHUB_REPOSITORY`, and finally from the `origin` remote of the
//! current git clone.

use std::path::Path;
use std::process::Command;

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::constants::{DEFAULT_GITHUB_HOST, GITHUB_API_URL};

/// A GitHub repository, optionally on a GitHub Enterprise host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub host: String,
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("invalid repository {input:?}: expected OWNER/REPO or HOST/OWNER/REPO")]
    Invalid { input: String },

    #[error("failed to run git: {0}")]
    Run(#[from] std::io::Error),

    #[error("git command failed ({cmd}): {stderr}")]
    CommandFailed { cmd: String, stderr: String },

    #[error("git output was not valid utf-8: {0}")]
    OutputUtf8(#[from] std::string::FromUtf8Error),

    #[error("remote url {url:?} does not look like a GitHub repository")]
    UnrecognizedRemote { url: String },

    #[error("no repository given; pass --repo, set GH_REPO, or run inside a git clone")]
    NoRepository,
}

impl Repository {
    /// Parses `OWNER/REPO` or `HOST/OWNER/REPO`. The host falls back to
    /// `GH_HOST` when set, and github.com otherwise.
    pub fn parse(input: &str) -> Result<Self, RepoError> {
        let default_host =
            std::env::var("GH_HOST").unwrap_or_else(|_| DEFAULT_GITHUB_HOST.to_string());
        Self::parse_with_host(input, &default_host)
    }

    fn parse_with_host(input: &str, default_host: &str) -> Result<Self, RepoError> {
        let trimmed = input.trim().trim_matches('/');
        let parts: Vec<&str> = trimmed.split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                host: default_host.to_string(),
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            [host, owner, name] if !host.is_empty() && !owner.is_empty() && !name.is_empty() => {
                Ok(Self {
                    host: host.to_string(),
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(RepoError::Invalid {
                input: input.to_string(),
            }),
        }
    }

    /// Resolves the target repository for a command invocation.
    pub fn resolve(flag: Option<&str>) -> Result<Self, RepoError> {
        if let Some(value) = flag {
            return Self::parse(value);
        }
        if let Ok(value) = std::env::var("GITHUB_REPOSITORY") {
            if !value.is_empty() {
                return Self::parse(&value);
            }
        }
        match remote_origin_url(Path::new(".")) {
            Ok(url) => Self::from_remote_url(&url),
            Err(err) => {
                tracing::debug!("could not read origin remote: {err}");
                Err(RepoError::NoRepository)
            }
        }
    }

    /// Parses a git remote URL in https, ssh, or scp-like form.
    pub fn from_remote_url(url: &str) -> Result<Self, RepoError> {
        let url = url.trim();
        let unrecognized = || RepoError::UnrecognizedRemote {
            url: url.to_string(),
        };

        if url.contains("://") {
            let parsed = Url::parse(url).map_err(|_| unrecognized())?;
            let host = parsed.host_str().ok_or_else(unrecognized)?.to_string();
            let mut segments = parsed
                .path_segments()
                .ok_or_else(unrecognized)?
                .filter(|s| !s.is_empty());
            let owner = segments.next().ok_or_else(unrecognized)?.to_string();
            let name = segments.next().ok_or_else(unrecognized)?;
            Ok(Self {
                host,
                owner,
                name: name.trim_end_matches(".git").to_string(),
            })
        } else if let Some((user_host, path)) = url.split_once(':') {
            // scp-like syntax: git@github.com:owner/repo.git
            let host = user_host
                .rsplit_once('@')
                .map(|(_, h)| h)
                .unwrap_or(user_host);
            match path.split('/').collect::<Vec<_>>().as_slice() {
                [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                    host: host.to_string(),
                    owner: owner.to_string(),
                    name: name.trim_end_matches(".git").to_string(),
                }),
                _ => Err(unrecognized()),
            }
        } else {
            Err(unrecognized())
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Base URL for REST calls against this repository's host.
    ///
    /// A host carrying an explicit scheme is used verbatim, which keeps
    /// the client testable against a local HTTP server.
    pub fn api_base(&self) -> String {
        if self.host.contains("://") {
            let mut base = self.host.trim_end_matches('/').to_string();
            base.push('/');
            base
        } else if self.host.eq_ignore_ascii_case(DEFAULT_GITHUB_HOST) {
            GITHUB_API_URL.to_string()
        } else {
            format!("https://{}/api/v3/", self.host)
        }
    }
}

fn remote_origin_url(dir: &Path) -> Result<String, RepoError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["remote", "get-url", "origin"])
        .output()?;

    if !output.status.success() {
        return Err(RepoError::CommandFailed {
            cmd: "git remote get-url origin".to_string(),
            stderr: String::from_utf8(output.stderr)?.trim().to_string(),
        });
    }

    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}
