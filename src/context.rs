//! CLI Context - Resolved configuration for command execution
//!
//! This module gathers everything a command needs: the target
//! repository, an authenticated API client for its host, and the output
//! writer. Commands receive the context as a plain parameter.

use anyhow::Result;

use crate::api::{self, GitHubClient};
use crate::output::{OutputFormat, OutputWriter};
use crate::repository::Repository;
use crate::Cli;

/// Context shared by all commands
pub struct CliContext {
    /// Repository the invocation targets
    pub repo: Repository,

    /// Client bound to the repository's API host
    pub client: GitHubClient,

    /// Output writer configured from CLI flags
    pub output: OutputWriter,
}

impl CliContext {
    /// Create a new CLI context from parsed CLI arguments.
    ///
    /// Fails when no repository can be resolved or no auth token is
    /// available for its host.
    pub fn new(cli: &Cli) -> Result<Self> {
        let output = OutputWriter::new(OutputFormat::from_json_flag(cli.json));

        let repo = Repository::resolve(cli.repo.as_deref())?;
        tracing::debug!("resolved repository {} on {}", repo.full_name(), repo.host);

        let token = api::resolve_token(&repo.host)?;
        let client = GitHubClient::new(&repo.api_base(), &token)?;

        Ok(Self {
            repo,
            client,
            output,
        })
    }

    /// Endpoint path for this repository's analyses collection.
    pub fn analyses_path(&self) -> String {
        format!("repos/{}/code-scanning/analyses", self.repo.full_name())
    }

    /// Endpoint path for one analysis, optionally with the bare
    /// confirm_delete query marker the deletion endpoint expects.
    pub fn analysis_path(&self, analysis_id: &str, confirm_delete: bool) -> String {
        let marker = if confirm_delete {
            "?confirm_delete"
        } else {
            ""
        };
        format!(
            "repos/{}/code-scanning/analyses/{}{}",
            self.repo.full_name(),
            analysis_id,
            marker
        )
    }

    /// Endpoint path for SARIF uploads to this repository.
    pub fn sarifs_path(&self) -> String {
        format!("repos/{}/code-scanning/sarifs", self.repo.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    fn test_context() -> CliContext {
        CliContext {
            repo: Repository {
                host: "github.com".to_string(),
                owner: "octo".to_string(),
                name: "hello".to_string(),
            },
            client: GitHubClient::new("https://api.github.com", "t").unwrap(),
            output: OutputWriter::new(OutputFormat::Text),
        }
    }

    #[test]
    fn builds_analysis_paths() {
        let ctx = test_context();
        assert_eq!(
            ctx.analyses_path(),
            "repos/octo/hello/code-scanning/analyses"
        );
        assert_eq!(
            ctx.analysis_path("42", false),
            "repos/octo/hello/code-scanning/analyses/42"
        );
        assert_eq!(
            ctx.analysis_path("42", true),
            "repos/octo/hello/code-scanning/analyses/42?confirm_delete"
        );
        assert_eq!(ctx.sarifs_path(), "repos/octo/hello/code-scanning/sarifs");
    }
}
