//! Shared constants for the CLI application
//!
//! This module contains global constants used across the application to ensure
//! consistency and avoid magic strings.

/// REST endpoint for repositories hosted on github.com
pub const GITHUB_API_URL: &str = "https://api.github.com/";

/// Default host assumed when a repository is given as OWNER/REPO
pub const DEFAULT_GITHUB_HOST: &str = "github.com";

/// Media type for regular REST responses
pub const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

/// Media type that asks the analyses endpoint for the raw SARIF document
pub const ACCEPT_SARIF_JSON: &str = "application/sarif+json";

/// Value sent in the X-GitHub-Api-Version header
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default connection timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Page size used by the list command when no limit is given
pub const DEFAULT_LIST_LIMIT: u32 = 30;

/// User agent string
pub const USER_AGENT: &str = concat!("gh-sarif/", env!("CARGO_PKG_VERSION"));
