//! Analysis deletion - response classification and chain walking
//!
//! Deleting a Code Scanning analysis returns links to the next deletable
//! analysis in the same set. The walker follows one of those links
//! sequentially, keeping a ledger of deleted analyses, until the chain
//! ends, the server declines, or a genuine error aborts the walk.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::api::{self, GitHubClient};

/// Marker phrase GitHub uses when declining to delete the last analysis
/// of its type without confirmation.
pub const LAST_OF_TYPE_MARKER: &str = "last of its type";

/// Which follow-up link a deletion walk advances on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Follow `next_analysis_url`, leaving the last analysis of each
    /// type in place.
    Standard,
    /// Follow `confirm_delete_url`, deleting last-of-type analyses too.
    Confirm,
}

impl DeleteMode {
    pub fn from_confirm_flag(confirm: bool) -> Self {
        if confirm {
            Self::Confirm
        } else {
            Self::Standard
        }
    }
}

/// Follow-up links returned by a successful deletion.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct FollowUpLinks {
    #[serde(default)]
    pub next_analysis_url: Option<String>,
    #[serde(default)]
    pub confirm_delete_url: Option<String>,
}

impl FollowUpLinks {
    /// The link a walk in `mode` advances on. `None` ends the walk.
    pub fn follow_up(&self, mode: DeleteMode) -> Option<&str> {
        let link = match mode {
            DeleteMode::Standard => self.next_analysis_url.as_deref(),
            DeleteMode::Confirm => self.confirm_delete_url.as_deref(),
        };
        link.filter(|l| !l.is_empty())
    }
}

/// Expected reasons the server declines a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// 400 carrying the last-of-type marker; deleting it requires
    /// confirmation.
    LastOfType,
    /// 404; the analysis is already gone.
    AlreadyGone,
}

/// Outcome of a single DELETE call.
#[derive(Debug, PartialEq)]
pub enum DeleteOutcome {
    Deleted(FollowUpLinks),
    Refused(Refusal),
}

/// Error aborting a deletion walk, carrying the analyses that were
/// deleted before the failure.
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct ChainError {
    pub deleted: Vec<String>,
    pub cause: anyhow::Error,
}

/// Classify a deletion response into an outcome.
///
/// 2xx responses must carry a JSON body with the follow-up links. A 400
/// is a refusal only when the body names the last-of-type condition;
/// any other 400 is a real error. 404 means the analysis is already
/// gone, which callers treat as a normal end of the chain.
pub fn classify_delete_response(status: StatusCode, body: &str) -> Result<DeleteOutcome> {
    if status.is_success() {
        let links: FollowUpLinks =
            serde_json::from_str(body).context("failed to decode deletion response")?;
        return Ok(DeleteOutcome::Deleted(links));
    }
    if status == StatusCode::BAD_REQUEST && body.contains(LAST_OF_TYPE_MARKER) {
        return Ok(DeleteOutcome::Refused(Refusal::LastOfType));
    }
    if status == StatusCode::NOT_FOUND {
        return Ok(DeleteOutcome::Refused(Refusal::AlreadyGone));
    }
    Err(api::api_error(status, body))
}

/// The analysis identifier at the end of a deletion URL's path.
///
/// Only path segments count, so query markers such as `?confirm_delete`
/// never leak into the ledger.
pub fn analysis_ref(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.rev().find(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string()
}

/// Issue a single DELETE and classify the response.
pub async fn delete_one(client: &GitHubClient, url: &Url) -> Result<DeleteOutcome> {
    let (status, body) = client.delete_raw(url).await?;
    classify_delete_response(status, &body)
}

/// Walk a deletion chain starting from `start`, which may be an endpoint
/// path or an absolute URL.
///
/// The returned ledger lists the deleted analyses in deletion order. A
/// refusal ends the walk normally; transport failures and unexpected
/// statuses abort it, with the partial ledger attached to the error.
pub async fn delete_chain(
    client: &GitHubClient,
    start: &str,
    mode: DeleteMode,
) -> Result<Vec<String>, ChainError> {
    let mut deleted = Vec::new();
    match walk(client, start, mode, &mut deleted).await {
        Ok(()) => Ok(deleted),
        Err(cause) => Err(ChainError { deleted, cause }),
    }
}

async fn walk(
    client: &GitHubClient,
    start: &str,
    mode: DeleteMode,
    deleted: &mut Vec<String>,
) -> Result<()> {
    let mut current = client.resolve(start)?;
    loop {
        match delete_one(client, &current).await? {
            DeleteOutcome::Refused(refusal) => {
                tracing::debug!("deletion chain ended at {current}: {refusal:?}");
                return Ok(());
            }
            DeleteOutcome::Deleted(links) => {
                deleted.push(analysis_ref(&current));
                match links.follow_up(mode) {
                    Some(next) => current = client.resolve(next)?,
                    None => return Ok(()),
                }
            }
        }
    }
}
