//! Delete Command - Delete Code Scanning analyses
//!
//! Deletes one analysis per argument, or a whole set when --delete-all
//! or --purge is given. The server links every deletion to the next
//! deletable analysis in the set, and the set walk follows those links
//! until nothing deletable is left.

use anyhow::Result;
use clap::Args;

use crate::context::CliContext;
use crate::deletion::{self, ChainError, DeleteMode, DeleteOutcome, Refusal};
use crate::exit_codes;

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Analysis IDs to delete
    #[arg(value_name = "ANALYSIS_ID", required = true)]
    pub analysis_ids: Vec<String>,

    /// Delete all analyses in the set, except the last
    #[arg(long)]
    pub delete_all: bool,

    /// Allow the deletion of the last analysis in the set
    #[arg(long)]
    pub confirm_delete: bool,

    /// Alias for --delete-all --confirm-delete
    #[arg(long)]
    pub purge: bool,
}

/// Run the delete command
pub async fn run(ctx: &CliContext, args: &DeleteArgs) -> Result<i32> {
    let delete_all = args.delete_all || args.purge;
    let confirm = args.confirm_delete || args.purge;
    let mode = DeleteMode::from_confirm_flag(confirm);

    if delete_all && args.analysis_ids.len() > 1 {
        ctx.output
            .error("cannot use --delete-all or --purge with multiple analysis IDs");
        return Ok(exit_codes::USAGE_ERROR);
    }

    let mut deleted: Vec<String> = Vec::new();

    for analysis_id in &args.analysis_ids {
        if delete_all {
            let start = ctx.analysis_path(analysis_id, confirm);
            let spinner = ctx.output.spinner("Deleting analyses...");
            match deletion::delete_chain(&ctx.client, &start, mode).await {
                Ok(refs) => {
                    spinner.finish_and_clear();
                    if !ctx.output.is_json() {
                        for analysis_ref in &refs {
                            ctx.output
                                .success(&format!("Deleted analysis {analysis_ref}"));
                        }
                    }
                    deleted.extend(refs);
                }
                Err(ChainError {
                    deleted: partial,
                    cause,
                }) => {
                    spinner.finish_and_clear();
                    if !ctx.output.is_json() {
                        for analysis_ref in &partial {
                            ctx.output
                                .success(&format!("Deleted analysis {analysis_ref}"));
                        }
                    }
                    deleted.extend(partial);
                    ctx.output.error(&format!("{cause:#}"));
                    return finish(ctx, &deleted, exit_codes::API_ERROR);
                }
            }
            continue;
        }

        let url = ctx
            .client
            .resolve(&ctx.analysis_path(analysis_id, confirm))?;
        match deletion::delete_one(&ctx.client, &url).await {
            Ok(DeleteOutcome::Deleted(links)) => {
                deleted.push(analysis_id.clone());
                if !ctx.output.is_json() {
                    ctx.output
                        .success(&format!("Successfully deleted analysis {analysis_id}"));
                    match links.follow_up(DeleteMode::Standard) {
                        Some(next) => ctx.output.info(&format!("Next analysis: {next}")),
                        None => ctx.output.info("Next analysis: None (last in set)"),
                    }
                }
            }
            Ok(DeleteOutcome::Refused(Refusal::LastOfType)) => {
                ctx.output.error(&format!(
                    "analysis {analysis_id} is the last of its type and deletion may result in the loss of historical alert data"
                ));
                if !confirm && !ctx.output.is_json() {
                    ctx.output.info("pass --confirm-delete to delete it anyway");
                }
                return finish(ctx, &deleted, exit_codes::API_ERROR);
            }
            Ok(DeleteOutcome::Refused(Refusal::AlreadyGone)) => {
                ctx.output.error(&format!(
                    "analysis {analysis_id} was not found (it may already be deleted)"
                ));
                return finish(ctx, &deleted, exit_codes::API_ERROR);
            }
            Err(err) => {
                ctx.output.error(&format!("{err:#}"));
                return finish(ctx, &deleted, exit_codes::API_ERROR);
            }
        }
    }

    finish(ctx, &deleted, exit_codes::SUCCESS)
}

/// Print the final ledger and return the exit code.
///
/// JSON mode always prints the ledger array, so a partial result from
/// an aborted run still reaches the caller on stdout.
fn finish(ctx: &CliContext, deleted: &[String], code: i32) -> Result<i32> {
    if ctx.output.is_json() {
        ctx.output.json(deleted)?;
    } else if code == exit_codes::SUCCESS {
        ctx.output
            .success(&format!("Successfully deleted {} analyses.", deleted.len()));
    } else if !deleted.is_empty() {
        ctx.output.warn(&format!(
            "{} analyses were deleted before the failure",
            deleted.len()
        ));
    }
    Ok(code)
}
