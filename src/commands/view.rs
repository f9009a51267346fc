//! View Command - Show one Code Scanning analysis
//!
//! Prints the analysis details, or the raw SARIF document the analysis
//! was created from when --sarif is given.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color};

use crate::api::Analysis;
use crate::constants::ACCEPT_SARIF_JSON;
use crate::context::CliContext;
use crate::exit_codes;

/// Arguments for the view command
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Analysis ID to view
    #[arg(value_name = "ANALYSIS_ID")]
    pub analysis_id: String,

    /// Print the raw SARIF document instead of the analysis details
    #[arg(short = 'S', long)]
    pub sarif: bool,
}

/// Run the view command
pub async fn run(ctx: &CliContext, args: &ViewArgs) -> Result<i32> {
    let path = ctx.analysis_path(&args.analysis_id, false);

    if args.sarif {
        let body = ctx.client.get_with_accept(&path, ACCEPT_SARIF_JSON).await?;
        ctx.output.json_raw(&body);
        return Ok(exit_codes::SUCCESS);
    }

    let body = ctx.client.get(&path).await?;

    if ctx.output.is_json() {
        ctx.output.json_raw(&body);
        return Ok(exit_codes::SUCCESS);
    }

    let analysis: Analysis = serde_json::from_str(&body).context("failed to decode analysis")?;

    let rows = vec![
        ("ID", analysis.id.to_string()),
        ("Created At", analysis.created_at),
        ("Ref", analysis.ref_name),
        ("Commit", analysis.commit_sha),
        ("Analysis Key", analysis.analysis_key),
        ("Category", analysis.category.unwrap_or_default()),
        ("Tool", analysis.tool.label()),
        ("Rules Count", analysis.rules_count.to_string()),
        ("Results Count", analysis.results_count.to_string()),
        ("SARIF ID", analysis.sarif_id),
        ("Deletable", analysis.deletable.to_string()),
        ("URL", analysis.url),
    ];

    let mut table = ctx.output.create_table();
    for (field, value) in rows {
        table.add_row(vec![Cell::new(field).fg(Color::Cyan), Cell::new(value)]);
    }
    if !analysis.warning.is_empty() {
        table.add_row(vec![
            Cell::new("Warning").fg(Color::Yellow),
            Cell::new(analysis.warning),
        ]);
    }
    if !analysis.error.is_empty() {
        table.add_row(vec![
            Cell::new("Error").fg(Color::Red),
            Cell::new(analysis.error),
        ]);
    }
    ctx.output.table(&table);

    Ok(exit_codes::SUCCESS)
}
