//! List Command - List Code Scanning analyses for a repository
//!
//! By default the most recent 30 analyses are listed.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color};

use crate::api::Analysis;
use crate::constants::DEFAULT_LIST_LIMIT;
use crate::context::CliContext;
use crate::exit_codes;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Git reference to filter by, e.g. refs/heads/main or a branch
    /// name; use refs/pull/<number>/merge for a pull request
    #[arg(short = 'r', long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// Tool name to filter by
    #[arg(short = 't', long)]
    pub tool: Option<String>,

    /// Page number of analyses to return
    #[arg(short = 'p', long, default_value_t = 1)]
    pub page: u32,

    /// Number of analyses to return per page
    #[arg(
        short = 'L',
        long,
        default_value_t = DEFAULT_LIST_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub limit: u32,

    /// Print comma-separated values instead of a table
    #[arg(long)]
    pub csv: bool,
}

const COLUMNS: [&str; 8] = [
    "ID",
    "Created At",
    "Ref",
    "Tool",
    "Category",
    "Rules Count",
    "Results Count",
    "Deletable",
];

/// Run the list command
pub async fn run(ctx: &CliContext, args: &ListArgs) -> Result<i32> {
    let mut url = ctx.client.resolve(&ctx.analyses_path())?;

    let mut params: Vec<(&str, String)> = Vec::new();
    if args.limit != DEFAULT_LIST_LIMIT {
        params.push(("per_page", args.limit.to_string()));
    }
    if let Some(git_ref) = &args.git_ref {
        params.push(("ref", git_ref.clone()));
    }
    if let Some(tool) = &args.tool {
        params.push(("tool_name", tool.clone()));
    }
    if args.page != 1 {
        params.push(("page", args.page.to_string()));
    }
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    let body = ctx.client.get(url.as_str()).await?;

    if ctx.output.is_json() {
        ctx.output.json_raw(&body);
        return Ok(exit_codes::SUCCESS);
    }

    let analyses: Vec<Analysis> =
        serde_json::from_str(&body).context("failed to decode analyses response")?;

    if args.csv {
        print_csv(ctx, &analyses);
        return Ok(exit_codes::SUCCESS);
    }

    if analyses.is_empty() {
        ctx.output.info("No analyses found");
        return Ok(exit_codes::SUCCESS);
    }

    if ctx.output.attended() {
        // The API does not report the total number of analyses, so the
        // page count stays unknown.
        ctx.output.print(&format!(
            "Showing {} analyses on page {}/?",
            analyses.len(),
            args.page
        ));
        ctx.output.print("");
    }

    let mut table = ctx.output.create_table_with_headers(&COLUMNS);
    for analysis in &analyses {
        let state = if !analysis.error.is_empty() {
            Color::Red
        } else if !analysis.warning.is_empty() {
            Color::Yellow
        } else {
            Color::Cyan
        };

        table.add_row(vec![
            Cell::new(analysis.id).fg(state),
            Cell::new(&analysis.created_at),
            Cell::new(&analysis.ref_name),
            Cell::new(analysis.tool.label()),
            Cell::new(analysis.category.as_deref().unwrap_or_default()),
            Cell::new(analysis.rules_count),
            Cell::new(analysis.results_count),
            Cell::new(analysis.deletable),
        ]);
    }
    ctx.output.table(&table);

    Ok(exit_codes::SUCCESS)
}

fn print_csv(ctx: &CliContext, analyses: &[Analysis]) {
    ctx.output.csv_row(&COLUMNS.map(String::from));
    for analysis in analyses {
        ctx.output.csv_row(&[
            analysis.id.to_string(),
            analysis.created_at.clone(),
            analysis.ref_name.clone(),
            analysis.tool.label(),
            analysis.category.clone().unwrap_or_default(),
            analysis.rules_count.to_string(),
            analysis.results_count.to_string(),
            analysis.deletable.to_string(),
        ]);
    }
}
