//! gh-sarif - Work with GitHub Code Scanning analyses
//!
//! This crate provides a CLI for the Code Scanning analyses REST API:
//! listing and viewing analyses, uploading SARIF files, and deleting
//! analyses either one at a time or as a whole set by following the
//! links the server returns for each deletion.

pub mod api;
pub mod commands;
pub mod constants;
pub mod context;
pub mod deletion;
pub mod output;
pub mod repository;
pub mod sarif;

pub use context::CliContext;
pub use output::{OutputFormat, OutputWriter};
pub use repository::Repository;

use clap::{Parser, Subcommand};

/// gh-sarif - Code Scanning analyses from the command line
#[derive(Parser, Debug)]
#[command(
    name = "gh-sarif",
    version,
    about = "Work with GitHub Code Scanning analyses",
    long_about = "Query, upload, view, and delete GitHub Code Scanning analyses.\n\n\
                  The target repository is read from --repo, GH_REPO, \
                  GITHUB_REPOSITORY, or the origin remote of the current \
                  directory. Authentication uses GH_TOKEN or GITHUB_TOKEN \
                  (GH_ENTERPRISE_TOKEN or GITHUB_ENTERPRISE_TOKEN on GitHub \
                  Enterprise hosts)."
)]
pub struct Cli {
    /// Repository to target, as OWNER/REPO or HOST/OWNER/REPO
    #[arg(
        short = 'R',
        long,
        global = true,
        env = "GH_REPO",
        value_name = "OWNER/REPO"
    )]
    pub repo: Option<String>,

    /// Output JSON instead of text (includes additional fields)
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List analyses for a repository
    #[command(visible_alias = "ls")]
    List(commands::list::ListArgs),

    /// View a Code Scanning analysis
    View(commands::view::ViewArgs),

    /// Upload a SARIF file to a repository
    Upload(commands::upload::UploadArgs),

    /// Delete Code Scanning analyses
    Delete(commands::delete::DeleteArgs),
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    /// Create a new CLI application instance
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    /// Run the CLI application
    pub async fn run(self) -> i32 {
        let context = match CliContext::new(&self.cli) {
            Ok(context) => context,
            Err(err) => {
                OutputWriter::new(OutputFormat::from_json_flag(self.cli.json))
                    .error(&format!("{err:#}"));
                return exit_codes::USAGE_ERROR;
            }
        };

        let result = match self.cli.command {
            Commands::List(ref args) => commands::list::run(&context, args).await,
            Commands::View(ref args) => commands::view::run(&context, args).await,
            Commands::Upload(ref args) => commands::upload::run(&context, args).await,
            Commands::Delete(ref args) => commands::delete::run(&context, args).await,
        };

        match result {
            Ok(exit_code) => exit_code,
            Err(err) => {
                context.output.error(&format!("{err:#}"));
                exit_codes::API_ERROR
            }
        }
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Exit codes for CI integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// API call or transport failure, or a declined deletion
    pub const API_ERROR: i32 = 1;
    /// Invalid arguments, or no usable repository/credentials
    pub const USAGE_ERROR: i32 = 2;
}
