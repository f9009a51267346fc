//! Upload Command - Upload a SARIF file to a repository
//!
//! The file is checked locally, gzip-compressed, base64-encoded, and
//! posted to the SARIF upload endpoint. The server answers 202 with a
//! receipt while it processes the upload.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::StatusCode;

use crate::api::{SarifUploadReceipt, SarifUploadRequest};
use crate::context::CliContext;
use crate::exit_codes;
use crate::sarif::{SarifDocument, SUPPORTED_SARIF_VERSION};

/// Arguments for the upload command
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Commit the analysis was run against
    #[arg(value_name = "COMMIT_SHA")]
    pub commit_sha: String,

    /// Git reference the analysis refers to, e.g. refs/heads/main
    #[arg(value_name = "REF")]
    pub git_ref: String,

    /// Path of the SARIF file to upload
    #[arg(value_name = "SARIF_FILE")]
    pub sarif_file: PathBuf,
}

/// Run the upload command
pub async fn run(ctx: &CliContext, args: &UploadArgs) -> Result<i32> {
    let bytes = std::fs::read(&args.sarif_file)
        .with_context(|| format!("failed to read {}", args.sarif_file.display()))?;

    let document = SarifDocument::parse(&bytes)?;
    if !document.is_supported_version() {
        ctx.output.warn(&format!(
            "SARIF version {} may be rejected by the server (expected {})",
            document.version, SUPPORTED_SARIF_VERSION
        ));
    }
    tracing::debug!(
        "uploading {} runs from {}",
        document.run_count(),
        args.sarif_file.display()
    );

    let payload = SarifUploadRequest {
        commit_sha: args.commit_sha.clone(),
        ref_name: args.git_ref.clone(),
        sarif: encode_sarif(&bytes)?,
        validate: true,
    };

    let spinner = ctx.output.spinner("Uploading SARIF file...");
    let result = ctx.client.post_json(&ctx.sarifs_path(), &payload).await;
    spinner.finish_and_clear();

    let (status, body) = result?;
    if status != StatusCode::ACCEPTED {
        ctx.output.error("failed to upload SARIF file");
        return Ok(exit_codes::API_ERROR);
    }

    if ctx.output.is_json() {
        ctx.output.json_raw(&body);
        return Ok(exit_codes::SUCCESS);
    }

    let receipt: SarifUploadReceipt =
        serde_json::from_str(&body).context("failed to decode upload receipt")?;
    ctx.output.success("SARIF file uploaded successfully.");
    ctx.output.print("");
    ctx.output.print(&format!("ID: {}", receipt.id));
    ctx.output.print(&format!("URL: {}", receipt.url));

    Ok(exit_codes::SUCCESS)
}

/// Gzip then base64 the raw SARIF bytes, as the upload endpoint expects.
fn encode_sarif(bytes: &[u8]) -> Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(bytes)
        .context("failed to compress SARIF file")?;
    let compressed = encoder.finish().context("failed to compress SARIF file")?;
    Ok(base64::Engine::encode(
        &base64::engine::general_purpose::STANDARD,
        compressed,
    ))
}
