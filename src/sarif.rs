//! SARIF document checks for the upload path
//!
//! Uploads are validated server-side, but parsing locally first catches
//! broken files before they are compressed and sent.

use anyhow::{Context, Result};
use serde::Deserialize;

/// SARIF version the Code Scanning upload endpoint accepts.
pub const SUPPORTED_SARIF_VERSION: &str = "2.1.0";

/// The parts of a SARIF document checked before an upload.
#[derive(Debug, Deserialize)]
pub struct SarifDocument {
    pub version: String,
    pub runs: Vec<serde_json::Value>,
}

impl SarifDocument {
    /// Parse a SARIF document, requiring the version and runs fields.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).context("not a valid SARIF document")
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn is_supported_version(&self) -> bool {
        self.version == SUPPORTED_SARIF_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let doc = SarifDocument::parse(br#"{"version": "2.1.0", "runs": [{"results": []}]}"#)
            .unwrap();
        assert_eq!(doc.run_count(), 1);
        assert!(doc.is_supported_version());
    }

    #[test]
    fn rejects_non_json_input() {
        assert!(SarifDocument::parse(b"<sarif/>").is_err());
    }

    #[test]
    fn rejects_documents_without_runs() {
        assert!(SarifDocument::parse(br#"{"version": "2.1.0"}"#).is_err());
    }

    #[test]
    fn flags_unsupported_versions() {
        let doc = SarifDocument::parse(br#"{"version": "2.0.0", "runs": []}"#).unwrap();
        assert!(!doc.is_supported_version());
    }
}
