//! List, view, and upload behavior against a mock Code Scanning API.

use base64::Engine;
use flate2::read::GzDecoder;
use gh_sarif::api::GitHubClient;
use gh_sarif::commands::{list, upload, view};
use gh_sarif::constants::DEFAULT_LIST_LIMIT;
use gh_sarif::output::{OutputFormat, OutputWriter};
use gh_sarif::repository::Repository;
use gh_sarif::CliContext;
use serde_json::json;
use std::io::Read;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ANALYSES_PATH: &str = "/repos/octo/hello/code-scanning/analyses";
const SARIFS_PATH: &str = "/repos/octo/hello/code-scanning/sarifs";

fn context_for(server: &MockServer) -> CliContext {
    CliContext {
        repo: Repository {
            host: server.uri(),
            owner: "octo".to_string(),
            name: "hello".to_string(),
        },
        client: GitHubClient::new(&server.uri(), "test-token").unwrap(),
        output: OutputWriter::new(OutputFormat::Text),
    }
}

fn list_args() -> list::ListArgs {
    list::ListArgs {
        git_ref: None,
        tool: None,
        page: 1,
        limit: DEFAULT_LIST_LIMIT,
        csv: false,
    }
}

fn analysis_body(id: u64) -> serde_json::Value {
    json!({
        "ref": "refs/heads/main",
        "commit_sha": "d6e4c75c141dbacecc279b721b8b9393d5405795",
        "analysis_key": ".github/workflows/codeql.yml:analyze",
        "environment": "{\"language\":\"rust\"}",
        "category": ".github/workflows/codeql.yml:analyze/language:rust",
        "error": "",
        "created_at": "2026-01-13T11:55:49Z",
        "results_count": 17,
        "rules_count": 92,
        "id": id,
        "url": format!("https://api.github.com{ANALYSES_PATH}/{id}"),
        "sarif_id": "6c81cd8e-b078-4ac3-a3be-1dad7dbd0b53",
        "tool": { "name": "CodeQL", "guid": null, "version": "2.20.0" },
        "deletable": true,
        "warning": ""
    })
}

#[tokio::test]
async fn list_passes_filters_to_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ANALYSES_PATH))
        .and(query_param("per_page", "50"))
        .and(query_param("ref", "refs/heads/main"))
        .and(query_param("tool_name", "CodeQL"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([analysis_body(201)])))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context_for(&server);
    let args = list::ListArgs {
        git_ref: Some("refs/heads/main".to_string()),
        tool: Some("CodeQL".to_string()),
        page: 2,
        limit: 50,
        csv: false,
    };
    let code = list::run(&ctx, &args).await.unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn list_defaults_send_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ANALYSES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context_for(&server);
    let code = list::run(&ctx, &list_args()).await.unwrap();
    assert_eq!(code, 0);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn requests_carry_auth_and_api_version_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ANALYSES_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(header("x-github-api-version", "2022-11-28"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context_for(&server);
    let code = list::run(&ctx, &list_args()).await.unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn api_errors_surface_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ANALYSES_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Must have security_events scope",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context_for(&server);
    let err = list::run(&ctx, &list_args()).await.unwrap_err();
    assert!(err.to_string().contains("access denied"));
    assert!(err.to_string().contains("Must have security_events scope"));
}

#[tokio::test]
async fn view_fetches_one_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{ANALYSES_PATH}/201")))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body(201)))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context_for(&server);
    let args = view::ViewArgs {
        analysis_id: "201".to_string(),
        sarif: false,
    };
    assert_eq!(view::run(&ctx, &args).await.unwrap(), 0);
}

#[tokio::test]
async fn view_sarif_asks_for_the_sarif_media_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{ANALYSES_PATH}/201")))
        .and(header("accept", "application/sarif+json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"version": "2.1.0", "runs": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context_for(&server);
    let args = view::ViewArgs {
        analysis_id: "201".to_string(),
        sarif: true,
    };
    assert_eq!(view::run(&ctx, &args).await.unwrap(), 0);
}

#[tokio::test]
async fn upload_posts_the_encoded_sarif() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SARIFS_PATH))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "id": "47177e22-5596-11eb-80a1-c1e54ef945c6",
            "url": format!(
                "https://api.github.com{SARIFS_PATH}/47177e22-5596-11eb-80a1-c1e54ef945c6"
            ),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("results.sarif");
    let sarif: &[u8] = br#"{"version": "2.1.0", "runs": [{"results": []}]}"#;
    std::fs::write(&file, sarif).unwrap();

    let ctx = context_for(&server);
    let args = upload::UploadArgs {
        commit_sha: "d6e4c75c141dbacecc279b721b8b9393d5405795".to_string(),
        git_ref: "refs/heads/main".to_string(),
        sarif_file: file,
    };
    assert_eq!(upload::run(&ctx, &args).await.unwrap(), 0);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["commit_sha"], "d6e4c75c141dbacecc279b721b8b9393d5405795");
    assert_eq!(body["ref"], "refs/heads/main");
    assert_eq!(body["validate"], true);

    // The sarif field carries the gzipped file, base64-encoded.
    let compressed = base64::engine::general_purpose::STANDARD
        .decode(body["sarif"].as_str().unwrap())
        .unwrap();
    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed).unwrap();
    assert_eq!(decompressed, sarif);
}

#[tokio::test]
async fn upload_treats_non_accepted_success_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SARIFS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("results.sarif");
    std::fs::write(&file, br#"{"version": "2.1.0", "runs": []}"#).unwrap();

    let ctx = context_for(&server);
    let args = upload::UploadArgs {
        commit_sha: "deadbeef".to_string(),
        git_ref: "refs/heads/main".to_string(),
        sarif_file: file,
    };
    assert_eq!(upload::run(&ctx, &args).await.unwrap(), 1);
}
