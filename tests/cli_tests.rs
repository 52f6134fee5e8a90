//! CLI tests for git-release
//!
//! These tests verify:
//! - Input validation happens before configuration and network access
//! - Missing configuration is reported with exit code 1
//! - Dry runs and releases against a mock GitHub API
//! - Partial success exits with code 2

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_VARS: [&str; 6] = [
    "GITHUB_TOKEN",
    "ORGANIZATION_NAME",
    "BRANCH_RELEASE_FROM",
    "BRANCH_RELEASE_TO",
    "TIMEOUT_SECONDS",
    "GITHUB_API_URL",
];

/// Command with a clean configuration environment
fn git_release() -> Command {
    let mut cmd = Command::cargo_bin("git-release").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn print_version_flag_works() {
    git_release()
        .arg("--print-version")
        .assert()
        .success()
        .stdout(predicate::str::contains("git-release"));
}

#[test]
fn help_mentions_version_directive() {
    git_release()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("patch, minor, major"));
}

#[test]
fn empty_version_is_rejected() {
    git_release()
        .args(["--repo", "api"])
        .env("GITHUB_TOKEN", "ghp_test")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("version cannot be empty"));
}

#[test]
fn invalid_version_is_rejected() {
    git_release()
        .args(["--version", "1.x", "--repo", "api"])
        .env("GITHUB_TOKEN", "ghp_test")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse version param (1.x)"));
}

#[test]
fn empty_repo_is_rejected() {
    git_release()
        .args(["--version", "patch"])
        .env("GITHUB_TOKEN", "ghp_test")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("repository name cannot be empty"));
}

#[test]
fn input_checked_before_token() {
    git_release()
        .args(["--repo", "api"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("version cannot be empty"))
        .stderr(predicate::str::contains("GITHUB_TOKEN").not());
}

#[test]
fn missing_token_is_reported() {
    git_release()
        .args(["--version", "patch", "--repo", "api"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN is required"));
}

#[test]
fn missing_token_json_output() {
    let output = git_release()
        .args(["--version", "patch", "--repo", "api", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["step"], "load configuration");
}

async fn mount_repository(server: &MockServer, tags: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/repos/cliqueinc/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "full_name": "cliqueinc/api",
            "default_branch": "master",
            "html_url": "https://github.com/cliqueinc/api"
        })))
        .mount(server)
        .await;

    for (branch, sha) in [("develop", "d3v3l0p"), ("master", "m4st3r")] {
        Mock::given(method("GET"))
            .and(path(format!("/repos/cliqueinc/api/branches/{}", branch)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": branch,
                "commit": { "sha": sha }
            })))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/repos/cliqueinc/api/git/refs/tags"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tags))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn dry_run_against_mock_api() {
    let server = MockServer::start().await;
    mount_repository(
        &server,
        json!([
            { "ref": "refs/tags/v1.2.3", "object": { "sha": "t1" } },
            { "ref": "refs/tags/v1.10.0", "object": { "sha": "t2" } },
            { "ref": "refs/tags/nightly", "object": { "sha": "t3" } }
        ]),
    )
    .await;

    let output = git_release()
        .args(["--version", "patch", "--repo", "api", "--dry", "--json"])
        .env("GITHUB_TOKEN", "ghp_test")
        .env("GITHUB_API_URL", server.uri())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "dry_run");
    assert_eq!(json["version"], "1.10.1");
    assert_eq!(json["previous_version"], "1.10.0");
    assert_eq!(json["release_branch"], "release-v1.10.1");

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.method.as_str() == "GET"));
}

#[tokio::test(flavor = "multi_thread")]
async fn release_against_mock_api() {
    let server = MockServer::start().await;
    mount_repository(&server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/repos/cliqueinc/api/git/refs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ref": "refs/heads/release-v1.0.0",
            "object": { "sha": "d3v3l0p" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/cliqueinc/api/pulls"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "number": 17,
            "html_url": "https://github.com/cliqueinc/api/pull/17",
            "state": "open",
            "title": "Release v1.0.0",
            "head": { "ref": "release-v1.0.0" },
            "base": { "ref": "master" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    git_release()
        .args(["--version", "1.0.0", "--repo", "api"])
        .env("GITHUB_TOKEN", "ghp_test")
        .env("GITHUB_API_URL", server.uri())
        .assert()
        .success()
        .stdout(predicate::str::contains("new release version: 1.0.0"))
        .stdout(predicate::str::contains("#17 release-v1.0.0 -> master [open]"));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_pull_request_exits_with_partial_code() {
    let server = MockServer::start().await;
    mount_repository(
        &server,
        json!([{ "ref": "refs/tags/v0.9.0", "object": { "sha": "t1" } }]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/repos/cliqueinc/api/git/refs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ref": "refs/heads/release-v0.10.0",
            "object": { "sha": "d3v3l0p" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/cliqueinc/api/pulls"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Validation Failed" })),
        )
        .mount(&server)
        .await;

    git_release()
        .args(["--version", "minor", "--repo", "api"])
        .env("GITHUB_TOKEN", "ghp_test")
        .env("GITHUB_API_URL", server.uri())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("release-v0.10.0"))
        .stderr(predicate::str::contains("please create it manually"));
}

#[tokio::test(flavor = "multi_thread")]
async fn partial_success_json_names_branch_and_version() {
    let server = MockServer::start().await;
    mount_repository(&server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/repos/cliqueinc/api/git/refs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ref": "refs/heads/release-v0.0.1",
            "object": { "sha": "d3v3l0p" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/cliqueinc/api/pulls"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let output = git_release()
        .args(["--version", "patch", "--repo", "api", "--json"])
        .env("GITHUB_TOKEN", "ghp_test")
        .env("GITHUB_API_URL", server.uri())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "partial");
    assert_eq!(json["step"], "create pull request");
    assert_eq!(json["release_branch"], "release-v0.0.1");
    assert_eq!(json["version"], "0.0.1");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_repository_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/cliqueinc/ghost"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
        )
        .mount(&server)
        .await;

    git_release()
        .args(["--version", "patch", "--repo", "ghost"])
        .env("GITHUB_TOKEN", "ghp_test")
        .env("GITHUB_API_URL", server.uri())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("fail get repo (cliqueinc/ghost)"));
}
