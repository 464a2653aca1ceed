//! CLI integration tests using mock servers.
//!
//! Each test runs the real `roster` binary against a wiremock directory, with
//! `XDG_CONFIG_HOME` pointed at a temporary directory so the config file and the
//! stored token are isolated per test. Stdin is closed, so nothing ever prompts.

#![cfg(all(test, target_os = "linux"))]

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

const TOKEN: &str = "QpwL5tke4Pnpja7X4";

struct CliRun {
    status: ExitStatus,
    stdout: String,
}

/// Test context for CLI integration tests.
struct CliTestContext {
    mock_server: MockServer,
    config_home: TempDir,
}

impl CliTestContext {
    async fn new() -> Self {
        Self {
            mock_server: MockServer::start().await,
            config_home: tempfile::tempdir().expect("temp config dir"),
        }
    }

    /// Same as [`Self::new`], with a token already stored.
    async fn signed_in() -> Self {
        let ctx = Self::new().await;
        ctx.write_config(&format!("[auth]\ntoken = \"{TOKEN}\"\n"));
        ctx
    }

    fn config_file(&self) -> PathBuf {
        self.config_home.path().join("roster").join("config.toml")
    }

    fn write_config(&self, content: &str) {
        let file = self.config_file();
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(file, content).unwrap();
    }

    fn read_config(&self) -> String {
        std::fs::read_to_string(self.config_file()).unwrap_or_default()
    }

    async fn roster(&self, args: &[&str]) -> CliRun {
        run_roster(self.config_home.path(), &self.mock_server.uri(), args).await
    }

    async fn requests_with_method(&self, verb: &str) -> Vec<wiremock::Request> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == verb)
            .collect()
    }

    // =========================================================================
    // Mock helpers
    // =========================================================================

    async fn mock_users_page(&self, page: u32, users: Vec<Value>) {
        let total = users.len();
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": page,
                "per_page": 10,
                "total": total,
                "total_pages": 1,
                "data": users,
            })))
            .mount(&self.mock_server)
            .await;
    }
}

async fn run_roster(config_home: &Path, api_url: &str, args: &[&str]) -> CliRun {
    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_roster"))
        .args(args)
        .args(["--api-url", api_url])
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("ROSTER_API_BASE_URL")
        .env_remove("ROSTER_API_KEY")
        .env_remove("ROSTER_PAGE_SIZE")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .await
        .expect("roster binary should run");

    CliRun {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    }
}

fn user_json(id: u64, first: &str, last: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
        "first_name": first,
        "last_name": last,
        "avatar": format!("https://reqres.in/img/faces/{id}-image.jpg"),
    })
}

fn first_page() -> Vec<Value> {
    vec![
        user_json(1, "George", "Bluth"),
        user_json(2, "Janet", "Weaver"),
        user_json(3, "Emma", "Wong"),
    ]
}

// =============================================================================
// login / logout / status
// =============================================================================

#[tokio::test]
async fn test_login_stores_token_and_lists_first_page() {
    let ctx = CliTestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({
            "email": "eve.holt@reqres.in",
            "password": "cityslicka",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": TOKEN })))
        .mount(&ctx.mock_server)
        .await;
    ctx.mock_users_page(1, first_page()).await;

    let run = ctx
        .roster(&[
            "login",
            "--email",
            "eve.holt@reqres.in",
            "--password",
            "cityslicka",
        ])
        .await;

    assert!(run.status.success(), "stdout: {}", run.stdout);
    assert!(run.stdout.contains("Login successful!"));
    assert!(run.stdout.contains("Janet Weaver"));
    assert!(run.stdout.contains("Showing 1 to 3 of 3 users"));
    assert!(ctx.read_config().contains(TOKEN));
}

#[tokio::test]
async fn test_failed_login_exits_with_error_and_stores_nothing() {
    let ctx = CliTestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "user not found" })),
        )
        .mount(&ctx.mock_server)
        .await;

    let run = ctx
        .roster(&["login", "-e", "peter@klaven.com", "-p", "wrongpass"])
        .await;

    assert_eq!(run.status.code(), Some(1));
    assert!(run.stdout.contains("user not found"));
    assert!(!ctx.read_config().contains("token"));
}

#[tokio::test]
async fn test_login_form_errors_are_reported_locally() {
    let ctx = CliTestContext::new().await;

    let run = ctx.roster(&["login", "-e", "eve", "-p", "123"]).await;

    assert_eq!(run.status.code(), Some(1));
    assert!(run.stdout.contains("Email must contain @ symbol"));
    assert!(run.stdout.contains("Password must be at least 6 characters"));
    assert!(ctx.requests_with_method("POST").await.is_empty());
}

#[tokio::test]
async fn test_logout_removes_token_but_keeps_settings() {
    let ctx = CliTestContext::new().await;
    ctx.write_config(&format!(
        "[auth]\ntoken = \"{TOKEN}\"\n\n[api]\npage_size = 6\n"
    ));

    let run = ctx.roster(&["logout"]).await;
    assert!(run.status.success());
    assert!(run.stdout.contains("Signed out"));

    let config = ctx.read_config();
    assert!(!config.contains(TOKEN));
    assert!(config.contains("page_size = 6"));

    let run = ctx.roster(&["status"]).await;
    assert!(run.stdout.contains("Not signed in"));
}

// =============================================================================
// list
// =============================================================================

#[tokio::test]
async fn test_list_requires_login_without_terminal() {
    let ctx = CliTestContext::new().await;

    let run = ctx.roster(&["list"]).await;

    assert_eq!(run.status.code(), Some(1));
    assert!(run.stdout.contains("Not signed in"));
    assert!(ctx.requests_with_method("GET").await.is_empty());
}

#[tokio::test]
async fn test_list_filters_locally_and_sends_bearer() {
    let ctx = CliTestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "per_page": 5,
            "total": 3,
            "total_pages": 1,
            "data": first_page(),
        })))
        .mount(&ctx.mock_server)
        .await;

    let run = ctx
        .roster(&["list", "--per-page", "5", "--search", "WONG", "--view", "cards"])
        .await;

    assert!(run.status.success(), "stdout: {}", run.stdout);
    assert!(run.stdout.contains("Emma Wong"));
    assert!(!run.stdout.contains("George Bluth"));
    assert!(run.stdout.contains("Active"));
}

#[tokio::test]
async fn test_list_failure_exits_with_error() {
    let ctx = CliTestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.mock_server)
        .await;

    let run = ctx.roster(&["list"]).await;

    assert_eq!(run.status.code(), Some(1));
    assert!(run.stdout.contains("Failed to fetch users"));
    // a failed fetch never signs the user out
    assert!(ctx.read_config().contains(TOKEN));
}

// =============================================================================
// edit / delete
// =============================================================================

#[tokio::test]
async fn test_edit_sends_merged_fields_and_relists() {
    let ctx = CliTestContext::signed_in().await;
    ctx.mock_users_page(1, first_page()).await;
    Mock::given(method("PUT"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "first_name": "Janet",
            "last_name": "Smith",
            "email": "janet.weaver@reqres.in",
            "updatedAt": "2024-05-01T10:20:30.000Z"
        })))
        .mount(&ctx.mock_server)
        .await;

    let run = ctx.roster(&["edit", "2", "--last-name", "Smith"]).await;

    assert!(run.status.success(), "stdout: {}", run.stdout);
    assert!(run.stdout.contains("User updated successfully"));

    let puts = ctx.requests_with_method("PUT").await;
    assert_eq!(puts.len(), 1);
    let body: Value = serde_json::from_slice(&puts[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "first_name": "Janet",
            "last_name": "Smith",
            "email": "janet.weaver@reqres.in"
        })
    );
    // initial load plus the refresh after the update
    assert_eq!(ctx.requests_with_method("GET").await.len(), 2);
}

#[tokio::test]
async fn test_edit_unknown_user_fails_without_request() {
    let ctx = CliTestContext::signed_in().await;
    ctx.mock_users_page(1, first_page()).await;

    let run = ctx.roster(&["edit", "42", "--email", "x@y.com"]).await;

    assert_eq!(run.status.code(), Some(1));
    assert!(run.stdout.contains("User 42 is not on page 1"));
    assert!(ctx.requests_with_method("PUT").await.is_empty());
}

#[tokio::test]
async fn test_delete_with_yes() {
    let ctx = CliTestContext::signed_in().await;
    ctx.mock_users_page(1, first_page()).await;
    Mock::given(method("DELETE"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let run = ctx.roster(&["delete", "2", "--yes"]).await;

    assert!(run.status.success(), "stdout: {}", run.stdout);
    assert!(run.stdout.contains("User deleted successfully"));
}

#[tokio::test]
async fn test_delete_without_confirmation_is_refused() {
    let ctx = CliTestContext::signed_in().await;
    ctx.mock_users_page(1, first_page()).await;

    let run = ctx.roster(&["delete", "2"]).await;

    assert_eq!(run.status.code(), Some(1));
    assert!(run.stdout.contains("--yes"));
    assert!(ctx.requests_with_method("DELETE").await.is_empty());
}

#[tokio::test]
async fn test_failed_delete_reports_error() {
    let ctx = CliTestContext::signed_in().await;
    ctx.mock_users_page(1, first_page()).await;
    Mock::given(method("DELETE"))
        .and(path("/users/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.mock_server)
        .await;

    let run = ctx.roster(&["delete", "3", "-y"]).await;

    assert_eq!(run.status.code(), Some(1));
    assert!(run.stdout.contains("Failed to delete user"));
    // no refresh after a failed delete
    assert_eq!(ctx.requests_with_method("GET").await.len(), 1);
}
