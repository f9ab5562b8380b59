//! Integration tests for the `dashboards` command.

mod common;

use common::{dynatrace_cmd_with_base_url, load_fixture};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/config/v1/dashboards"))
        .and(header("Authorization", "Api-Token test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("dashboards/list.json")))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_dashboards_json_output() {
    let server = MockServer::start().await;
    mount_list(&server).await;

    let output = dynatrace_cmd_with_base_url(&server.uri())
        .arg("dashboards")
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let dashboards = parsed.as_array().unwrap();
    assert_eq!(dashboards.len(), 3);
    assert!(dashboards.iter().any(|d| {
        d["id"] == "ddb6a571-4bda-4e8b-a9c0-4a3e02c2e14a"
            && d["name"] == "KQG;project=sockshop;service=carts;stage=staging"
    }));
}

#[tokio::test]
async fn test_dashboards_yaml_output() {
    let server = MockServer::start().await;
    mount_list(&server).await;

    dynatrace_cmd_with_base_url(&server.uri())
        .args(["-o", "yaml", "dashboards"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "name: KQG;project=sockshop;service=carts;stage=staging",
        ));
}

#[tokio::test]
async fn test_dashboards_output_file() {
    let server = MockServer::start().await;
    mount_list(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out/dashboards.json");

    dynatrace_cmd_with_base_url(&server.uri())
        .args(["dashboards", "--output-file"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&output_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 3);
}
