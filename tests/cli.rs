use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn giti(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("giti").unwrap();
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("GITI_API_KEY")
        .env_remove("GITI_ENDPOINT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, endpoint: &str, model_path: &Path) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        format!(
            "[model]\nprovider = \"llama-cpp\"\nendpoint = \"{endpoint}\"\nmodel_path = {model_path:?}\nmax_retries = 1\n\n[display]\ncolor_output = false\n"
        ),
    )
    .unwrap();
    path
}

fn fake_model(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("phi-1_5-Q4_K_M.gguf");
    fs::write(&path, b"GGUF").unwrap();
    path
}

#[test]
fn missing_model_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "http://127.0.0.1:9", &dir.path().join("absent.gguf"));

    giti(&dir)
        .arg("--config")
        .arg(&config)
        .arg("show status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Model file not found"))
        .stderr(predicate::str::contains("Please download the model first"));
}

#[test]
fn missing_context_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let model = fake_model(&dir);
    let config = write_config(&dir, "http://127.0.0.1:9", &model);

    giti(&dir)
        .arg("--config")
        .arg(&config)
        .args(["--context", "nowhere.txt", "show status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere.txt"));
}

#[test]
fn no_query_prints_usage() {
    let dir = TempDir::new().unwrap();
    let model = fake_model(&dir);
    let config = write_config(&dir, "http://127.0.0.1:9", &model);

    giti(&dir)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("no query given"));
}

#[test]
fn init_config_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("giti.toml");

    giti(&dir)
        .arg("--init-config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created default config file"));

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("[model]"));
    assert!(written.contains("llama-cpp"));
}

#[test]
fn dry_run_shows_plan_without_prompting() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{ "message": { "role": "assistant", "content": "git status\ngit log --oneline -3" } }]
            })
            .to_string(),
        )
        .create();

    let dir = TempDir::new().unwrap();
    let model = fake_model(&dir);
    let config = write_config(&dir, &server.url(), &model);

    giti(&dir)
        .arg("--config")
        .arg(&config)
        .args(["--dry-run", "show", "recent", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("git status"))
        .stdout(predicate::str::contains("git log --oneline -3"))
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("Execute these commands?").not());

    mock.assert();
}
