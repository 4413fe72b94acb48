// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

use assert_cmd::Command;
use predicates::prelude::*;
use std::net::SocketAddr;
use tempfile::TempDir;

/// The binary in an empty directory with no keys in the environment
fn copilot(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ene-copilot").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("SERPER_API_KEY")
        .env_remove("ENE_MODEL")
        .env_remove("ENE_AGENTS_CONFIG")
        .env_remove("ENE_TASKS_CONFIG")
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn graph_shows_fixed_task_order() {
    let dir = TempDir::new().unwrap();

    copilot(&dir)
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1. business_plan_task (business_strategy_agent)\n\
             2. mvp_plan_task (mvp_development_agent) [context: business_plan_task]\n\
             3. gtm_strategy_task (gtm_strategy_agent) [context: business_plan_task, mvp_plan_task]",
        ));
}

#[test]
fn graph_mermaid() {
    let dir = TempDir::new().unwrap();

    copilot(&dir)
        .args(["graph", "--format", "mermaid"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph TD"))
        .stdout(predicate::str::contains("mvp_plan_task --> gtm_strategy_task"));
}

#[test]
fn run_without_key_fails_before_any_task() {
    let dir = TempDir::new().unwrap();

    copilot(&dir)
        .args(["run", "--sample", "--no-input"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn run_without_inputs_names_the_missing_field() {
    let dir = TempDir::new().unwrap();

    copilot(&dir)
        .args(["run", "--no-input", "--startup-idea", "Drone delivery"])
        .env("GEMINI_API_KEY", "test-key-123456")
        .assert()
        .failure()
        .stderr(predicate::str::contains("target_market"));
}

#[test]
fn check_reports_missing_key() {
    let dir = TempDir::new().unwrap();

    copilot(&dir)
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("GEMINI_API_KEY is not set"))
        .stdout(predicate::str::contains("using built-in definitions"));
}

#[test]
fn check_passes_with_key() {
    let dir = TempDir::new().unwrap();

    copilot(&dir)
        .arg("check")
        .env("GEMINI_API_KEY", "AIzaSyTestKey0000")
        .assert()
        .success()
        .stdout(predicate::str::contains("AIza...0000"))
        .stdout(predicate::str::contains("without web search"))
        .stdout(predicate::str::contains("Ready to run!"));
}

#[test]
fn init_writes_config_and_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();

    copilot(&dir).arg("init").assert().success();

    assert!(dir.path().join("config/agents.yaml").exists());
    assert!(dir.path().join("config/tasks.yaml").exists());
    assert!(dir.path().join(".env.example").exists());

    copilot(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    copilot(&dir).args(["init", "--force"]).assert().success();

    copilot(&dir)
        .arg("check")
        .env("GEMINI_API_KEY", "AIzaSyTestKey0000")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 entries"));
}

#[test]
fn env_file_is_read_from_the_target_directory() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join("project");
    std::fs::create_dir(&project).unwrap();
    std::fs::write(project.join(".env"), "GEMINI_API_KEY=AIzaSyFromDotenv0000\n").unwrap();

    copilot(&dir)
        .args(["-C", "project", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AIza...0000"));
}

/// Serve a Gemini stand-in that answers every request with the same text
fn spawn_model(answer: &'static str) -> String {
    let (tx, rx) = std::sync::mpsc::channel::<SocketAddr>();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();

            let reply = serde_json::json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": answer}]}}]
            });
            let app = axum::Router::new().route(
                "/models/:call",
                axum::routing::post(move || {
                    let reply = reply.clone();
                    async move { axum::Json(reply) }
                }),
            );
            axum::serve(listener, app).await.unwrap();
        });
    });

    format!("http://{}", rx.recv().unwrap())
}

#[test]
fn run_prints_plan_sections_and_writes_artifacts() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_model("## Go-To-Market\n\nLaunch in Lisbon with a pricing pilot.");

    copilot(&dir)
        .args(["run", "--sample", "--no-input", "--output-dir", "out"])
        .env("GEMINI_API_KEY", "test-key-123456")
        .env("GEMINI_BASE_URL", &base_url)
        .assert()
        .success()
        .stdout(predicate::str::contains("Go-To-Market"))
        .stdout(predicate::str::contains("Launch in Lisbon with a pricing pilot."))
        .stdout(predicate::str::contains("Coverage").not())
        .stdout(predicate::str::contains("not mentioned").not());

    assert!(dir.path().join("out/entrepreneurship_business_plan.txt").exists());
}
