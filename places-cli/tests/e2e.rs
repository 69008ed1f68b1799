//! End-to-end tests for the places binary
//!
//! These run the built binary and are gated behind the `integration`
//! feature flag. Run with:
//!
//! ```sh
//! cargo test -p places-cli --features integration
//! ```

#![cfg(feature = "integration")]

use std::process::{Command, Output};

use tempfile::TempDir;

/// Run `places` with isolated config and data directories
fn places(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_places"))
        .args(args)
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("PLACES_PROJECT_CONFIG_DIR", home.path().join("project"))
        .env_remove("API_BASE_URL")
        .env_remove("PLACES_API_BASE_URL")
        .env_remove("ASSET_BASE_URL")
        .env_remove("PLACES_ASSET_BASE_URL")
        .output()
        .expect("Failed to run places")
}

#[test]
fn places_help_lists_commands() {
    let home = TempDir::new().unwrap();
    let output = places(&home, &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Share and discover places"));
    assert!(stdout.contains("login"));
    assert!(stdout.contains("route"));
}

#[test]
fn config_show_prints_defaults() {
    let home = TempDir::new().unwrap();
    let output = places(&home, &["config", "show"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[api]"));
    assert!(stdout.contains("base_url = \"http://localhost:5000/api\""));
}

#[test]
fn config_show_applies_flags() {
    let home = TempDir::new().unwrap();
    let output = places(
        &home,
        &["config", "show", "--api-url", "https://places.example/api"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("https://places.example/api"));
}

#[test]
fn status_without_session_is_anonymous() {
    let home = TempDir::new().unwrap();
    let output = places(&home, &["status"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Not logged in"));
    assert!(stdout.contains("/auth/login"));
}

#[test]
fn stored_session_is_restored_on_start() {
    let home = TempDir::new().unwrap();
    let data = home.path().join("data").join("places");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("user_data.json"),
        r#"{"userId":"u1","token":"t1"}"#,
    )
    .unwrap();

    let output = places(&home, &["route", "/places/new"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "render /places/new");
}

#[test]
fn logout_clears_stored_session() {
    let home = TempDir::new().unwrap();
    let data = home.path().join("data").join("places");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("user_data.json"),
        r#"{"userId":"u1","token":"t1"}"#,
    )
    .unwrap();

    assert!(places(&home, &["logout"]).status.success());
    let output = places(&home, &["route", "/places/new"]);

    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "redirect /auth/login"
    );
    assert!(!data.join("user_data.json").exists());
}

#[test]
fn creating_a_place_while_anonymous_is_refused() {
    let home = TempDir::new().unwrap();
    let image = home.path().join("a.png");
    std::fs::write(&image, [0x89, 0x50]).unwrap();

    let output = places(
        &home,
        &[
            "place",
            "new",
            "--title",
            "Tower",
            "--description",
            "Tall building",
            "--address",
            "Main St 1",
            "--image",
            image.to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("redirected to /auth/login"));
}
