//! CLI integration tests against the file-backed store.

mod common;

use std::path::Path;

use tempfile::TempDir;

use common::{run_cli_with_env, run_cli_with_env_success};

fn file_store_url(path: &Path) -> String {
    url::Url::from_directory_path(path)
        .expect("Failed to convert path to file URL")
        .to_string()
}

struct TestEnv {
    _temp_dir: TempDir,
    home: std::path::PathBuf,
    store_url: String,
}

fn test_env() -> TestEnv {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store");
    let store_url = file_store_url(&store_path);
    let home = temp_dir.path().join("home");
    std::fs::create_dir_all(&home).unwrap();
    TestEnv {
        _temp_dir: temp_dir,
        home,
        store_url,
    }
}

/// Create a record and return its id (the first stdout line).
fn create_company(env: &TestEnv, fields: &str) -> String {
    let stdout = run_cli_with_env_success(
        &["records", "create", "companies", fields],
        &env.home,
        &env.store_url,
    );
    stdout.lines().next().expect("create printed no id").to_string()
}

#[test]
fn test_create_and_list_records() {
    let env = test_env();

    create_company(&env, r#"{"name": "Acme Freight", "status": "active"}"#);
    create_company(&env, r#"{"name": "Globex", "status": "inactive"}"#);

    let stdout = run_cli_with_env_success(&["records", "list", "companies"], &env.home, &env.store_url);

    assert!(stdout.contains("Acme Freight"));
    assert!(stdout.contains("Globex"));
}

#[test]
fn test_list_with_status_filter() {
    let env = test_env();

    create_company(&env, r#"{"name": "Acme", "status": "active"}"#);
    create_company(&env, r#"{"name": "Globex", "status": "inactive"}"#);
    create_company(&env, r#"{"name": "Initech", "status": "active"}"#);

    let stdout = run_cli_with_env_success(
        &["records", "list", "companies", "--status", "active"],
        &env.home,
        &env.store_url,
    );

    assert!(stdout.contains("Acme"));
    assert!(stdout.contains("Initech"));
    assert!(!stdout.contains("Globex"));
}

#[test]
fn test_list_with_search() {
    let env = test_env();

    create_company(&env, r#"{"name": "Acme Freight", "email": "info@acme.example"}"#);
    create_company(&env, r#"{"name": "Globex", "email": "hello@globex.example"}"#);

    let stdout = run_cli_with_env_success(
        &["records", "list", "companies", "--search", "ACME"],
        &env.home,
        &env.store_url,
    );

    assert!(stdout.contains("Acme Freight"));
    assert!(!stdout.contains("Globex"));
}

#[test]
fn test_list_pagination() {
    let env = test_env();

    for i in 0..5 {
        create_company(&env, &format!(r#"{{"name": "Company {}"}}"#, i));
    }

    let page1 = run_cli_with_env_success(
        &["records", "list", "companies", "--page-size", "2"],
        &env.home,
        &env.store_url,
    );
    let count = page1.lines().filter(|l| l.contains("Company")).count();
    assert_eq!(count, 2);

    let page3 = run_cli_with_env_success(
        &["records", "list", "companies", "--page", "3", "--page-size", "2"],
        &env.home,
        &env.store_url,
    );
    let count = page3.lines().filter(|l| l.contains("Company")).count();
    assert_eq!(count, 1);
}

#[test]
fn test_get_record_roundtrip() {
    let env = test_env();

    let id = create_company(&env, r#"{"name": "Acme Freight", "status": "active"}"#);

    let stdout = run_cli_with_env_success(
        &["records", "get", "companies", &id],
        &env.home,
        &env.store_url,
    );

    assert!(stdout.contains("Acme Freight"));
    assert!(stdout.contains(&id));
}

#[test]
fn test_get_missing_record() {
    let env = test_env();

    // Seed the store so the collection directory exists.
    create_company(&env, r#"{"name": "Acme"}"#);

    let output = run_cli_with_env(
        &["records", "get", "companies", "no-such-id"],
        &env.home,
        &env.store_url,
    );

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Record not found"));
}

#[test]
fn test_update_merges_fields() {
    let env = test_env();

    let id = create_company(&env, r#"{"name": "Acme", "status": "active"}"#);

    run_cli_with_env_success(
        &[
            "records",
            "update",
            "companies",
            &id,
            r#"{"status": "inactive"}"#,
        ],
        &env.home,
        &env.store_url,
    );

    let stdout = run_cli_with_env_success(
        &["records", "get", "companies", &id],
        &env.home,
        &env.store_url,
    );

    assert!(stdout.contains("Acme"));
    assert!(stdout.contains("inactive"));
}

#[test]
fn test_delete_record() {
    let env = test_env();

    let id = create_company(&env, r#"{"name": "Acme"}"#);

    run_cli_with_env_success(
        &["records", "delete", "companies", &id],
        &env.home,
        &env.store_url,
    );

    let output = run_cli_with_env(
        &["records", "get", "companies", &id],
        &env.home,
        &env.store_url,
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Record not found"));
}

#[test]
fn test_delete_missing_record_fails() {
    let env = test_env();

    create_company(&env, r#"{"name": "Acme"}"#);

    let output = run_cli_with_env(
        &["records", "delete", "companies", "no-such-id"],
        &env.home,
        &env.store_url,
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_create_missing_required_field_fails() {
    let env = test_env();

    let output = run_cli_with_env(
        &["records", "create", "companies", r#"{"status": "active"}"#],
        &env.home,
        &env.store_url,
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("name"));
}

#[test]
fn test_unknown_collection_fails() {
    let env = test_env();

    let output = run_cli_with_env(
        &["records", "list", "widgets"],
        &env.home,
        &env.store_url,
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("widgets"));
}

#[test]
fn test_collections_lists_builtins() {
    let env = test_env();

    let stdout = run_cli_with_env_success(&["collections"], &env.home, &env.store_url);

    for name in ["companies", "contacts", "invoices", "shipments"] {
        assert!(stdout.contains(name), "missing collection {name}");
    }
}
