mod common;

use common::{has_temp_archive, TestContext};
use std::fs;

#[test]
fn test_help_and_version() {
    let ctx = TestContext::new();

    ctx.run(&["--help"])
        .assert_success()
        .assert_stdout_contains("Bootstrap a new October CMS project")
        .assert_stdout_contains("Usage: october");

    ctx.run(&["version"])
        .assert_success()
        .assert_stdout_contains("October CMS v1.0.419");
}

#[test]
fn test_init_creates_project_config() {
    let ctx = TestContext::new();

    ctx.run(&["init", "site"])
        .assert_success()
        .assert_stdout_contains("Creating project directory...")
        .assert_stdout_contains("Done! Now edit your october.yaml");

    let contents = fs::read_to_string(ctx.project("site/october.yaml"))
        .expect("october.yaml was not created");
    let yaml: serde_yaml::Value = serde_yaml::from_str(&contents).expect("invalid YAML");
    assert!(yaml.get("app").is_some());

    // The bundled template was staged before copying
    assert!(ctx.template_dir.join("october.yaml").exists());
}

#[test]
fn test_init_twice_keeps_existing_config() {
    let ctx = TestContext::new();

    ctx.run(&["init"]).assert_success();
    let target = ctx.project("october.yaml");
    fs::write(&target, "app:\n    name: customised\n").unwrap();

    ctx.run(&["init", "."])
        .assert_success()
        .assert_stdout_contains("october.yaml already exists");

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "app:\n    name: customised\n"
    );
}

#[test]
fn test_init_into_file_fails() {
    let ctx = TestContext::new();
    fs::write(ctx.project("taken"), "plain file").unwrap();

    ctx.run(&["init", "taken"])
        .assert_failure()
        .assert_stderr_contains("Cannot create target directory");
}

#[test]
fn test_init_creates_directory_before_staging_templates() {
    let ctx = TestContext::new();
    // A plain file where the staging directory should go makes staging fail
    let blocked = ctx.root.path().join("not-a-dir");
    fs::write(&blocked, "plain file").unwrap();

    let output: common::CommandOutput = ctx
        .cmd()
        .env("OCTOBER_TEMPLATE_DIR", blocked.join("templates"))
        .args(["init", "site"])
        .output()
        .expect("Failed to run october")
        .into();

    output.assert_failure();
    assert!(ctx.project("site").is_dir());
    assert!(!ctx.project("site/october.yaml").exists());
}

#[test]
fn test_install_refuses_existing_installation() {
    let ctx = TestContext::new();
    fs::create_dir_all(ctx.project("bootstrap")).unwrap();
    fs::create_dir_all(ctx.project("modules")).unwrap();

    // Unroutable URLs: the guard must fail before any request is made
    let output: common::CommandOutput = ctx
        .cmd()
        .env("OCTOBER_ARCHIVE_URL", "http://127.0.0.1:9/october.zip")
        .env("OCTOBER_HTACCESS_URL", "http://127.0.0.1:9/.htaccess")
        .arg("install")
        .output()
        .expect("Failed to run october")
        .into();

    output
        .assert_failure()
        .assert_stderr_contains("already installed")
        .assert_stderr_contains("--force");
    assert!(!has_temp_archive(&ctx.project_dir));
}

#[test]
fn test_install_download_failure_names_url() {
    let ctx = TestContext::new();

    let output: common::CommandOutput = ctx
        .cmd()
        .env("OCTOBER_ARCHIVE_URL", "http://127.0.0.1:9/october.zip")
        .args(["install", "--dir", "fresh"])
        .output()
        .expect("Failed to run october")
        .into();

    output
        .assert_failure()
        .assert_stderr_contains("http://127.0.0.1:9/october.zip");
    assert!(!has_temp_archive(&ctx.project("fresh")));
    assert!(!ctx.project("fresh/.htaccess").exists());
}
