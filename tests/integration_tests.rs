mod common;

use common::{CommandOutput, TestContext};
use std::fs;

#[test]
fn test_help_and_version() {
    let ctx = TestContext::new();

    let output: CommandOutput = ctx
        .cmd()
        .arg("--help")
        .output()
        .expect("Failed to run goupdate")
        .into();

    output
        .assert_success()
        .assert_stdout_contains("Keep a local Go toolchain in sync")
        .assert_stdout_contains("Usage: goupdate");

    let output: CommandOutput = ctx
        .cmd()
        .arg("version")
        .output()
        .expect("Failed to run goupdate")
        .into();

    output.assert_success().assert_stdout_contains("goupdate ");

    // The subcommand and the flag report the same build
    let flag_output: CommandOutput = ctx
        .cmd()
        .arg("--version")
        .output()
        .expect("Failed to run goupdate")
        .into();

    flag_output.assert_success();
    assert_eq!(output.stdout.trim(), flag_output.stdout.trim());
}

#[test]
fn test_env_prints_exports_for_install_root() {
    let ctx = TestContext::new();

    let output: CommandOutput = ctx
        .cmd()
        .args(["env", "--install-root", "/opt/sdk"])
        .output()
        .expect("Failed to run goupdate env")
        .into();

    output
        .assert_success()
        .assert_stdout_contains("export GOROOT=/opt/sdk/go\n")
        .assert_stdout_contains("export PATH=$GOROOT/bin:$PATH")
        .assert_stdout_contains(&format!(
            "export GOPATH={}",
            ctx.home_dir.join("go").display()
        ))
        .assert_stdout_contains("export GO111MODULE=auto")
        .assert_stdout_contains("export GOPROXY=https://goproxy.cn,direct");

    // Nothing but export lines on stdout
    assert!(output.stdout.lines().all(|l| l.starts_with("export ")));
}

#[test]
fn test_env_defaults_to_working_directory() {
    let ctx = TestContext::new();

    let output: CommandOutput = ctx
        .cmd()
        .arg("env")
        .output()
        .expect("Failed to run goupdate env")
        .into();

    let work_dir = fs::canonicalize(&ctx.work_dir).unwrap();
    output.assert_success().assert_stdout_contains(&format!(
        "export GOROOT={}",
        work_dir.join("go").display()
    ));
}

#[test]
fn test_env_resolves_relative_install_root() {
    let ctx = TestContext::new();

    let output: CommandOutput = ctx
        .cmd()
        .args(["env", "--install-root", "sdk"])
        .output()
        .expect("Failed to run goupdate env")
        .into();

    let work_dir = fs::canonicalize(&ctx.work_dir).unwrap();
    output.assert_success().assert_stdout_contains(&format!(
        "export GOROOT={}\n",
        work_dir.join("sdk").join("go").display()
    ));
}

#[test]
fn test_config_set_get_unset() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["config", "set", "goproxy=https://proxy.golang.org,direct"])
        .output()
        .expect("Failed to set config");

    let output: CommandOutput = ctx
        .cmd()
        .args(["config", "get", "goproxy"])
        .output()
        .expect("Failed to get config")
        .into();
    output
        .assert_success()
        .assert_stdout_contains("https://proxy.golang.org,direct");

    let output: CommandOutput = ctx
        .cmd()
        .arg("env")
        .output()
        .expect("Failed to run goupdate env")
        .into();
    output.assert_stdout_contains("export GOPROXY=https://proxy.golang.org,direct");

    ctx.cmd()
        .args(["config", "unset", "goproxy"])
        .output()
        .expect("Failed to unset config");

    let output: CommandOutput = ctx
        .cmd()
        .args(["config", "get", "goproxy"])
        .output()
        .expect("Failed to get config")
        .into();
    output.assert_stdout_contains("https://goproxy.cn,direct");
}

#[test]
fn test_config_does_not_persist_env_overrides() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["config", "set", "download-delay-secs", "9"])
        .output()
        .expect("Failed to set config");

    let stored = fs::read_to_string(&ctx.config_path).expect("Config file was not written");
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored["settings"]["download_delay_secs"], 9);
    assert_eq!(stored["settings"]["go_binary"], "go");
}

#[test]
fn test_config_rejects_unknown_key() {
    let ctx = TestContext::new();

    let output: CommandOutput = ctx
        .cmd()
        .args(["config", "set", "shim-dir=/tmp"])
        .output()
        .expect("Failed to run goupdate")
        .into();

    output
        .assert_failure()
        .assert_stderr_contains("is not a valid configuration setting");
}

#[test]
fn test_config_show_formats() {
    let ctx = TestContext::new();

    let output: CommandOutput = ctx
        .cmd()
        .args(["config", "show", "--format", "json"])
        .output()
        .expect("Failed to run goupdate")
        .into();

    output.assert_success();
    let _: serde_json::Value =
        serde_json::from_str(&output.stdout).expect("Output was not valid JSON");
    output.assert_stdout_contains("\"source_url\":");

    let output: CommandOutput = ctx
        .cmd()
        .args(["config", "show", "--format", "yaml"])
        .output()
        .expect("Failed to run goupdate")
        .into();

    output.assert_success();
    let _: serde_yaml::Value =
        serde_yaml::from_str(&output.stdout).expect("Output was not valid YAML");
    output.assert_stdout_contains("source_url:");
}
