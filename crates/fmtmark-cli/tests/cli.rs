//! CLI integration tests: subcommands, input sources, config and exit codes.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// The binary with a home directory that holds no config file.
fn fmtmark() -> Command {
    let mut cmd = cargo_bin_cmd!("fmtmark");
    cmd.env("HOME", env!("CARGO_TARGET_TMPDIR"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    fmtmark()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inspect format templates"));
}

#[test]
fn test_no_subcommand() {
    fmtmark()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_parse_tree_from_argument() {
    fmtmark()
        .args(["parse", "**%@** and %1$@"])
        .assert()
        .success()
        .stdout("root\n  paragraph\n    bold\n      text \"{0}\"\n    text \" and {0}\"\n");
}

#[test]
fn test_parse_plain_template_is_raw() {
    fmtmark()
        .args(["parse", "just text"])
        .assert()
        .success()
        .stdout("raw\n");
}

#[test]
fn test_parse_stdin() {
    fmtmark()
        .arg("parse")
        .write_stdin("one\n\n*two*")
        .assert()
        .success()
        .stdout(predicate::str::contains("italic"));
}

#[test]
fn test_parse_file() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("template.txt");
    fs::write(&template, "[docs](https://example.com/%@)").unwrap();

    fmtmark()
        .args(["parse", "--file", template.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "link \"https://example.com/{0}\"",
        ));
}

#[test]
fn test_parse_missing_file() {
    fmtmark()
        .args(["parse", "--file", "/definitely/not/here.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read template file"));
}

#[test]
fn test_parse_json() {
    fmtmark()
        .args(["parse", "--format", "json", "~~%@~~"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"strikethrough\""))
        .stdout(predicate::str::contains("\"interpolation_indexes\""));
}

#[test]
fn test_parse_json_plain_is_null() {
    fmtmark()
        .args(["parse", "--format", "json", "plain"])
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn test_parse_syntax() {
    fmtmark()
        .args(["parse", "--format", "syntax", "*a*"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ROOT@0..3"))
        .stdout(predicate::str::contains("STAR@0..1 \"*\""));
}

#[test]
fn test_strict_rejects_degraded_spans() {
    fmtmark()
        .args(["parse", "--strict", "oops **%@"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unmatched `**`"));
}

#[test]
fn test_stray_delimiter_template_prints_tree_and_fails_strict() {
    fmtmark()
        .args(["parse", "--strict", "a ~~b"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("unknown \"~~\""))
        .stderr(predicate::str::contains("unmatched `~~`"));
}

#[test]
fn test_strict_rejects_unreferenced_arguments() {
    fmtmark()
        .args(["parse", "--strict", "%2$@ only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("arguments 0..1 are never referenced"));
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_strict_handles_huge_argument_position() {
    fmtmark()
        .args(["parse", "--strict", "%18446744073709551615$@"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "arguments 0..18446744073709551614 are never referenced",
        ));
}

#[test]
fn test_strict_accepts_clean_template() {
    fmtmark()
        .args(["parse", "--strict", "**%@** %2$@"])
        .assert()
        .success();
}

#[test]
fn test_config_sets_format_and_strict() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "format = \"json\"\nstrict = true\n").unwrap();

    fmtmark()
        .args(["parse", "--config", config.to_str().unwrap(), "*a"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"kind\": \"unknown\""))
        .stderr(predicate::str::contains("unmatched `*`"));
}

#[test]
fn test_format_flag_overrides_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "format = \"json\"\n").unwrap();

    fmtmark()
        .args([
            "parse",
            "--config",
            config.to_str().unwrap(),
            "--format",
            "tree",
            "plain",
        ])
        .assert()
        .success()
        .stdout("raw\n");
}

#[test]
fn test_missing_config_file() {
    fmtmark()
        .args(["parse", "--config", "/definitely/not/config.toml", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "format = \"html\"\n").unwrap();

    fmtmark()
        .args(["parse", "--config", config.to_str().unwrap(), "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_args() {
    fmtmark()
        .args(["args", "%2$@ and %1$@"])
        .assert()
        .success()
        .stdout("arguments: 2\norder: 1 0\n");
}

#[test]
fn test_args_plain_template() {
    fmtmark()
        .args(["args", "no placeholders"])
        .assert()
        .success()
        .stdout("arguments: 0\norder: \n");
}

#[test]
fn test_verbose_logs_to_stderr() {
    fmtmark()
        .args(["--verbose", "parse", "a **b"])
        .assert()
        .success()
        .stderr(predicate::str::contains("degraded"));
}

#[test]
fn test_init_writes_config_used_by_parse() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("fmtmark.toml");

    fmtmark()
        .args(["init", "--config", config.to_str().unwrap(), "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fmtmark.toml"));

    fmtmark()
        .args(["parse", "--config", config.to_str().unwrap(), "**%@**"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"bold\""));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "strict = true\n").unwrap();

    fmtmark()
        .args(["init", "--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&config).unwrap(), "strict = true\n");

    fmtmark()
        .args(["init", "--config", config.to_str().unwrap(), "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&config).unwrap().contains("strict = false"));
}

#[test]
fn test_init_default_location() {
    let home = TempDir::new().unwrap();

    fmtmark()
        .env("HOME", home.path())
        .args(["init", "--strict"])
        .assert()
        .success();

    let written = home.path().join(".config/fmtmark/config.toml");
    assert!(fs::read_to_string(written).unwrap().contains("strict = true"));
}
