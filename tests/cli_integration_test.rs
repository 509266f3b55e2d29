//! Exit codes and output of the `nextra-codemods` binary.

use assert_cmd::Command;
use indoc::indoc;
use nextra_codemods::available_transforms;
use std::fs;
use tempfile::TempDir;

fn codemods() -> Command {
    let mut cmd = Command::cargo_bin("nextra-codemods").unwrap();
    cmd.env("NO_COLOR", "1").env("NEXTRA_CODEMODS_QUIET", "1");
    cmd
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn unknown_transform_lists_every_name() {
    let temp = TempDir::new().unwrap();
    let assert = codemods()
        .args(["migrate-everything", "."])
        .current_dir(temp.path())
        .assert()
        .code(1);

    let stderr = stderr_of(assert.get_output());
    assert!(stderr.contains("Transform \"migrate-everything\" not found"));
    for name in available_transforms() {
        assert!(stderr.contains(name), "{} missing from: {}", name, stderr);
    }
}

#[test]
fn transform_without_path_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    codemods()
        .arg("setup-search")
        .current_dir(temp.path())
        .assert()
        .code(1);
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn missing_path_fails() {
    let temp = TempDir::new().unwrap();
    codemods()
        .args(["migrate-meta-files", "pages/_meta.js"])
        .current_dir(temp.path())
        .assert()
        .code(1);
}

#[test]
fn list_prints_registered_transforms() {
    let assert = codemods().arg("--list").assert().success();
    let stdout = stdout_of(assert.get_output());
    for name in available_transforms() {
        assert!(stdout.contains(name));
    }
}

#[test]
fn meta_file_is_rewritten_in_place() {
    let temp = TempDir::new().unwrap();
    let meta = temp.path().join("_meta.js");
    fs::write(
        &meta,
        indoc! {"
            export default {
              github: {
                title: 'GitHub',
                href: 'https://github.com/acme/docs',
                newWindow: true
              }
            }
        "},
    )
    .unwrap();

    let assert = codemods()
        .args(["--plain", "migrate-meta-files", "_meta.js"])
        .current_dir(temp.path())
        .assert()
        .success();

    assert!(stdout_of(assert.get_output())
        .contains("Successfully applied transform \"migrate-meta-files\" to \"_meta.js\""));
    assert_eq!(
        fs::read_to_string(&meta).unwrap(),
        indoc! {"
            'use client'

            export default {
              github: {
                title: 'GitHub',
                href: 'https://github.com/acme/docs',
              }
            }
        "}
    );
}

#[test]
fn pipeline_without_manifest_exits_one() {
    let temp = TempDir::new().unwrap();
    let assert = codemods()
        .args(["--yes", "--skip-install"])
        .current_dir(temp.path())
        .assert()
        .code(1);
    assert!(stderr_of(assert.get_output()).contains("No package.json found"));
}

#[test]
fn pipeline_with_yes_migrates_project() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(
        root.join("package.json"),
        r#"{"dependencies":{"nextra":"^3.0.0","nextra-theme-docs":"^3.0.0"}}"#,
    )
    .unwrap();
    fs::write(
        root.join("theme.config.jsx"),
        "export default { logo: <b>Docs</b>, docsRepositoryBase: 'https://github.com/acme/docs' }\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("pages/docs")).unwrap();
    fs::write(root.join("pages/index.mdx"), "# Home\n").unwrap();
    fs::write(root.join("pages/docs/guide.mdx"), "# Guide\n").unwrap();

    let assert = codemods()
        .args(["--yes", "--skip-install", "--plain", "--project-root"])
        .arg(root)
        .assert()
        .success();

    let stdout = stdout_of(assert.get_output());
    assert!(stdout.contains("npm run dev"));
    assert!(root.join("app/page.mdx").is_file());
    assert!(root.join("app/docs/guide/page.mdx").is_file());
    assert!(root.join("app/layout.jsx").is_file());
    assert!(root.join("pages.bak/index.mdx").is_file());
    assert!(fs::read_to_string(root.join("package.json"))
        .unwrap()
        .contains("\"nextra\": \"^4.0.0\""));
}

#[test]
fn config_file_enables_auto_rename() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("package.json"), r#"{"dependencies":{"nextra":"^4.0.0"}}"#).unwrap();
    fs::write(root.join("nextra-codemods.toml"), "[migration]\nauto_rename = true\n").unwrap();
    fs::create_dir_all(root.join("pages")).unwrap();
    fs::write(root.join("pages/index.md"), "# Home\n").unwrap();

    codemods()
        .args(["migrate-pages-to-app", "pages"])
        .current_dir(root)
        .assert()
        .success();

    assert!(!root.join("pages").exists());
    assert!(root.join("pages.bak/index.md").is_file());
    assert!(root.join("app/page.md").is_file());
}
