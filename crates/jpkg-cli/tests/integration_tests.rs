//! Integration tests for the `jpkg` binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Test context that sets up a temporary jpkg home
struct TestContext {
    temp_dir: TempDir,
    home: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let home = temp_dir.path().join(".jpkg");
        fs::create_dir_all(home.join("availablePackages")).expect("failed to create jpkg home");

        Self { temp_dir, home }
    }

    fn jpkg_cmd(&self) -> Command {
        let bin_path = env!("CARGO_BIN_EXE_jpkg");
        let mut cmd = Command::new(bin_path);
        cmd.env("HOME", self.temp_dir.path());
        cmd.env("JPKG_HOME", &self.home);
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("RUST_LOG");
        cmd.stdin(Stdio::null());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.jpkg_cmd()
            .args(args)
            .output()
            .expect("failed to run jpkg")
    }

    fn write_manifest(&self, dir: &str, manifest: &Value) {
        let dir = self.home.join(dir);
        fs::create_dir_all(&dir).unwrap();
        let name = manifest["name"].as_str().unwrap();
        fs::write(
            dir.join(format!("{name}.json")),
            serde_json::to_string_pretty(manifest).unwrap(),
        )
        .unwrap();
    }

    fn available(&self, manifest: &Value) {
        self.write_manifest("availablePackages", manifest);
    }

    fn installed(&self, manifest: &Value) {
        self.write_manifest("installedPackages", manifest);
    }

    /// An archive package whose script appends its name to `<home>/install.log`.
    #[cfg(unix)]
    fn archive_package(&self, name: &str, version: &str, dependencies: &[&str]) {
        use std::os::unix::fs::PermissionsExt;

        let sources = self.home.join("sources");
        let scripts = self.home.join("installScripts");
        fs::create_dir_all(&sources).unwrap();
        fs::create_dir_all(&scripts).unwrap();

        let mut builder = tar::Builder::new(Vec::new());
        let content = format!("{name} {version}");
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "VERSION", content.as_bytes())
            .unwrap();
        let source = format!("{name}-{version}.tar");
        fs::write(sources.join(&source), builder.into_inner().unwrap()).unwrap();

        let script = scripts.join(format!("{name}.sh"));
        fs::write(
            &script,
            "#!/bin/sh\nset -e\ntest -f VERSION\necho \"$JPKG_PACKAGE_NAME\" >> \"$JPKG_PREFIX/install.log\"\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        self.available(&json!({
            "name": name,
            "version": version,
            "type": "archive",
            "dependencies": dependencies,
            "sourceFile": source,
            "installScript": format!("{name}.sh"),
        }));
    }

    fn install_log(&self) -> Vec<String> {
        fs::read_to_string(self.home.join("install.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn installed_version(&self, name: &str) -> Option<String> {
        let path = self
            .home
            .join("installedPackages")
            .join(format!("{name}.json"));
        let content = fs::read_to_string(path).ok()?;
        let value: Value = serde_json::from_str(&content).ok()?;
        value["version"].as_str().map(str::to_string)
    }
}

fn meta(name: &str, version: &str, dependencies: &[&str]) -> Value {
    json!({
        "name": name,
        "version": version,
        "type": "meta",
        "dependencies": dependencies,
    })
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage:"));
}

#[cfg(unix)]
#[test]
fn test_install_runs_dependencies_first() {
    let ctx = TestContext::new();
    ctx.archive_package("base", "1.0", &[]);
    ctx.archive_package("lib", "1.0", &["base"]);
    ctx.archive_package("app", "1.0", &["lib", "base"]);

    let output = ctx.run(&["install", "app", "--yes"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(ctx.install_log(), vec!["base", "lib", "app"]);
    for name in ["base", "lib", "app"] {
        assert_eq!(ctx.installed_version(name).as_deref(), Some("1.0"));
    }
    assert!(ctx.home.join("build").join("app").join("VERSION").exists());
}

#[cfg(unix)]
#[test]
fn test_install_skips_installed_dependencies() {
    let ctx = TestContext::new();
    ctx.archive_package("base", "1.0", &[]);
    ctx.archive_package("app", "1.0", &["base"]);

    assert!(ctx.run(&["install", "base", "-y"]).status.success());
    assert!(ctx.run(&["install", "app", "-y"]).status.success());

    assert_eq!(ctx.install_log(), vec!["base", "app"]);
}

#[test]
fn test_installed_package_is_reported_not_reinstalled() {
    let ctx = TestContext::new();
    ctx.available(&meta("tool", "1", &[]));
    ctx.installed(&meta("tool", "1", &[]));

    let output = ctx.run(&["install", "tool", "-y"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("already installed"));
}

#[test]
fn test_dry_run_changes_nothing() {
    let ctx = TestContext::new();
    ctx.available(&meta("base", "1", &[]));
    ctx.available(&meta("group", "1", &["base"]));

    let output = ctx.run(&["--dry-run", "install", "group"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("group"));
    assert!(ctx.installed_version("group").is_none());
    assert!(ctx.installed_version("base").is_none());
}

#[test]
fn test_closed_stdin_cancels() {
    let ctx = TestContext::new();
    ctx.available(&meta("group", "1", &[]));

    let output = ctx.run(&["install", "group"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Cancelled"));
    assert!(ctx.installed_version("group").is_none());
}

#[test]
fn test_outdated_dependency_blocks_install() {
    let ctx = TestContext::new();
    ctx.available(&meta("lib", "2", &[]));
    ctx.available(&meta("app", "1", &["lib"]));
    ctx.installed(&meta("lib", "1", &[]));

    let output = ctx.run(&["install", "app", "-y"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("update dependencies first"));
    assert!(ctx.installed_version("app").is_none());

    let output = ctx.run(&["install", "app", "-y", "--reinstall-deps"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(ctx.installed_version("lib").as_deref(), Some("2"));
    assert_eq!(ctx.installed_version("app").as_deref(), Some("1"));
}

#[test]
fn test_unresolved_dependency_fails() {
    let ctx = TestContext::new();
    ctx.available(&meta("app", "1", &["ghost"]));

    let output = ctx.run(&["install", "app", "-y"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Can not resolve dependency 'ghost'"));
}

#[test]
fn test_git_package_is_unsupported() {
    let ctx = TestContext::new();
    ctx.available(&json!({"name": "repo", "version": "1", "type": "git"}));

    let output = ctx.run(&["install", "repo", "-y"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("can not be installed"));
    assert!(ctx.installed_version("repo").is_none());
}

#[test]
fn test_upgrade_rebuilds_dependents() {
    let ctx = TestContext::new();
    ctx.available(&meta("lib", "2", &[]));
    ctx.installed(&meta("lib", "1", &[]));
    ctx.installed(&meta("app", "1", &["lib"]));

    let output = ctx.run(&["upgrade", "-y"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    let lib = text.find("lib").unwrap();
    let app = text.find("app").unwrap();
    assert!(lib < app);
    assert_eq!(ctx.installed_version("lib").as_deref(), Some("2"));
    assert_eq!(ctx.installed_version("app").as_deref(), Some("1"));

    let output = ctx.run(&["upgrade", "-y"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("All packages are up to date."));
}

#[test]
fn test_list_and_available() {
    let ctx = TestContext::new();
    ctx.available(&meta("alpha", "1.0", &[]));
    ctx.available(&meta("beta", "2.0", &[]));
    ctx.installed(&meta("alpha", "1.0", &[]));

    let output = ctx.run(&["list"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("alpha"));
    assert!(!text.contains("beta"));
    assert!(text.contains("1 package installed"));

    let output = ctx.run(&["available"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("beta"));
    assert!(text.contains("2 packages available"));
}

#[test]
fn test_list_empty() {
    let ctx = TestContext::new();
    let output = ctx.run(&["list"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No packages installed."));
}

#[test]
fn test_search() {
    let ctx = TestContext::new();
    ctx.available(&meta("libfoo", "1", &[]));
    ctx.available(&meta("FooTool", "1", &[]));
    ctx.available(&meta("bar", "1", &[]));

    let output = ctx.run(&["search", "FOO"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("libfoo"));
    assert!(text.contains("FooTool"));
    assert!(!text.contains("bar"));

    let output = ctx.run(&["search", "nothing"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No packages found"));
}

#[test]
fn test_missing_available_directory_is_an_error() {
    let ctx = TestContext::new();
    fs::remove_dir_all(ctx.home.join("availablePackages")).unwrap();

    let output = ctx.run(&["available"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load available packages"));
}

#[test]
fn test_config_base_path() {
    let ctx = TestContext::new();
    let base = ctx.temp_dir.path().join("pkgs");
    fs::create_dir_all(base.join("availablePackages")).unwrap();
    fs::write(
        base.join("availablePackages").join("solo.json"),
        r#"{"name": "solo", "version": "1", "type": "meta"}"#,
    )
    .unwrap();
    fs::write(
        ctx.home.join("config.toml"),
        format!("base_path = {:?}\n", base.display().to_string()),
    )
    .unwrap();

    let output = ctx.run(&["install", "solo", "-y"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(base.join("installedPackages").join("solo.json").exists());
}
