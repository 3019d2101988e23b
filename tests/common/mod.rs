use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated checker environment: its own HOME, a shared storage root with
/// a `policies/` directory, and helpers for registry/package fixtures.
pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub shared: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let shared = tmp.path().join("shared");
        fs::create_dir_all(shared.join("policies")).expect("create policies dir");
        Self {
            _tmp: tmp,
            home,
            shared,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("polcheck").expect("polcheck binary");
        cmd.env("HOME", &self.home);
        cmd
    }

    /// Command with the four positional check inputs filled in.
    pub fn check_cmd(&self, file_path: &Path, file_uuid: &str, package_uuid: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.arg(file_path)
            .arg(file_uuid)
            .arg(package_uuid)
            .arg(&self.shared);
        cmd
    }

    /// Run a check in `--json` mode, assert the exit code, parse stdout.
    pub fn run_json(
        &self,
        file_path: &Path,
        file_uuid: &str,
        package_uuid: &str,
        extra: &[&str],
        code: i32,
    ) -> Value {
        let mut cmd = self.check_cmd(file_path, file_uuid, package_uuid);
        let out = cmd
            .arg("--json")
            .args(extra)
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn write_registry(&self, registry: &Value) {
        fs::write(
            self.shared.join("registry.json"),
            serde_json::to_string_pretty(registry).expect("serialize registry"),
        )
        .expect("write registry");
    }

    pub fn write_policy_doc(&self, name: &str, body: &str) {
        fs::write(self.shared.join("policies").join(name), body).expect("write policy doc");
    }

    /// Create a package tree under the shared root. Registry records for it
    /// should use the path from [`TestEnv::package_path`].
    pub fn make_package(&self, uuid: &str, with_logs: bool) -> PathBuf {
        let dir = self.shared.join(format!("pkg-{}", uuid));
        fs::create_dir_all(dir.join("objects")).expect("create package objects");
        if with_logs {
            fs::create_dir_all(dir.join("logs")).expect("create package logs");
        }
        dir
    }

    /// `current_path` registry value for a package from `make_package`.
    pub fn package_path(&self, uuid: &str) -> String {
        format!("%sharedPath%/pkg-{}", uuid)
    }

    pub fn make_target_file(&self, package_uuid: &str, name: &str) -> PathBuf {
        let objects = self.shared.join(format!("pkg-{}/objects", package_uuid));
        fs::create_dir_all(&objects).expect("create package objects");
        let path = objects.join(name);
        fs::write(&path, b"content").expect("write target file");
        path
    }

    /// Parsed lines of the validation event log; empty when nothing was
    /// recorded.
    pub fn events(&self) -> Vec<Value> {
        let path = self.shared.join("events.jsonl");
        if !path.exists() {
            return vec![];
        }
        fs::read_to_string(path)
            .expect("read events")
            .lines()
            .map(|line| serde_json::from_str(line).expect("event line json"))
            .collect()
    }
}

/// Shell command body that prints the given JSON object on stdout. Fixture
/// payloads must not contain single quotes.
#[allow(dead_code)]
pub fn emit_json(output: &Value) -> String {
    format!("printf '%s' '{}'", output)
}

/// Registry rule with a `command`-type rule command.
#[allow(dead_code)]
pub fn rule(format: Option<&str>, purpose: &str, description: &str, command: &str) -> Value {
    serde_json::json!({
        "format": format,
        "purpose": purpose,
        "command": {
            "script_type": "command",
            "command": command,
            "description": description,
            "tool": {"description": "MediaConch", "version": "16.12"}
        }
    })
}
