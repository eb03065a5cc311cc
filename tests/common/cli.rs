//! Harness for driving the `unifi-restore` binary against a stub import tool.

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

/// Stand-in for mongoimport: logs `<collection>\t<payload>` per call and
/// fails any payload containing `"fail"`.
const STUB_TOOL: &str = r#"#!/bin/sh
collection="$6"
payload=$(cat)
printf '%s\t%s\n' "$collection" "$payload" >> '@LOG@'
case "$payload" in
  *'"fail"'*) echo "Failed: stub rejected document" >&2; exit 1 ;;
esac
echo "1 document(s) imported successfully."
"#;

pub struct RestoreWorkspace {
    _temp: TempDir,
    pub root: PathBuf,
    pub log: PathBuf,
    pub tool: PathBuf,
}

impl RestoreWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("tempdir");
        let root = temp.path().to_path_buf();
        let log = root.join("invocations.log");
        let tool = root.join("fake-mongoimport");

        fs::write(&tool, STUB_TOOL.replace("@LOG@", &log.display().to_string()))
            .expect("write stub tool");
        make_executable(&tool);

        Self {
            _temp: temp,
            root,
            log,
            tool,
        }
    }

    /// Write a dump with one entry per line, each newline-terminated.
    pub fn write_dump(&self, name: &str, lines: &[&str]) -> PathBuf {
        let path = self.root.join(name);
        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(&path, content).expect("write dump");
        path
    }

    /// `(collection, payload)` for every stub invocation, in order.
    pub fn invocations(&self) -> Vec<(String, String)> {
        let Ok(log) = fs::read_to_string(&self.log) else {
            return Vec::new();
        };
        log.lines()
            .map(|line| {
                let (collection, payload) = line.split_once('\t').expect("tab-separated entry");
                (collection.to_string(), payload.to_string())
            })
            .collect()
    }
}

pub struct RunOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run the binary with small scan limits and the stub tool; `envs` are
/// applied last and may override either.
pub fn run_restore<I, S>(
    workspace: &RestoreWorkspace,
    args: I,
    envs: &[(&str, &str)],
    label: &str,
) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::cargo_bin("unifi-restore").expect("binary exists");
    cmd.current_dir(&workspace.root)
        .env_remove("RUST_LOG")
        .env_remove("UNIFI_RESTORE_HOST")
        .env_remove("UNIFI_RESTORE_DB")
        .env_remove("UNIFI_RESTORE_ON_ERROR")
        .env("BUFFER_SIZE_GB", "1")
        .env("TOKEN_SIZE_MB", "1")
        .env("UNIFI_RESTORE_TOOL", &workspace.tool)
        .args(args);
    for (key, value) in envs {
        cmd.env(key, value);
    }

    let output = cmd.output().expect("run unifi-restore");
    let result = RunOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !result.status.success() {
        eprintln!("[{label}] stderr:\n{}", result.stderr);
    }
    result
}

#[cfg(unix)]
fn make_executable(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod stub tool");
}

#[cfg(not(unix))]
fn make_executable(_path: &std::path::Path) {}
