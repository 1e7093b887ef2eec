//! Shared test infrastructure for integration tests.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Captured result of one `emp-intake` invocation.
#[derive(Debug)]
pub struct RunOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn assert_stdout_contains(&self, needle: &str) {
        assert!(
            self.stdout.contains(needle),
            "stdout missing {needle:?}\n--- stdout ---\n{}\n--- stderr ---\n{}",
            self.stdout,
            self.stderr
        );
    }

    pub fn count(&self, needle: &str) -> usize {
        self.stdout.matches(needle).count()
    }
}

/// A scratch working directory so no stray `intake.json` is picked up.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp workspace"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run the binary with `args`, feeding `lines` on stdin and closing it.
    pub fn run(&self, args: &[&str], lines: &[&str]) -> RunOutput {
        let mut child = Command::new(env!("CARGO_BIN_EXE_emp-intake"))
            .args(args)
            .current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("INTAKE_PROJECT_ID")
            .env_remove("INTAKE_ACCESS_TOKEN")
            .env_remove("FIRESTORE_EMULATOR_HOST")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn emp-intake");

        {
            let mut stdin = child.stdin.take().expect("stdin piped");
            for line in lines {
                writeln!(stdin, "{line}").expect("write stdin");
            }
        }

        let output = child.wait_with_output().expect("wait for emp-intake");
        RunOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Answers for one full registration with department 1, role 1, no salary.
pub fn employee(name: &str, pf: &str, email: &str, phone: &str) -> Vec<String> {
    [name, pf, email, phone, "1", "1", ""]
        .iter()
        .map(|answer| answer.to_string())
        .collect()
}
