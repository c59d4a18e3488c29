use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Isolated sandbox for running the `october` binary: its own project
/// directory, template staging directory and XDG homes.
#[allow(dead_code)]
pub struct TestContext {
    pub root: TempDir,
    pub project_dir: PathBuf,
    pub template_dir: PathBuf,
    pub bin_path: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let project_dir = root.path().join("project");
        std::fs::create_dir_all(&project_dir).expect("Failed to create project dir");
        let template_dir = root.path().join("templates");

        Self {
            project_dir,
            template_dir,
            bin_path: PathBuf::from(env!("CARGO_BIN_EXE_october")),
            root,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.current_dir(&self.project_dir);
        cmd.env("OCTOBER_TEMPLATE_DIR", &self.template_dir);
        cmd.env("HOME", self.root.path());
        cmd.env("XDG_DATA_HOME", self.root.path().join("data"));
        cmd.env("XDG_CONFIG_HOME", self.root.path().join("config"));
        cmd.env_remove("RUST_LOG");
        cmd.env_remove("OCTOBER_ARCHIVE_URL");
        cmd.env_remove("OCTOBER_HTACCESS_URL");
        cmd.env_remove("OCTOBER_RELEASE_VERSION");
        cmd
    }

    pub fn project(&self, relative: &str) -> PathBuf {
        self.project_dir.join(relative)
    }

    pub fn run(&self, args: &[&str]) -> CommandOutput {
        self.cmd()
            .args(args)
            .output()
            .expect("Failed to run october")
            .into()
    }
}

#[allow(dead_code)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }
}

#[allow(dead_code)]
impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.status.success() {
            panic!(
                "Command failed with status {:?}\nstdout: {}\nstderr: {}",
                self.status.code(),
                self.stdout,
                self.stderr
            );
        }
        self
    }

    pub fn assert_failure(&self) -> &Self {
        assert_eq!(
            self.status.code(),
            Some(1),
            "Expected exit code 1\nstdout: {}\nstderr: {}",
            self.stdout,
            self.stderr
        );
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Stdout did not contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Stderr did not contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}

#[allow(dead_code)]
pub fn has_temp_archive(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .filter_map(|e| e.ok())
        .any(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            name.starts_with("october_") && name.ends_with(".zip")
        })
}
