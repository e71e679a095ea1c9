use std::{
    path::{Path, PathBuf},
    process::{Output, Stdio},
};

use tempfile::TempDir;

/// A scratch directory with the fixture sources copied in.
#[derive(Debug)]
pub struct Workspace {
    pub folder: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Workspace, std::io::Error> {
        let folder = tempfile::tempdir()?;
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        for entry in std::fs::read_dir(fixtures)? {
            let entry = entry?;
            std::fs::copy(entry.path(), folder.path().join(entry.file_name()))?;
        }
        Ok(Workspace { folder })
    }

    #[allow(unused)]
    pub fn path(&self, name: &str) -> PathBuf {
        self.folder.path().join(name)
    }

    #[allow(unused)]
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("failed to write test file");
        path
    }
}

pub fn run_program(program: &Path, args: &[&str], cwd: &Path) -> Result<Output, std::io::Error> {
    std::process::Command::new(program)
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?
        .wait_with_output()
}

#[allow(unused)]
#[track_caller]
pub fn run_coder(args: &[&str], cwd: &Path) -> Output {
    run_program(Path::new(env!("CARGO_BIN_EXE_coder")), args, cwd).expect("failed to run coder")
}

#[allow(unused)]
#[track_caller]
pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}
