use std::path::{Path, PathBuf};

mod test_binary;
pub use test_binary::test_binary_main;

fn exe_name(name: &str) -> String {
    format!("{}{}", name, std::env::consts::EXE_SUFFIX)
}

/// A private copy of the `test-binary` executable in its own directory, which
/// doubles as the place it reads its instructions from and records its
/// arguments to.
pub struct FakeSync {
    dir: tempfile::TempDir,
}

impl FakeSync {
    const TARGET_BINARY_NAME: &'static str = "fake-sync";

    pub fn new(test_binary: &Path) -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        // a copy rather than a symlink: current_exe() resolves symlinks
        std::fs::copy(
            test_binary,
            dir.path().join(exe_name(Self::TARGET_BINARY_NAME)),
        )
        .unwrap();
        Self { dir }
    }

    pub fn with_exit_status(self, exit_status: i32) -> Self {
        std::fs::write(self.path().join("exit-status"), exit_status.to_string()).unwrap();
        self
    }

    pub fn with_stdout(self, stdout: impl AsRef<[u8]>) -> Self {
        std::fs::write(self.path().join("stdout"), stdout.as_ref()).unwrap();
        self
    }

    pub fn with_stderr(self, stderr: impl AsRef<[u8]>) -> Self {
        std::fs::write(self.path().join("stderr"), stderr.as_ref()).unwrap();
        self
    }

    pub fn with_sleep_millis(self, millis: u64) -> Self {
        std::fs::write(self.path().join("sleep-millis"), millis.to_string()).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn executable(&self) -> PathBuf {
        self.dir.path().join(exe_name(Self::TARGET_BINARY_NAME))
    }

    pub fn was_run(&self) -> bool {
        self.path().join("args").exists()
    }

    pub fn assert_args(&self, args: &[impl AsRef<str>]) {
        let recorded = std::fs::read_to_string(self.path().join("args")).unwrap();
        let recorded = recorded.lines().collect::<Vec<_>>();
        let args = args.iter().map(|s| s.as_ref()).collect::<Vec<_>>();
        assert_eq!(recorded, args);
    }
}
