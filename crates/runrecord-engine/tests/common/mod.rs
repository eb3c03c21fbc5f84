// Shared fixtures for engine integration tests

use runrecord_core::Layout;
use runrecord_engine::{BuildSettings, Invocation, ProcessRunner, RawOutput};
use runrecord_store::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One call seen by `FakeRunner`
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub struct RecordedCall {
    pub argv: Vec<String>,
    pub stdin: Vec<u8>,
    pub workdir: PathBuf,
    pub env: Vec<(String, String)>,
}

/// Runner that never spawns anything
///
/// Replies with fixed output, or echoes its stdin back, and records every
/// call.
#[derive(Debug, Default)]
pub struct FakeRunner {
    reply: Option<Vec<u8>>,
    exit_code: i32,
    pub calls: Vec<RecordedCall>,
}

#[allow(dead_code)]
impl FakeRunner {
    /// Output is the code it was fed
    pub fn echoing() -> Self {
        Self::default()
    }

    pub fn replying(output: &str, exit_code: i32) -> Self {
        Self {
            reply: Some(output.as_bytes().to_vec()),
            exit_code,
            calls: Vec::new(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&mut self, invocation: &Invocation<'_>) -> Result<RawOutput> {
        self.calls.push(RecordedCall {
            argv: invocation.argv.to_vec(),
            stdin: invocation.stdin.to_vec(),
            workdir: invocation.workdir.to_path_buf(),
            env: invocation.env.to_vec(),
        });
        Ok(RawOutput {
            output: self
                .reply
                .clone()
                .unwrap_or_else(|| invocation.stdin.to_vec()),
            exit_code: self.exit_code,
        })
    }
}

/// Temp document tree with a doc root and a base workdir inside it
#[allow(dead_code)]
pub struct Fixture {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn doc_root(&self) -> PathBuf {
        self.dir.path().join("docs")
    }

    pub fn cast_dir(&self) -> PathBuf {
        self.dir.path().join("casts")
    }

    pub fn settings(&self) -> BuildSettings {
        BuildSettings::new(Layout::new(self.doc_root(), self.dir.path().join("work")))
    }

    pub fn settings_with_casts(&self) -> BuildSettings {
        let mut settings = self.settings();
        settings.cast_dir = Some(self.cast_dir());
        settings
    }

    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }
}
