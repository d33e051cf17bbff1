//! Test fixtures that provide a scratch output directory together with a
//! warning sink that records diagnostics, so reporters can be exercised
//! against a real filesystem.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use femto_json_reporter::{JsonFileReporter, ReporterConfigBlock, WarnSink};
use rstest::fixture;
use serde_json::Value;
use tempfile::TempDir;

/// Sink storing warning messages for assertions.
#[derive(Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("RecordingSink mutex poisoned").clone()
    }
}

impl WarnSink for RecordingSink {
    fn warn(&self, message: &str, _error: Option<&dyn Error>) {
        self.messages
            .lock()
            .expect("RecordingSink mutex poisoned")
            .push(message.to_owned());
    }
}

/// Scratch directory plus the sink reporters built from it warn into.
pub struct Workspace {
    pub dir: TempDir,
    pub sink: RecordingSink,
}

impl Workspace {
    /// Configuration block writing into the scratch directory.
    pub fn block(&self, file_name: &str) -> ReporterConfigBlock {
        ReporterConfigBlock::new()
            .with_output_path(self.dir.path().display().to_string())
            .with_file_name(file_name)
    }

    /// Build a reporter, panicking on configuration errors.
    pub fn reporter(&self, block: ReporterConfigBlock) -> JsonFileReporter {
        JsonFileReporter::with_sink(&block, Arc::new(self.sink.clone()))
            .expect("configuration should resolve")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Parse an output file as strict JSON.
    pub fn read(&self, name: &str) -> Value {
        let text = fs::read_to_string(self.path(name)).expect("read output file");
        serde_json::from_str(&text).expect("output is strict JSON")
    }
}

/// Return a fresh workspace.
#[fixture]
pub fn workspace() -> Workspace {
    Workspace {
        dir: tempfile::tempdir().expect("create scratch dir"),
        sink: RecordingSink::default(),
    }
}
