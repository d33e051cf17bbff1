//! The browser log reporter.
//!
//! `JsonFileReporter` ties the pipeline together: each console message is
//! normalised, filtered and appended to the current target file. Setup is
//! fail-fast: a malformed configuration means no reporter at all. Once
//! running, a failure only ever costs the message being processed; nothing
//! is propagated back to the host.
//!
//! Intake is synchronous and runs to completion before returning. Wrap the
//! reporter in a [`SharedReporter`] when messages arrive on several threads.

use std::{error::Error, path::PathBuf, sync::Arc};

use parking_lot::Mutex;

use crate::{
    config::{ConfigError, ReporterConfigBlock, ResolvedConfig},
    file_naming::{FileNamer, ensure_directory, remove_stale_file},
    filters::RecordFilter,
    normalizer::{RawMessage, normalize},
    store::JsonArrayStore,
    warn_sink::{LOG_TARGET, LogWarnSink, WarnSink},
};

/// Name under which hosts register the reporter.
pub const REPORTER_NAME: &str = "reporter:json-to-file";

/// What happened to a single intercepted message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// The payload did not yield a record.
    Dropped,
    /// The record was rejected by the filter.
    Filtered,
    /// The record was written; `count` is the new length of the file's array.
    Appended { path: PathBuf, count: usize },
    /// The append failed and was reported through the warning sink.
    Failed { path: PathBuf },
}

/// Appends intercepted browser log records to a JSON array file.
pub struct JsonFileReporter {
    filter: RecordFilter,
    namer: FileNamer,
    store: JsonArrayStore,
    sink: Arc<dyn WarnSink>,
}

impl JsonFileReporter {
    /// Build a reporter that warns through the `log` crate.
    pub fn new(block: &ReporterConfigBlock) -> Result<Self, ConfigError> {
        Self::with_sink(block, Arc::new(LogWarnSink))
    }

    /// Build a reporter that warns through `sink`.
    pub fn with_sink(
        block: &ReporterConfigBlock,
        sink: Arc<dyn WarnSink>,
    ) -> Result<Self, ConfigError> {
        let config = ResolvedConfig::resolve(block)?;
        Ok(Self::from_resolved(config, sink))
    }

    /// Build a reporter for hosts that cannot handle a construction error.
    ///
    /// A configuration error is reported through `sink` and `None` is
    /// returned, meaning no intake callback should be installed.
    pub fn install(block: &ReporterConfigBlock, sink: Arc<dyn WarnSink>) -> Option<Self> {
        match Self::with_sink(block, Arc::clone(&sink)) {
            Ok(reporter) => Some(reporter),
            Err(err) => {
                sink.warn(&err.to_string(), None);
                None
            }
        }
    }

    /// Start a reporter from an already validated configuration.
    ///
    /// Creates the output directory and, in overwrite mode, removes the file
    /// at the first computed path. Failures of either step are warned and
    /// otherwise ignored.
    pub fn from_resolved(config: ResolvedConfig, sink: Arc<dyn WarnSink>) -> Self {
        let ResolvedConfig {
            output_path,
            file_name,
            filter,
            overwrite,
        } = config;
        if let Err(err) = ensure_directory(&output_path) {
            sink.warn(
                &format!("Unable to create path \"{}\"", output_path.display()),
                Some(&err),
            );
        }
        let mut namer = FileNamer::new(output_path, file_name);
        if overwrite {
            let path = namer.compute_path();
            if let Err(err) = remove_stale_file(&path) {
                sink.warn(
                    &format!("Unable to remove old file \"{}\"", path.display()),
                    Some(&err),
                );
            }
        }
        Self {
            filter,
            namer,
            store: JsonArrayStore::new(),
            sink,
        }
    }

    /// Host callback for one console message.
    ///
    /// The browser handle and message type are accepted for signature
    /// compatibility and not inspected.
    pub fn on_browser_log<B: ?Sized>(
        &mut self,
        _browser: &B,
        log: impl Into<RawMessage>,
        _log_type: &str,
    ) {
        self.process(log.into());
    }

    /// Run one message through the pipeline and report what happened.
    pub fn process(&mut self, raw: RawMessage) -> IntakeOutcome {
        let Some(record) = normalize(raw) else {
            return IntakeOutcome::Dropped;
        };
        if !self.filter.passes(&record, self.sink.as_ref()) {
            log::debug!(target: LOG_TARGET, "record rejected by filter");
            return IntakeOutcome::Filtered;
        }
        let path = self.namer.compute_path();
        match self.store.append(record, &path) {
            Ok(count) => IntakeOutcome::Appended { path, count },
            Err(err) => {
                self.sink
                    .warn(&err.to_string(), err.source().map(|e| e as &dyn Error));
                IntakeOutcome::Failed { path }
            }
        }
    }

    /// Index the next computed path will use.
    pub fn next_file_index(&self) -> u64 {
        self.namer.next_index()
    }

    /// Session start time in epoch milliseconds.
    pub fn start_timestamp(&self) -> i64 {
        self.namer.start_timestamp()
    }
}

/// Thread-safe wrapper serialising intakes through a mutex.
pub struct SharedReporter {
    inner: Mutex<JsonFileReporter>,
}

impl SharedReporter {
    pub fn new(reporter: JsonFileReporter) -> Self {
        Self {
            inner: Mutex::new(reporter),
        }
    }

    /// See [`JsonFileReporter::on_browser_log`].
    pub fn on_browser_log<B: ?Sized>(
        &self,
        browser: &B,
        log: impl Into<RawMessage>,
        log_type: &str,
    ) {
        self.inner.lock().on_browser_log(browser, log, log_type);
    }

    /// See [`JsonFileReporter::process`].
    pub fn process(&self, raw: RawMessage) -> IntakeOutcome {
        self.inner.lock().process(raw)
    }

    pub fn into_inner(self) -> JsonFileReporter {
        self.inner.into_inner()
    }
}

impl From<JsonFileReporter> for SharedReporter {
    fn from(value: JsonFileReporter) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{filters::Predicate, test_utils::CollectingWarnSink};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::{TempDir, tempdir};

    struct Harness {
        dir: TempDir,
        sink: CollectingWarnSink,
    }

    impl Harness {
        fn block(&self) -> ReporterConfigBlock {
            ReporterConfigBlock::new()
                .with_output_path(self.dir.path().display().to_string())
                .with_file_name("log.json")
        }

        fn reporter(&self, block: ReporterConfigBlock) -> JsonFileReporter {
            JsonFileReporter::with_sink(&block, Arc::new(self.sink.clone()))
                .expect("configuration should resolve")
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn read(&self, name: &str) -> Value {
            let text = fs::read_to_string(self.path(name)).expect("read output");
            serde_json::from_str(&text).expect("output is strict JSON")
        }
    }

    #[fixture]
    fn harness() -> Harness {
        Harness {
            dir: tempdir().expect("tempdir"),
            sink: CollectingWarnSink::new(),
        }
    }

    #[rstest]
    fn appends_records_in_arrival_order(harness: Harness) {
        let mut reporter = harness.reporter(harness.block());
        reporter.on_browser_log("Chrome", "{n: 1}", "log");
        reporter.on_browser_log("Chrome", json!({"n": 2}), "log");
        reporter.on_browser_log("Chrome", "'{\"n\":3}'", "info");
        assert_eq!(harness.read("log.json"), json!([{"n": 1}, {"n": 2}, {"n": 3}]));
        assert!(harness.sink.collected().is_empty());
    }

    #[rstest]
    fn garbage_is_dropped_silently(harness: Harness) {
        let mut reporter = harness.reporter(harness.block());
        assert_eq!(reporter.process("not json".into()), IntakeOutcome::Dropped);
        assert_eq!(reporter.process(RawMessage::Absent), IntakeOutcome::Dropped);
        assert!(!harness.path("log.json").exists());
        assert!(harness.sink.collected().is_empty());
        assert_eq!(reporter.next_file_index(), 0);
    }

    #[rstest]
    fn filtered_records_do_not_advance_the_index(harness: Harness) {
        let mut reporter = harness.reporter(harness.block().with_filter("keep"));
        assert_eq!(reporter.process("{keep: 0}".into()), IntakeOutcome::Filtered);
        assert_eq!(reporter.next_file_index(), 0);
        let outcome = reporter.process("{keep: 1}".into());
        assert_eq!(
            outcome,
            IntakeOutcome::Appended {
                path: harness.path("log.json"),
                count: 1
            }
        );
    }

    #[rstest]
    fn index_template_spreads_records_over_files(harness: Harness) {
        let mut reporter = harness.reporter(harness.block().with_file_name("f_*index*.json"));
        for n in 0..3 {
            reporter.on_browser_log("Firefox", json!({ "n": n }), "log");
        }
        assert_eq!(harness.read("f_0.json"), json!([{"n": 0}]));
        assert_eq!(harness.read("f_1.json"), json!([{"n": 1}]));
        assert_eq!(harness.read("f_2.json"), json!([{"n": 2}]));
    }

    #[rstest]
    fn non_array_file_is_left_alone_and_warned(harness: Harness) {
        fs::write(harness.path("log.json"), "{\"a\":1}").expect("seed");
        let mut reporter = harness.reporter(harness.block());
        let outcome = reporter.process(json!({"b": 2}).into());
        assert_eq!(
            outcome,
            IntakeOutcome::Failed {
                path: harness.path("log.json")
            }
        );
        assert_eq!(
            fs::read_to_string(harness.path("log.json")).expect("read"),
            "{\"a\":1}"
        );
        let warnings = harness.sink.messages();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("can not parse json file"));
    }

    #[rstest]
    fn keeps_running_after_a_failed_append(harness: Harness) {
        let mut reporter = harness.reporter(harness.block().with_file_name("*index*.json"));
        // index 0 -> 0.json succeeds, index 1 -> 1.json is unparsable
        fs::write(harness.path("1.json"), "{broken").expect("seed");
        reporter.on_browser_log("Chrome", "{a: 1}", "log");
        reporter.on_browser_log("Chrome", "{a: 2}", "log");
        reporter.on_browser_log("Chrome", "{a: 3}", "log");
        assert_eq!(harness.read("0.json"), json!([{"a": 1}]));
        assert_eq!(harness.read("2.json"), json!([{"a": 3}]));
        assert_eq!(harness.sink.collected().len(), 1);
    }

    #[rstest]
    fn overwrite_removes_stale_file_before_first_message(harness: Harness) {
        fs::write(harness.path("log.json"), "[{\"old\": true}]").expect("seed");
        let mut reporter = harness.reporter(harness.block().with_overwrite(true));
        assert!(!harness.path("log.json").exists());
        assert_eq!(reporter.next_file_index(), 1);
        reporter.on_browser_log("Chrome", "{fresh: true}", "log");
        assert_eq!(harness.read("log.json"), json!([{"fresh": true}]));
    }

    #[rstest]
    fn unremovable_stale_file_is_warned_not_fatal(harness: Harness) {
        // a non-empty directory where the log file should be cannot be unlinked
        fs::create_dir_all(harness.path("log.json").join("inner")).expect("seed dir");
        let mut reporter = harness.reporter(harness.block().with_overwrite(true));
        assert_eq!(reporter.next_file_index(), 1);
        let warnings = harness.sink.collected();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].message,
            format!(
                "Unable to remove old file \"{}\"",
                harness.path("log.json").display()
            )
        );
        assert!(warnings[0].error.is_some());
        assert!(harness.path("log.json").is_dir());
        assert_eq!(
            reporter.process("{late: true}".into()),
            IntakeOutcome::Failed {
                path: harness.path("log.json")
            }
        );
    }

    #[rstest]
    fn without_overwrite_existing_records_are_kept(harness: Harness) {
        fs::write(harness.path("log.json"), "[{\"old\": true}]").expect("seed");
        let mut reporter = harness.reporter(harness.block());
        reporter.on_browser_log("Chrome", "{fresh: true}", "log");
        assert_eq!(
            harness.read("log.json"),
            json!([{"old": true}, {"fresh": true}])
        );
    }

    #[rstest]
    fn creates_nested_output_directory(harness: Harness) {
        let nested = harness.path("a/b/c");
        let block = ReporterConfigBlock::new()
            .with_output_path(nested.display().to_string())
            .with_file_name("log.json");
        let mut reporter = harness.reporter(block);
        assert!(nested.is_dir());
        reporter.on_browser_log("Chrome", "{x: 1}", "log");
        assert!(nested.join("log.json").is_file());
    }

    #[rstest]
    fn unusable_output_directory_is_warned_not_fatal(harness: Harness) {
        let blocker = harness.path("blocker");
        fs::write(&blocker, "").expect("seed");
        let block = ReporterConfigBlock::new()
            .with_output_path(blocker.join("sub").display().to_string())
            .with_file_name("log.json");
        let mut reporter = harness.reporter(block);
        let outcome = reporter.process("{x: 1}".into());
        assert!(matches!(outcome, IntakeOutcome::Failed { .. }));
        let warnings = harness.sink.messages();
        assert!(warnings[0].starts_with("Unable to create path"));
        assert!(warnings[1].starts_with("can not read file"));
    }

    #[rstest]
    fn failing_predicate_drops_the_record(harness: Harness) {
        let block = harness
            .block()
            .with_predicate(Predicate::new(|_| Err("predicate exploded".into())));
        let mut reporter = harness.reporter(block);
        assert_eq!(reporter.process("{a: 1}".into()), IntakeOutcome::Filtered);
        assert_eq!(harness.sink.messages(), vec!["`filter` execution error"]);
    }

    #[rstest]
    fn install_warns_and_refuses_bad_configuration(harness: Harness) {
        let mut block = harness.block();
        block.output_path = Some(json!(42));
        let reporter = JsonFileReporter::install(&block, Arc::new(harness.sink.clone()));
        assert!(reporter.is_none());
        assert_eq!(
            harness.sink.messages(),
            vec!["`outputPath` parameter should be string"]
        );
    }

    #[rstest]
    fn shared_reporter_serialises_intakes(harness: Harness) {
        let shared = SharedReporter::from(harness.reporter(harness.block()));
        std::thread::scope(|scope| {
            for n in 0..4 {
                let shared = &shared;
                scope.spawn(move || shared.on_browser_log("Chrome", json!({ "n": n }), "log"));
            }
        });
        let records = harness.read("log.json");
        assert_eq!(records.as_array().map(Vec::len), Some(4));
        assert_eq!(shared.into_inner().next_file_index(), 4);
    }
}
