// mediabot-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use std::cell::RefCell;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::rc::Rc;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;

use super::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use super::ytdlp::YtDlpRunner;
use crate::error::{CoreError, CoreResult};
use crate::fetch::MediaFetcher;

// ============================================================================
// FFMPEG
// ============================================================================

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    /// Bytes written to the output path (the last argument) on spawn.
    pub output: Option<Vec<u8>>,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each expectation is matched by a substring of any argument and consumed
/// on first match.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        output: Option<Vec<u8>>,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            output,
        });
    }

    pub fn add_success_expectation(&self, arg_pattern: &str, output: Option<Vec<u8>>) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(Vec::new())),
            exit_status: ExitStatus::from_raw(0),
        };
        self.add_expectation(arg_pattern, Ok(process), output);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), None);
    }

    pub fn add_exit_error_expectation(&self, arg_pattern: &str, exit_code: i32) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(vec![FfmpegEvent::Error(format!(
                "mock ffmpeg failure for '{arg_pattern}'"
            ))])),
            // Raw wait status: the exit code lives in the second byte.
            exit_status: ExitStatus::from_raw(exit_code << 8),
        };
        self.add_expectation(arg_pattern, Ok(process), None);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .as_inner()
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            panic!("MockFfmpegSpawner: No expectation found for command args: {args:?}");
        };
        let expectation = expectations.remove(index);
        log::info!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        let process = expectation.result?;
        if let (Some(bytes), Some(output_path)) = (expectation.output, args.last()) {
            if let Err(e) = std::fs::write(output_path, bytes) {
                log::error!("MockFfmpegSpawner failed to write output {}: {}", output_path, e);
            }
        }
        Ok(process)
    }
}

// ============================================================================
// YT-DLP
// ============================================================================

/// What a mocked yt-dlp run does.
pub struct MockYtDlpExpectation {
    pub arg_pattern: String,
    /// Files to create, named `<stem><suffix>` where the stem is taken from
    /// the `-o` template (everything before `%(`).
    pub created_suffixes: Vec<(String, Vec<u8>)>,
    /// Suffix of the filename printed on stdout, or an error to return.
    pub result: CoreResult<String>,
}

/// Mock implementation of `YtDlpRunner`.
#[derive(Clone, Default)]
pub struct MockYtDlpRunner {
    expectations: Rc<RefCell<Vec<MockYtDlpExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockYtDlpRunner {
    pub fn new() -> Self {
        Default::default()
    }

    /// Simulates a run that writes the given files and prints `<stem><printed_suffix>`.
    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        created: &[(&str, &[u8])],
        printed_suffix: &str,
    ) {
        self.expectations.borrow_mut().push(MockYtDlpExpectation {
            arg_pattern: arg_pattern.to_string(),
            created_suffixes: created
                .iter()
                .map(|(suffix, bytes)| (suffix.to_string(), bytes.to_vec()))
                .collect(),
            result: Ok(printed_suffix.to_string()),
        });
    }

    pub fn add_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.expectations.borrow_mut().push(MockYtDlpExpectation {
            arg_pattern: arg_pattern.to_string(),
            created_suffixes: Vec::new(),
            result: Err(error),
        });
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl YtDlpRunner for MockYtDlpRunner {
    fn run(&self, args: &[String]) -> CoreResult<String> {
        self.received_calls.borrow_mut().push(args.to_vec());

        let mut expectations = self.expectations.borrow_mut();
        let Some(index) = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)))
        else {
            panic!("MockYtDlpRunner: No expectation found for args: {args:?}");
        };
        let expectation = expectations.remove(index);

        let template = args
            .iter()
            .position(|a| a == "-o")
            .and_then(|i| args.get(i + 1))
            .expect("MockYtDlpRunner: no -o template in args");
        let stem = template.split("%(").next().unwrap_or(template);

        for (suffix, bytes) in &expectation.created_suffixes {
            let path = PathBuf::from(format!("{stem}{suffix}"));
            std::fs::write(&path, bytes).expect("MockYtDlpRunner failed to create file");
        }

        expectation.result.map(|suffix| format!("{stem}{suffix}\n"))
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Mock implementation of `MediaFetcher` serving canned bodies per URL.
///
/// Unknown URLs answer with HTTP 404.
#[derive(Clone, Default)]
pub struct MockFetcher {
    responses: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    requested: Rc<RefCell<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_response(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.responses.borrow_mut().insert(url.to_string(), body.into());
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl MediaFetcher for MockFetcher {
    fn fetch_bytes(&self, url: &str) -> CoreResult<Vec<u8>> {
        self.requested.borrow_mut().push(url.to_string());
        self.responses
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| CoreError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}
