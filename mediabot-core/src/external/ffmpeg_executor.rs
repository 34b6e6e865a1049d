// ============================================================================
// mediabot-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// Traits for spawning ffmpeg and driving it to completion, with a concrete
// implementation on top of ffmpeg-sidecar. The transcoder only talks to the
// traits, so tests can substitute `MockFfmpegSpawner`.

use std::process::ExitStatus;

use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};

use crate::error::{command_failed_error, command_start_error, command_wait_error, CoreResult};

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error("ffmpeg", ExitStatus::default(), e.to_string())
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0.wait().map_err(|e| command_wait_error("ffmpeg", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg", e))
    }
}

/// Outcome of a finished ffmpeg run.
#[derive(Debug)]
pub struct FfmpegRun {
    pub status: ExitStatus,
    /// Error and fatal log lines emitted by ffmpeg.
    pub errors: Vec<String>,
}

/// Spawns `cmd`, drains its event stream and waits for it to exit.
///
/// Draining stderr before waiting keeps ffmpeg from blocking on a full pipe.
/// There is no timeout: callers needing bounded latency must add a watchdog.
pub fn run_ffmpeg<S: FfmpegSpawner>(spawner: &S, cmd: FfmpegCommand) -> CoreResult<FfmpegRun> {
    let mut process = spawner.spawn(cmd)?;
    let mut errors = Vec::new();

    process.handle_events(|event| {
        match event {
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) | FfmpegEvent::Error(line) => {
                log::debug!("ffmpeg: {}", line);
                errors.push(line);
            }
            FfmpegEvent::Log(_, line) => log::trace!("ffmpeg: {}", line),
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    Ok(FfmpegRun { status, errors })
}
