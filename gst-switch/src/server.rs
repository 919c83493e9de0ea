// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Lifecycle of the `gst-switch-srv` child process.
//!
//! A [`Server`] is configured with validated ports and paths, started once
//! with [`Server::run`] and stopped with [`Server::terminate`] (SIGTERM) or
//! [`Server::kill`] (SIGKILL). Once stopped, the record has no process and
//! every further stop request fails with [`Error::ServerProcess`].
//!
//! ```text
//! Unstarted ──run()──► Running ──terminate()/kill()──► Terminated
//! ```

use std::{
    fs::File,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use nix::{
    sys::signal::{self, Signal},
    unistd::Pid,
};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    config::{
        DEFAULT_AUDIO_PORT, DEFAULT_CONTROL_PORT, DEFAULT_RECORD_FILE, DEFAULT_VIDEO_PORT,
        MAKE_PROGRAM, SERVER_EXECUTABLE, SERVER_LOG_FILE, SLEEP_TIME, ServerConfig,
        TERMINATE_GRACE, default_tools_dir,
    },
    validate::{self, Value},
};

/// PID reported before the server has been started.
pub const NO_PID: i32 = -1;

fn no_process() -> Error {
    Error::ServerProcess("Server Process does not exist".to_string())
}

const REAP_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Waits up to `grace` for `child` to exit. Returns `false` if it is still
/// running afterwards.
fn reap(child: &mut Child, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(pid = child.id(), %status, "server exited");
                return true;
            }
            Ok(None) if Instant::now() < deadline => thread::sleep(REAP_POLL_INTERVAL),
            Ok(None) => return false,
            Err(error) => {
                warn!(pid = child.id(), %error, "unable to reap server process");
                return false;
            }
        }
    }
}

/// Configuration and process handle of one `gst-switch-srv` instance.
#[derive(Debug)]
pub struct Server {
    path: String,
    video_port: u16,
    audio_port: u16,
    control_port: u16,
    record_file: String,
    log_file: PathBuf,
    tools_dir: PathBuf,
    make_program: PathBuf,
    gst_option_string: String,
    proc: Option<Child>,
    pid: i32,
}

impl Server {
    /// Creates an unstarted server whose executables live in `path`, with
    /// the default ports (3000 video, 4000 audio, 5000 control) and record
    /// file.
    pub fn new(path: impl Into<Value>) -> Result<Self> {
        Ok(Self {
            path: validate::path(path)?,
            video_port: DEFAULT_VIDEO_PORT,
            audio_port: DEFAULT_AUDIO_PORT,
            control_port: DEFAULT_CONTROL_PORT,
            record_file: DEFAULT_RECORD_FILE.to_owned(),
            log_file: PathBuf::from(SERVER_LOG_FILE),
            tools_dir: default_tools_dir(),
            make_program: PathBuf::from(MAKE_PROGRAM),
            gst_option_string: String::new(),
            proc: None,
            pid: NO_PID,
        })
    }

    /// Creates an unstarted server from loaded configuration, validating
    /// every field.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let mut server = Self::new(config.path.as_path())?;
        server.set_video_port(config.video_port)?;
        server.set_audio_port(config.audio_port)?;
        server.set_control_port(config.control_port)?;
        server.set_record_file(config.record_file.as_str())?;
        server.set_log_file(&config.log_file);
        server.set_tools_dir(&config.tools_dir);
        Ok(server)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<Value>) -> Result<()> {
        self.path = validate::path(path)?;
        Ok(())
    }

    pub fn video_port(&self) -> u16 {
        self.video_port
    }

    pub fn set_video_port(&mut self, video_port: impl Into<Value>) -> Result<()> {
        self.video_port = validate::port("Video Port", video_port)?;
        Ok(())
    }

    pub fn audio_port(&self) -> u16 {
        self.audio_port
    }

    pub fn set_audio_port(&mut self, audio_port: impl Into<Value>) -> Result<()> {
        self.audio_port = validate::port("Audio Port", audio_port)?;
        Ok(())
    }

    pub fn control_port(&self) -> u16 {
        self.control_port
    }

    pub fn set_control_port(&mut self, control_port: impl Into<Value>) -> Result<()> {
        self.control_port = validate::port("Control Port", control_port)?;
        Ok(())
    }

    pub fn record_file(&self) -> &str {
        &self.record_file
    }

    pub fn set_record_file(&mut self, record_file: impl Into<Value>) -> Result<()> {
        self.record_file = validate::record_file(record_file)?;
        Ok(())
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Sets the file receiving the server's stdout and stderr.
    pub fn set_log_file(&mut self, log_file: impl AsRef<Path>) {
        self.log_file = log_file.as_ref().to_path_buf();
    }

    pub fn tools_dir(&self) -> &Path {
        &self.tools_dir
    }

    /// Sets the server build tree used by [`Server::make_coverage`].
    pub fn set_tools_dir(&mut self, tools_dir: impl AsRef<Path>) {
        self.tools_dir = tools_dir.as_ref().to_path_buf();
    }

    pub fn make_program(&self) -> &Path {
        &self.make_program
    }

    /// Sets the `make` used by [`Server::make_coverage`]; a bare name is
    /// looked up in `PATH`.
    pub fn set_make_program(&mut self, make_program: impl AsRef<Path>) {
        self.make_program = make_program.as_ref().to_path_buf();
    }

    /// Extra options passed to the last [`Server::run`].
    pub fn gst_option_string(&self) -> &str {
        &self.gst_option_string
    }

    /// PID of the spawned server, or [`NO_PID`] before [`Server::run`].
    pub fn pid(&self) -> i32 {
        self.pid
    }

    /// `true` while a process handle is held (started and not yet stopped).
    pub fn is_running(&self) -> bool {
        self.proc.is_some()
    }

    /// Full path of the server executable.
    pub fn executable(&self) -> PathBuf {
        Path::new(&self.path).join(SERVER_EXECUTABLE)
    }

    /// Arguments the executable is started with: the extra GStreamer
    /// options split on whitespace, then ports and record file.
    pub fn command_line(&self) -> Vec<String> {
        self.gst_option_string
            .split_whitespace()
            .map(str::to_owned)
            .chain([
                format!("--video-input-port={}", self.video_port),
                format!("--audio-input-port={}", self.audio_port),
                format!("--control-port={}", self.control_port),
                format!("--record={}", self.record_file),
            ])
            .collect()
    }

    /// Launches the server and waits [`SLEEP_TIME`] for it to come up.
    ///
    /// `gst_option` holds extra options for the server (for instance
    /// `"--gst-debug-no-color"`), separated by spaces.
    ///
    /// # Errors
    ///
    /// - [`Error::Path`] if the executable does not exist in the configured path
    /// - [`Error::ServerProcess`] if the log file cannot be opened, the
    ///   process cannot be spawned, or a process is already running
    pub fn run(&mut self, gst_option: &str) -> Result<()> {
        if self.proc.is_some() {
            return Err(Error::ServerProcess(
                "Server process is already running".to_string(),
            ));
        }
        self.gst_option_string = gst_option.to_owned();
        info!("Starting server");
        let child = self.start_process()?;
        self.pid = child.id() as i32;
        self.proc = Some(child);
        thread::sleep(SLEEP_TIME);
        Ok(())
    }

    fn start_process(&self) -> Result<Child> {
        let open_error = |error: std::io::Error| {
            Error::ServerProcess(format!(
                "Unable to open log file '{}': {error}",
                self.log_file.display()
            ))
        };
        let stdout = File::create(&self.log_file).map_err(open_error)?;
        let stderr = stdout.try_clone().map_err(open_error)?;

        let executable = self.executable();
        let args = self.command_line();
        info!("Creating process {} {}", executable.display(), args.join(" "));

        Command::new(&executable)
            .args(&args)
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|error| match error.kind() {
                ErrorKind::NotFound => Error::Path {
                    executable: SERVER_EXECUTABLE,
                    path: PathBuf::from(&self.path),
                },
                _ => Error::ServerProcess(format!(
                    "Internal error while launching process: {error}"
                )),
            })
    }

    /// Runs `make -C <tools_dir> coverage` to turn dumped gcov data into
    /// `.gcov` reports.
    ///
    /// A failing make target is only logged.
    ///
    /// # Errors
    ///
    /// [`Error::ServerProcess`] if `make` cannot be started.
    pub fn make_coverage(&self) -> Result<()> {
        debug!(tools_dir = %self.tools_dir.display(), "make coverage");
        let status = Command::new(&self.make_program)
            .arg("-C")
            .arg(&self.tools_dir)
            .arg("coverage")
            .status()
            .map_err(|error| {
                Error::ServerProcess(format!("Unable to run make coverage: {error}"))
            })?;
        if !status.success() {
            warn!(%status, "make coverage failed");
        }
        Ok(())
    }

    /// Asks the server to dump coverage data (SIGUSR1) without stopping it.
    pub fn gcov_flush(&self) -> Result<bool> {
        if self.proc.is_none() {
            return Err(Error::ServerProcess(
                "Server process does not exist".to_string(),
            ));
        }
        info!("GCOV FLUSH");
        signal::kill(Pid::from_raw(self.pid), Signal::SIGUSR1)
            .map_err(|errno| Error::ServerProcess(format!("Unable to send signal: {errno}")))?;
        Ok(true)
    }

    /// Stops the server gracefully (SIGTERM), waits up to
    /// [`TERMINATE_GRACE`] for it to exit and releases the process handle.
    ///
    /// With `cov` set, coverage is flushed and built first.
    ///
    /// # Errors
    ///
    /// [`Error::ServerProcess`] if no process is held or the signal cannot be
    /// delivered (try [`Server::kill`]).
    pub fn terminate(&mut self, cov: bool) -> Result<bool> {
        info!("Killing server");
        let child = self.proc.as_ref().ok_or_else(no_process)?;
        let pid = Pid::from_raw(child.id() as i32);
        if cov {
            self.gcov_flush()?;
            self.make_coverage()?;
        }
        signal::kill(pid, Signal::SIGTERM).map_err(|errno| {
            Error::ServerProcess(format!(
                "Cannot terminate server process. Try killing it: {errno}"
            ))
        })?;
        if let Some(mut child) = self.proc.take() {
            if !reap(&mut child, TERMINATE_GRACE) {
                warn!(%pid, "server still running {TERMINATE_GRACE:?} after SIGTERM");
            }
        }
        info!("Server Killed");
        Ok(true)
    }

    /// Stops the server forcefully by sending SIGKILL to its PID, then reaps it.
    ///
    /// With `cov` set, coverage is flushed and built first.
    pub fn kill(&mut self, cov: bool) -> Result<bool> {
        if self.proc.is_none() {
            return Err(no_process());
        }
        if cov {
            self.gcov_flush()?;
            self.make_coverage()?;
        }
        signal::kill(Pid::from_raw(self.pid), Signal::SIGKILL)
            .map_err(|errno| Error::ServerProcess(format!("Cannot kill process: {errno}")))?;
        if let Some(mut child) = self.proc.take() {
            // SIGKILL cannot be ignored, so this returns promptly
            if let Err(error) = child.wait() {
                warn!(pid = self.pid, %error, "unable to reap killed server");
            }
        }
        info!(pid = self.pid, "Server killed");
        Ok(true)
    }
}
