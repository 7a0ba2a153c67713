//! External command execution.
//!
//! Commands are built from structured argument lists and never go through a
//! shell. Output is streamed to the terminal line by line while it is being
//! captured, so long-running tools stay visible and callers still get the
//! text back.

use crate::bundler::error::{Error, Result};
use std::{
    ffi::{OsStr, OsString},
    io::Write,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// What to do with the child's output while it runs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputMode {
    /// Echo every line to our own stdout/stderr and capture it.
    #[default]
    Stream,
    /// Capture only.
    Capture,
}

/// Where a drained line is echoed.
#[derive(Clone, Copy)]
enum Echo {
    Stdout,
    Stderr,
}

/// Output of a command that exited successfully.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status (always a success).
    pub status: ExitStatus,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// A program invocation with its arguments, working directory and secrets.
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: OsString,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
    secrets: Vec<String>,
    mode: OutputMode,
}

impl ExternalCommand {
    /// Starts a command for `program`.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            current_dir: None,
            secrets: Vec::new(),
            mode: OutputMode::default(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Runs the command from `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Marks a value that must never appear in logs or error messages.
    pub fn secret(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.secrets.push(value);
        }
        self
    }

    /// Captures output without echoing it.
    pub fn capture(mut self) -> Self {
        self.mode = OutputMode::Capture;
        self
    }

    /// Command line for display, with secrets replaced by `***`.
    pub fn display(&self) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        self.redact(&line)
    }

    /// Reads `reader` to EOF, line by line, optionally echoing each line.
    ///
    /// Lines are decoded lossily; invalid UTF-8 never stops the drain, so the
    /// child is not left writing into a closed pipe.
    async fn drain<R>(&self, reader: Option<R>, echo: Option<Echo>) -> String
    where
        R: AsyncRead + Unpin,
    {
        let mut captured = String::new();
        let Some(reader) = reader else {
            return captured;
        };

        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let decoded = String::from_utf8_lossy(&buf);
                    let line = decoded.trim_end_matches(['\n', '\r']);
                    match echo {
                        Some(Echo::Stdout) => {
                            let _ = writeln!(std::io::stdout(), "{}", self.redact(line));
                        }
                        Some(Echo::Stderr) => {
                            let _ = writeln!(std::io::stderr(), "{}", self.redact(line));
                        }
                        None => {}
                    }
                    captured.push_str(line);
                    captured.push('\n');
                }
                Err(e) => {
                    log::warn!("Stopped reading output of {}: {}", self.display(), e);
                    break;
                }
            }
        }
        captured
    }

    fn redact(&self, text: &str) -> String {
        self.secrets
            .iter()
            .fold(text.to_string(), |acc, secret| acc.replace(secret.as_str(), "***"))
    }

    /// Runs the command to completion.
    ///
    /// A non-zero exit is logged with the (redacted) command line and returned
    /// as [`Error::CommandStatus`]; nothing is retried.
    pub async fn run(&self) -> Result<CommandOutput> {
        let display = self.display();
        log::debug!("Running: {}", display);

        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|error| {
            log::error!("Command failed to start: {} ({})", display, error);
            Error::CommandFailed {
                command: display.clone(),
                error,
            }
        })?;

        let echo = self.mode == OutputMode::Stream;
        let child_stdout = child.stdout.take();
        let child_stderr = child.stderr.take();

        // Both pipes are drained concurrently so neither can fill up and stall the child.
        let (stdout, stderr) = tokio::join!(
            self.drain(child_stdout, echo.then_some(Echo::Stdout)),
            self.drain(child_stderr, echo.then_some(Echo::Stderr)),
        );

        let status = child.wait().await.map_err(|error| Error::CommandFailed {
            command: display.clone(),
            error,
        })?;

        if !status.success() {
            log::error!("Command failed: {} ({})", display, status);
            return Err(Error::CommandStatus {
                command: display,
                status,
                stderr: self.redact(&stderr),
            });
        }

        Ok(CommandOutput {
            status,
            stdout,
            stderr,
        })
    }
}
