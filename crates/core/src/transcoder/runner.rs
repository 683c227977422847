//! External-process execution for conversions.
//!
//! Two I/O modes: streaming through standard pipes, or staging input and
//! output through temporary files for containers that need seekable output.
//! Both drain the diagnostic stream concurrently with the data channels so
//! a chatty process can never fill a pipe buffer and deadlock.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::time::timeout;

use super::error::TranscodeError;
use super::pool::BufferPool;
use super::types::ProcessOutcome;

/// Spawns and supervises one external process per conversion.
pub struct ProcessRunner {
    program: PathBuf,
    temp_dir: PathBuf,
    timeout: Duration,
    pool: BufferPool,
}

impl ProcessRunner {
    pub fn new(program: PathBuf, temp_dir: PathBuf, timeout: Duration) -> Self {
        Self {
            program,
            temp_dir,
            timeout,
            pool: BufferPool::new(),
        }
    }

    /// Runs the process in pipe mode: the payload is fed to stdin while
    /// stdout and stderr are drained concurrently.
    ///
    /// A write failure on stdin is ignored so that the process's own
    /// diagnostics, not a broken-pipe error, become the surfaced failure.
    pub async fn run_piped(
        &self,
        args: &[String],
        input: &[u8],
    ) -> Result<ProcessOutcome, TranscodeError> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdin = child.stdin.take().expect("stdin should be captured");
        let mut stdout = child.stdout.take().expect("stdout should be captured");
        let mut stderr = child.stderr.take().expect("stderr should be captured");

        let mut out_buf = self.pool.acquire();
        let mut err_buf = self.pool.acquire();

        let feed = async move {
            let mut stdin = stdin;
            match stdin.write_all(input).await {
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                res => res?,
            }
            match stdin.shutdown().await {
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                res => res?,
            }
            Ok::<(), std::io::Error>(())
        };

        let run = async {
            let (fed, out, err) = tokio::join!(
                feed,
                stdout.read_to_end(&mut out_buf),
                stderr.read_to_end(&mut err_buf),
            );
            fed?;
            out?;
            err?;
            child.wait().await
        };

        let result = timeout(self.timeout, run).await;
        let status = match result {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(TranscodeError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        let diagnostics = String::from_utf8_lossy(&err_buf).into_owned();
        if !status.success() {
            return Err(TranscodeError::process_failed(
                format!("process exited with code {:?}", status.code()),
                diagnostics,
            ));
        }
        if out_buf.is_empty() {
            return Err(TranscodeError::EmptyOutput { diagnostics });
        }

        Ok(ProcessOutcome {
            stdout: out_buf.take(),
            diagnostics,
            success: true,
        })
    }

    /// Runs the process in temp-file mode: the payload is staged to a
    /// temporary input file, the process writes a temporary output file,
    /// and both artifacts are removed when this call returns, on success
    /// and on every failure path alike.
    pub async fn run_staged<F>(
        &self,
        build_args: F,
        input: &[u8],
    ) -> Result<ProcessOutcome, TranscodeError>
    where
        F: FnOnce(&str, &str) -> Vec<String>,
    {
        tokio::fs::create_dir_all(&self.temp_dir).await?;

        // TempPath removes the file on drop, covering every exit from
        // this function.
        let input_path = tempfile::Builder::new()
            .prefix("in-")
            .tempfile_in(&self.temp_dir)?
            .into_temp_path();
        let output_path = tempfile::Builder::new()
            .prefix("out-")
            .tempfile_in(&self.temp_dir)?
            .into_temp_path();

        tokio::fs::write(&input_path, input).await?;

        let args = build_args(
            &input_path.to_string_lossy(),
            &output_path.to_string_lossy(),
        );

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let mut stderr = child.stderr.take().expect("stderr should be captured");
        let mut err_buf = self.pool.acquire();

        let run = async {
            stderr.read_to_end(&mut err_buf).await?;
            child.wait().await
        };

        let result = timeout(self.timeout, run).await;
        let status = match result {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(TranscodeError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        let diagnostics = String::from_utf8_lossy(&err_buf).into_owned();
        if !status.success() {
            return Err(TranscodeError::process_failed(
                format!("process exited with code {:?}", status.code()),
                diagnostics,
            ));
        }

        let bytes = tokio::fs::read(&output_path).await?;
        if bytes.is_empty() {
            return Err(TranscodeError::EmptyOutput { diagnostics });
        }

        Ok(ProcessOutcome {
            stdout: bytes,
            diagnostics,
            success: true,
        })
    }

    fn spawn_error(&self, e: std::io::Error) -> TranscodeError {
        if e.kind() == std::io::ErrorKind::NotFound {
            TranscodeError::FfmpegNotFound {
                path: self.program.clone(),
            }
        } else {
            TranscodeError::Io(e)
        }
    }
}
