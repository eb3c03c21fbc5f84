//! Execution engine
//!
//! Runs one snippet's code through an interpreter and hands back its merged
//! stdout/stderr. The process boundary sits behind [`ProcessRunner`] so the
//! capture cache can be exercised without spawning anything.

use runrecord_core::errors::{RrError, RrErrorKind, RunRecordError};
use runrecord_core::extract::decode_output;
use runrecord_core::{log_op_end, log_op_error, log_op_start, LanguageEntry, SourceLocation};
use runrecord_store::errors::io_error;
use runrecord_store::Result;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

/// Everything needed to start one interpreter process
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Program followed by its arguments
    pub argv: &'a [String],
    /// Bytes written to the process's standard input, which is then closed
    pub stdin: &'a [u8],
    pub workdir: &'a Path,
    /// Complete environment; empty means inherit the caller's
    pub env: &'a [(String, String)],
}

/// What a finished process produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// Stdout and stderr interleaved in emission order
    pub output: Vec<u8>,
    /// Exit status; -1 when the process was killed by a signal
    pub exit_code: i32,
}

/// Runs interpreter processes to completion
pub trait ProcessRunner {
    /// Run `invocation` and wait for it to exit
    ///
    /// # Errors
    ///
    /// `Io` when the process cannot be started or its pipes fail. A non-zero
    /// exit is not an error at this level.
    fn run(&mut self, invocation: &Invocation<'_>) -> Result<RawOutput>;
}

/// Runner backed by `std::process::Command`
///
/// Stdout and stderr share one OS pipe, so their output keeps the order the
/// child wrote it in. Stdin is fed from a scoped thread while the output is
/// drained, so a child that writes before reading all its input cannot
/// deadlock. There is no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation<'_>) -> Result<RawOutput> {
        let (program, args) = invocation.argv.split_first().ok_or_else(|| {
            RrError::new(RrErrorKind::InvalidConfig)
                .with_op("spawn")
                .with_message("empty interpreter command")
        })?;
        let program_path = Path::new(program);

        let (mut reader, writer) =
            std::io::pipe().map_err(|e| io_error("create_pipe", program_path, e))?;
        let writer_err = writer
            .try_clone()
            .map_err(|e| io_error("create_pipe", program_path, e))?;

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(invocation.workdir)
            .stdin(Stdio::piped())
            .stdout(writer)
            .stderr(writer_err);
        if !invocation.env.is_empty() {
            command.env_clear();
            command.envs(invocation.env.iter().map(|(k, v)| (k, v)));
        }

        let mut child = command
            .spawn()
            .map_err(|e| io_error("spawn", program_path, e))?;
        // Our copies of the write end must close for the read to see EOF
        drop(command);

        let stdin = child.stdin.take();
        let input = invocation.stdin;
        let mut output = Vec::new();

        let (fed, read) = thread::scope(|scope| {
            let feeder = scope.spawn(move || match stdin {
                Some(mut pipe) => match pipe.write_all(input) {
                    Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                    _ => Ok(()),
                },
                None => Ok(()),
            });
            let read = reader.read_to_end(&mut output);
            (feeder.join(), read)
        });

        let status = child
            .wait()
            .map_err(|e| io_error("wait", program_path, e))?;

        match fed {
            Ok(result) => result.map_err(|e| io_error("write_stdin", program_path, e))?,
            Err(_) => {
                return Err(RrError::new(RrErrorKind::Internal)
                    .with_op("write_stdin")
                    .with_path(program_path)
                    .with_message("stdin writer thread panicked"))
            }
        }
        read.map_err(|e| io_error("read_output", program_path, e))?;

        Ok(RawOutput {
            output,
            exit_code: status.code().unwrap_or(-1),
        })
    }
}

/// Run `code` through `entry`'s interpreter and return its decoded output
///
/// The exit code must equal `expected`; on a mismatch nothing is decoded
/// and the error names the snippet's `location`.
///
/// # Errors
///
/// `UnexpectedExitCode` on a mismatch, `Encoding` when the output is not
/// valid in the entry's output encoding, `Io` from the runner.
pub fn execute<R: ProcessRunner + ?Sized>(
    runner: &mut R,
    entry: &LanguageEntry,
    code: &[u8],
    workdir: &Path,
    env: &[(String, String)],
    expected: i32,
    location: &SourceLocation,
) -> Result<String> {
    log_op_start!("execute", language = entry.tag(), source = %location);
    let start = std::time::Instant::now();

    let result = execute_impl(runner, entry, code, workdir, env, expected, location).map_err(|e| {
        let e = e.with_location(location.clone());
        log_op_error!(
            "execute",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "execute",
        duration_ms = start.elapsed().as_millis() as u64,
        output_bytes = result.len()
    );

    Ok(result)
}

fn execute_impl<R: ProcessRunner + ?Sized>(
    runner: &mut R,
    entry: &LanguageEntry,
    code: &[u8],
    workdir: &Path,
    env: &[(String, String)],
    expected: i32,
    location: &SourceLocation,
) -> Result<String> {
    let raw = runner.run(&Invocation {
        argv: entry.command(),
        stdin: code,
        workdir,
        env,
    })?;

    tracing::debug!(exit_code = raw.exit_code, bytes = raw.output.len(), "process finished");

    if raw.exit_code != expected {
        return Err(RunRecordError::UnexpectedExitCode {
            location: location.clone(),
            expected,
            actual: raw.exit_code,
        }
        .into());
    }

    Ok(decode_output(&raw.output, entry)?)
}
