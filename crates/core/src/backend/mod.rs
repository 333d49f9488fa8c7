// Execution backends
//
// Two interchangeable strategies for running playground source text:
// the native in-process Lua interpreter and the sandboxed Python
// interpreter. Script failures are reported into the output log and
// never escape a backend; `Err` is reserved for host-boundary failures
// (interpreter creation, scratch-file IO, process spawn).

pub mod lua;
pub mod python;

use std::fmt;
use std::io;

use crate::output::OutputLog;

pub use lua::LuaBackend;
pub use python::{PythonBackend, SandboxState};

/// Host-boundary failure while driving a backend. User-script errors are
/// never represented this way; they become error lines in the log.
#[derive(Debug)]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BackendError {}

impl From<io::Error> for BackendError {
    fn from(err: io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// One code-execution strategy.
///
/// `run` appends zero or more lines to the log and terminates. Exactly one
/// terminal category results from each run: captured output lines, a
/// synthetic return-value line, a synthetic success line, or one error
/// line.
pub trait ExecBackend {
    /// True once the backend can execute without further setup.
    fn ready(&self) -> bool;

    /// One-time setup. Lazy callers invoke this on first use; it must be
    /// idempotent once ready and retriable after a failure. Progress and
    /// failure are reported into the log; the returned error carries the
    /// cause for callers that need to branch on it.
    fn initialize(&mut self, log: &mut OutputLog) -> Result<(), BackendError>;

    /// Execute source text, streaming captured output into the log.
    fn run(&mut self, source: &str, log: &mut OutputLog) -> Result<(), BackendError>;
}
