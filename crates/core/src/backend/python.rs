// Sandboxed Python backend
//
// Runs source text through a separately-initialized CPython interpreter.
// Initialization is expensive, lazy, and happens at most once per session:
// resolve the interpreter binary, probe its version, and materialize the
// runner prelude. A failed initialization is retriable on the next run.
//
// The runner redirects the interpreter's stdout into an in-memory buffer
// for the duration of the call, restores it, and writes the captured text
// back out, so one run yields one captured-output line (or one synthetic
// success line). A `show_plot()` shim returns base64 image markup, the
// only rich content the output log ever carries.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::backend::{BackendError, ExecBackend};
use crate::output::{OutputKind, OutputLog};

/// Default wall-clock timeout for one run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimum interpreter version the runner supports.
const MIN_VERSION: (u32, u32) = (3, 8);

/// Poll interval while waiting for the interpreter to exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

const RUNNER_PY: &str = include_str!("runner.py");

/// Lifecycle of the sandboxed interpreter.
///
/// `Uninitialized -> Initializing -> Ready`, with `Initializing -> Failed`
/// on setup error. `Failed` is retriable: the next run re-attempts
/// initialization. `Ready` never reverts within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

/// The sandboxed backend.
pub struct PythonBackend {
    state: SandboxState,
    /// Resolved interpreter binary, set once initialization succeeds.
    interpreter: Option<PathBuf>,
    /// Directory holding the runner prelude and per-run scratch files.
    runtime_dir: Option<PathBuf>,
    /// Optional override for the interpreter binary (from settings).
    configured_bin: Option<PathBuf>,
    timeout: Duration,
}

impl PythonBackend {
    pub fn new() -> Self {
        Self {
            state: SandboxState::Uninitialized,
            interpreter: None,
            runtime_dir: None,
            configured_bin: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_interpreter(bin: PathBuf) -> Self {
        Self { configured_bin: Some(bin), ..Self::new() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> SandboxState {
        self.state
    }

    /// Resolve the interpreter, probe its version, and write the runner.
    fn setup(&self) -> Result<(PathBuf, PathBuf), String> {
        let bin = match &self.configured_bin {
            Some(path) => path.clone(),
            None => which::which("python3")
                .map_err(|_| "python3 not found on PATH".to_string())?,
        };

        let probe = Command::new(&bin)
            .arg("-c")
            .arg("import sys; print('%d.%d' % sys.version_info[:2])")
            .output()
            .map_err(|e| format!("failed to launch {}: {}", bin.display(), e))?;
        if !probe.status.success() {
            return Err(format!("{} failed the version probe", bin.display()));
        }
        let version = String::from_utf8_lossy(&probe.stdout);
        let mut parts = version.trim().split('.');
        let major: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        let minor: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        if (major, minor) < MIN_VERSION {
            return Err(format!(
                "python {}.{} is too old (need {}.{}+)",
                major, minor, MIN_VERSION.0, MIN_VERSION.1
            ));
        }

        let dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("scriptpad")
            .join("python");
        fs::create_dir_all(&dir).map_err(|e| format!("creating runtime dir: {}", e))?;
        fs::write(dir.join("runner.py"), RUNNER_PY)
            .map_err(|e| format!("writing runner: {}", e))?;

        Ok((bin, dir))
    }
}

impl Default for PythonBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecBackend for PythonBackend {
    fn ready(&self) -> bool {
        self.state == SandboxState::Ready
    }

    fn initialize(&mut self, log: &mut OutputLog) -> Result<(), BackendError> {
        if self.state == SandboxState::Ready {
            return Ok(());
        }

        self.state = SandboxState::Initializing;
        log.append("Preparing Python environment...", OutputKind::Info);

        match self.setup() {
            Ok((bin, dir)) => {
                self.interpreter = Some(bin);
                self.runtime_dir = Some(dir);
                self.state = SandboxState::Ready;
                log.append("Python environment ready", OutputKind::Success);
                Ok(())
            }
            Err(message) => {
                self.state = SandboxState::Failed;
                log.append(
                    format!("Error initializing Python: {}", message),
                    OutputKind::Error,
                );
                Err(BackendError::new(message))
            }
        }
    }

    fn run(&mut self, source: &str, log: &mut OutputLog) -> Result<(), BackendError> {
        if !self.ready() && self.initialize(log).is_err() {
            // Already reported; retriable on the next run.
            return Ok(());
        }

        // Both are set once the state is Ready.
        let bin = self
            .interpreter
            .clone()
            .ok_or_else(|| BackendError::new("interpreter unset after init"))?;
        let dir = self
            .runtime_dir
            .clone()
            .ok_or_else(|| BackendError::new("runtime dir unset after init"))?;

        let cell = dir.join("cell.py");
        fs::write(&cell, source)?;

        let mut child = Command::new(&bin)
            .arg("-I")
            .arg(dir.join("runner.py"))
            .arg(&cell)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Wall-clock watchdog: poll instead of blocking so a runaway or
        // pipe-stalled script can be killed at the deadline.
        let deadline = Instant::now() + self.timeout;
        let mut timed_out = false;
        loop {
            match child.try_wait()? {
                Some(_) => break,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    timed_out = true;
                    break;
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
        let output = child.wait_with_output()?;

        if timed_out {
            log.append(
                format!("execution timeout ({}s limit)", self.timeout.as_secs()),
                OutputKind::Error,
            );
            return Ok(());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.strip_suffix('\n').unwrap_or(&stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stdout.is_empty() {
                log.append(stdout.to_string(), OutputKind::Log);
            }
            log.append(
                format!("Python Error: {}", stderr.trim()),
                OutputKind::Error,
            );
        } else if !stdout.is_empty() {
            log.append(stdout.to_string(), OutputKind::Log);
        } else {
            log.append("Code executed successfully (no output)", OutputKind::Success);
        }

        Ok(())
    }
}
