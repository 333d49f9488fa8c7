// Native Lua backend
//
// Evaluates source text in-process with an embedded Lua interpreter. Each
// run gets a fresh, sandboxed Lua state: the output channels are per-run
// closures rather than patched globals, so nothing needs restoring even
// when evaluation fails. Output channels map to line kinds: print -> log,
// warn -> warning, eprint -> error.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mlua::{HookTriggers, Lua, LuaSerdeExt, MultiValue, Value, VmState};

use crate::backend::{BackendError, ExecBackend};
use crate::output::{OutputKind, OutputLog};

/// Maximum number of Lua instructions per run.
pub const INSTRUCTION_LIMIT: i64 = 100_000_000;

/// How often to check the instruction budget (every N instructions).
pub const INSTRUCTION_HOOK_INTERVAL: u32 = 10_000;

/// Captured lines are capped to keep a runaway print loop from flooding
/// the log.
pub const MAX_OUTPUT_LINES: usize = 500;

/// Default wall-clock timeout for one run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Output captured during one evaluation.
struct CaptureState {
    lines: Vec<(String, OutputKind)>,
    truncated: bool,
}

impl CaptureState {
    fn new() -> Self {
        Self { lines: Vec::new(), truncated: false }
    }

    fn push(&mut self, line: String, kind: OutputKind) {
        if self.lines.len() < MAX_OUTPUT_LINES {
            self.lines.push((line, kind));
        } else {
            self.truncated = true;
        }
    }
}

/// The native backend. Stateless between runs; always ready.
pub struct LuaBackend {
    timeout: Duration,
}

impl LuaBackend {
    pub fn new() -> Self {
        Self { timeout: DEFAULT_TIMEOUT }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a sandboxed Lua state with capture channels registered.
    fn sandboxed_lua(captured: &Rc<RefCell<CaptureState>>) -> mlua::Result<Lua> {
        let lua = Lua::new();

        for (name, kind) in [
            ("print", OutputKind::Log),
            ("warn", OutputKind::Warning),
            ("eprint", OutputKind::Error),
        ] {
            let state = captured.clone();
            let channel = lua.create_function(move |lua, args: MultiValue| {
                let parts: Vec<String> = args
                    .iter()
                    .map(|v| value_display(lua, v))
                    .collect();
                state.borrow_mut().push(parts.join("\t"), kind);
                Ok(())
            })?;
            lua.globals().set(name, channel)?;
        }

        // Sandbox: remove globals that reach the host environment.
        // We keep: basic, string, table, math, utf8
        let globals = lua.globals();
        globals.set("os", Value::Nil)?;
        globals.set("io", Value::Nil)?;
        globals.set("debug", Value::Nil)?;
        globals.set("package", Value::Nil)?;
        globals.set("require", Value::Nil)?;
        globals.set("loadfile", Value::Nil)?;
        globals.set("dofile", Value::Nil)?;
        globals.set("load", Value::Nil)?;

        Ok(lua)
    }

    /// Prepare code for execution.
    ///
    /// If the input parses as an expression it is wrapped in `return (...)`
    /// so a bare `1 + 1` yields a value instead of nothing.
    fn prepare_code(lua: &Lua, input: &str) -> (String, bool) {
        let as_expr = format!("return ({})", input);
        if lua.load(&as_expr).into_function().is_ok() {
            return (as_expr, true);
        }
        (input.to_string(), false)
    }
}

impl Default for LuaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecBackend for LuaBackend {
    fn ready(&self) -> bool {
        true
    }

    fn initialize(&mut self, _log: &mut OutputLog) -> Result<(), BackendError> {
        Ok(())
    }

    fn run(&mut self, source: &str, log: &mut OutputLog) -> Result<(), BackendError> {
        let captured = Rc::new(RefCell::new(CaptureState::new()));
        let lua = Self::sandboxed_lua(&captured)
            .map_err(|e| BackendError::new(format!("failed to create Lua state: {}", e)))?;

        let (code, _is_expression) = Self::prepare_code(&lua, source.trim());

        // Instruction budget plus wall-clock watchdog, checked from a hook.
        let start_time = Instant::now();
        let timeout = self.timeout;
        let budget = Arc::new(AtomicI64::new(INSTRUCTION_LIMIT));
        let budget_clone = budget.clone();
        lua.set_hook(
            HookTriggers::new().every_nth_instruction(INSTRUCTION_HOOK_INTERVAL),
            move |_lua, _debug| {
                if start_time.elapsed() > timeout {
                    return Err(mlua::Error::RuntimeError(format!(
                        "execution timeout ({}s limit)",
                        timeout.as_secs()
                    )));
                }
                let remaining =
                    budget_clone.fetch_sub(INSTRUCTION_HOOK_INTERVAL as i64, Ordering::Relaxed);
                if remaining <= 0 {
                    Err(mlua::Error::RuntimeError(format!(
                        "instruction limit exceeded ({} instructions)",
                        INSTRUCTION_LIMIT
                    )))
                } else {
                    Ok(VmState::Continue)
                }
            },
        );

        let result = lua.load(&code).eval::<MultiValue>();
        lua.remove_hook();

        let state = captured.borrow();
        let has_output = !state.lines.is_empty();
        for (text, kind) in &state.lines {
            log.append(text.clone(), *kind);
        }
        if state.truncated {
            log.append(
                format!("... output truncated ({} line limit)", MAX_OUTPUT_LINES),
                OutputKind::Warning,
            );
        }
        drop(state);

        match result {
            Ok(values) => {
                let returned = returned_display(&lua, &values);
                match returned {
                    Some(text) if !has_output => {
                        log.append(format!("Return value: {}", text), OutputKind::Log);
                    }
                    Some(_) => {}
                    None if !has_output => {
                        log.append("Code executed successfully (no output)", OutputKind::Success);
                    }
                    None => {}
                }
            }
            Err(e) => {
                log.append(format!("Error: {}", format_lua_error(&e)), OutputKind::Error);
            }
        }

        Ok(())
    }
}

/// Format the values a chunk returned, or None when there is nothing to
/// show (no values, or all nil).
fn returned_display(lua: &Lua, values: &MultiValue) -> Option<String> {
    if values.is_empty() || values.iter().all(|v| matches!(v, Value::Nil)) {
        return None;
    }
    let parts: Vec<String> = values.iter().map(|v| value_display(lua, v)).collect();
    Some(parts.join(", "))
}

/// Convert a Lua value to a display string. Strings pass through as-is;
/// tables are serialized as indented JSON; everything else uses a plain
/// rendering.
fn value_display(lua: &Lua, value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{:.0}", n)
            } else {
                format!("{}", n)
            }
        }
        Value::String(s) => s
            .to_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|_| "<invalid utf8>".to_string()),
        Value::Table(_) => lua
            .from_value::<serde_json::Value>(value.clone())
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or_else(|| "table".to_string()),
        Value::Function(_) => "function".to_string(),
        Value::Thread(_) => "thread".to_string(),
        Value::UserData(_) => "userdata".to_string(),
        Value::LightUserData(_) => "lightuserdata".to_string(),
        Value::Error(e) => format!("error: {}", e),
        _ => "<unknown>".to_string(),
    }
}

/// Format a Lua error for display, stripping the chunk-name prefix.
fn format_lua_error(error: &mlua::Error) -> String {
    match error {
        mlua::Error::SyntaxError { message, .. } => {
            if let Some(idx) = message.find("]: ") {
                message[idx + 3..].to_string()
            } else {
                message.clone()
            }
        }
        mlua::Error::RuntimeError(msg) => {
            if let Some(idx) = message_body(msg) {
                idx.to_string()
            } else {
                msg.clone()
            }
        }
        other => other.to_string(),
    }
}

/// Strip a leading `[string "..."]:N: ` location from a runtime message.
fn message_body(msg: &str) -> Option<&str> {
    if msg.starts_with("[string ") {
        if let Some(idx) = msg.find("]:") {
            let rest = &msg[idx + 2..];
            if let Some(colon) = rest.find(": ") {
                return Some(&rest[colon + 2..]);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> OutputLog {
        let mut log = OutputLog::new();
        LuaBackend::new().run(source, &mut log).unwrap();
        log
    }

    #[test]
    fn print_becomes_log_lines_in_order() {
        let log = run("print('one')\nprint('two')");
        let lines = log.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "one");
        assert_eq!(lines[0].kind, OutputKind::Log);
        assert_eq!(lines[1].text, "two");
    }

    #[test]
    fn warn_and_eprint_map_to_their_kinds() {
        let log = run("warn('careful')\neprint('broken')");
        let lines = log.lines();
        assert_eq!(lines[0].kind, OutputKind::Warning);
        assert_eq!(lines[0].text, "careful");
        assert_eq!(lines[1].kind, OutputKind::Error);
        assert_eq!(lines[1].text, "broken");
    }

    #[test]
    fn tables_are_serialized_indented() {
        let log = run("print({ name = 'ada', score = 3 })");
        let text = &log.lines()[0].text;
        assert!(text.contains('\n'), "expected indented JSON, got {:?}", text);
        assert!(text.contains("\"name\": \"ada\""));
    }

    #[test]
    fn bare_expression_yields_return_value_line() {
        let log = run("1 + 1");
        let lines = log.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Return value: 2");
        assert_eq!(lines[0].kind, OutputKind::Log);
    }

    #[test]
    fn explicit_return_without_output_is_shown() {
        let log = run("local x = 21\nreturn x * 2");
        assert_eq!(log.lines().len(), 1);
        assert_eq!(log.lines()[0].text, "Return value: 42");
    }

    #[test]
    fn no_output_no_return_yields_one_success_line() {
        let log = run("local x = 5");
        let lines = log.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, OutputKind::Success);
    }

    #[test]
    fn success_is_never_mixed_with_real_output() {
        let log = run("print('hi')");
        assert_eq!(log.lines().len(), 1);
        assert_eq!(log.lines()[0].kind, OutputKind::Log);
    }

    #[test]
    fn return_value_suppressed_when_output_present() {
        let log = run("print('hi')\nreturn 7");
        let lines = log.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "hi");
    }

    #[test]
    fn runtime_error_yields_one_error_line() {
        let log = run("error('boom')");
        let lines = log.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, OutputKind::Error);
        assert!(lines[0].text.contains("boom"), "got {:?}", lines[0].text);
    }

    #[test]
    fn syntax_error_yields_one_error_line() {
        let log = run("this is not lua");
        let lines = log.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, OutputKind::Error);
    }

    #[test]
    fn output_before_error_is_kept() {
        let log = run("print('before')\nerror('after')");
        let lines = log.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "before");
        assert_eq!(lines[1].kind, OutputKind::Error);
    }

    #[test]
    fn host_reaching_globals_are_removed() {
        let log = run("print(os, io, require, load)");
        assert_eq!(log.lines()[0].text, "nil\tnil\tnil\tnil");
    }

    #[test]
    fn wall_clock_timeout_stops_runaway_scripts() {
        let mut log = OutputLog::new();
        LuaBackend::with_timeout(Duration::from_millis(100))
            .run("while true do end", &mut log)
            .unwrap();
        let lines = log.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, OutputKind::Error);
        assert!(lines[0].text.contains("timeout"), "got {:?}", lines[0].text);
    }

    #[test]
    fn output_is_capped_with_a_truncation_notice() {
        let log = run("for i = 1, 1000 do print(i) end");
        let lines = log.lines();
        // MAX_OUTPUT_LINES captured lines, one truncation notice, then the
        // terminal category is suppressed because output was produced.
        assert_eq!(lines.len(), MAX_OUTPUT_LINES + 1);
        assert_eq!(lines[MAX_OUTPUT_LINES].kind, OutputKind::Warning);
        assert!(lines[MAX_OUTPUT_LINES].text.contains("truncated"));
    }
}
