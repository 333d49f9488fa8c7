// Terminal adapters for the playground's host capabilities.

use std::io::{self, BufRead, Write};
use std::process::{Command, Stdio};

use scriptpad_core::{Clipboard, Confirm, Notifier, NotifyKind, OutputKind, OutputLog};

/// Notifications go to stderr so piped stdout stays clean.
pub struct TermNotifier;

impl Notifier for TermNotifier {
    fn notify(&self, message: &str, kind: NotifyKind) {
        let tag = match kind {
            NotifyKind::Success => "ok",
            NotifyKind::Error => "error",
            NotifyKind::Info => "info",
        };
        eprintln!("[{}] {}", tag, message);
    }
}

/// y/N prompt on stderr, answer read from stdin.
pub struct TermConfirm;

impl Confirm for TermConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

/// Clipboard via whichever system utility is on PATH.
pub struct SystemClipboard;

impl SystemClipboard {
    fn tool() -> Option<(&'static str, &'static [&'static str])> {
        const CANDIDATES: &[(&str, &[&str])] = &[
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard"]),
            ("xsel", &["--clipboard", "--input"]),
            ("pbcopy", &[]),
        ];
        CANDIDATES
            .iter()
            .find(|(bin, _)| which::which(bin).is_ok())
            .copied()
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), String> {
        let (bin, args) = Self::tool().ok_or("no clipboard utility found")?;
        let mut child = Command::new(bin)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("{}: {}", bin, e))?;
        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| e.to_string())?;
        }
        let status = child.wait().map_err(|e| e.to_string())?;
        if status.success() {
            Ok(())
        } else {
            Err(format!("{} exited with {}", bin, status))
        }
    }
}

/// Print the output log to stdout, one tagged line per entry. Rich lines
/// carry inline image markup that a terminal cannot render.
pub fn print_log(log: &OutputLog) {
    for line in log.lines() {
        let text = if line.is_rich() {
            "[inline image omitted]"
        } else {
            line.text.as_str()
        };
        match line.kind {
            OutputKind::Log => println!("{}", text),
            OutputKind::Error => println!("error: {}", text),
            OutputKind::Warning => println!("warning: {}", text),
            OutputKind::Info => println!("-- {}", text),
            OutputKind::Success => println!("-- {}", text),
        }
    }
}
