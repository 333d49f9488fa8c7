// Output log for playground runs
//
// An append-only, ordered log of typed lines. A display surface consumes
// the log after each operation; when the log is empty it shows the
// placeholder instead. The log itself never fails and never renders.

use serde::{Deserialize, Serialize};

/// Shown by display surfaces when the log holds no lines.
pub const PLACEHOLDER: &str = "Run code to see your output here";

/// Classification of a single output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Log,
    Error,
    Warning,
    Info,
    Success,
}

/// One immutable line of run output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLine {
    pub text: String,
    pub kind: OutputKind,
}

impl OutputLine {
    /// True only for backend-generated plot markup. Display surfaces may
    /// render rich lines as markup; every other line is literal text.
    /// User print output never takes this path unless the sandbox plotting
    /// shim produced it.
    pub fn is_rich(&self) -> bool {
        self.text.contains("<img")
    }
}

/// Ordered log of output lines, wholly replaced at the start of each run.
///
/// Invariant: the log is either in the placeholder state (zero lines) or
/// holds one or more lines - never both.
#[derive(Debug, Default)]
pub struct OutputLog {
    lines: Vec<OutputLine>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the placeholder state. Idempotent.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Append one line, leaving the placeholder state if necessary.
    pub fn append(&mut self, text: impl Into<String>, kind: OutputKind) {
        self.lines.push(OutputLine { text: text.into(), kind });
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn is_placeholder(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_placeholder_state() {
        let log = OutputLog::new();
        assert!(log.is_placeholder());
        assert!(log.lines().is_empty());
    }

    #[test]
    fn append_leaves_placeholder_state() {
        let mut log = OutputLog::new();
        log.append("hello", OutputKind::Log);
        assert!(!log.is_placeholder());
        assert_eq!(log.lines().len(), 1);
        assert_eq!(log.lines()[0].text, "hello");
        assert_eq!(log.lines()[0].kind, OutputKind::Log);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut log = OutputLog::new();
        log.append("a", OutputKind::Info);
        log.append("b", OutputKind::Error);
        log.clear();
        assert!(log.is_placeholder());
        log.clear();
        assert!(log.is_placeholder());
    }

    #[test]
    fn appends_preserve_order() {
        let mut log = OutputLog::new();
        log.append("first", OutputKind::Log);
        log.append("second", OutputKind::Warning);
        log.append("third", OutputKind::Success);
        let texts: Vec<&str> = log.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn rich_detection_only_matches_img_markup() {
        let plot = OutputLine {
            text: "<img src=\"data:image/png;base64,AAAA\">".to_string(),
            kind: OutputKind::Log,
        };
        assert!(plot.is_rich());

        let literal = OutputLine {
            text: "print('<b>not markup</b>')".to_string(),
            kind: OutputKind::Log,
        };
        assert!(!literal.is_rich());
    }
}
