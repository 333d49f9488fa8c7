// Collaborator capabilities injected into the controller
//
// The playground core does not render anything. Notifications, destructive
// action confirmation, and the clipboard are all provided by the host
// surface (the CLI shell here, a window in a GUI host).

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
    Info,
}

/// Non-blocking notification surface.
pub trait Notifier {
    fn notify(&self, message: &str, kind: NotifyKind);
}

/// Confirmation gate for destructive actions (reset). Declining is a
/// no-op for the caller, not an error.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// System clipboard access. Failure is expected on headless hosts; the
/// caller falls back to presenting the text for manual copy.
pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<(), String>;
}

/// Clipboard stand-in for hosts without one; always reports failure so
/// callers take the manual-copy fallback.
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn copy(&self, _text: &str) -> Result<(), String> {
        Err("no clipboard available".to_string())
    }
}
