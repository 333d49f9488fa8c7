// Scriptpad playground core
//
// A two-backend code playground: Lua runs in-process through an embedded
// interpreter, Python runs in a separately-initialized sandboxed
// interpreter. The controller orchestrates language switching, run
// dispatch, persistence of editor buffers, and shareable links.

pub mod backend;
pub mod catalog;
pub mod controller;
pub mod language;
pub mod notify;
pub mod output;
pub mod session;
pub mod share;

pub use backend::{BackendError, ExecBackend};
pub use controller::Playground;
pub use language::Language;
pub use notify::{Clipboard, Confirm, NoClipboard, Notifier, NotifyKind};
pub use output::{OutputKind, OutputLine, OutputLog};
pub use session::{code_key, CodeStore, MemoryStore, Session, APP_PREFIX};
