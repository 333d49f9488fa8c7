// Playground controller
//
// Orchestrates language switching, run dispatch, buffer persistence,
// catalogue loads, and share links. All collaborators (store, notifier,
// backends, clipboard, confirmation) are injected so hosts and tests can
// substitute their own.
//
// Every operation takes `&mut self`, so runs are serialized by
// construction: a second run request cannot start while one is in flight.

use chrono::Utc;

use crate::backend::ExecBackend;
use crate::catalog;
use crate::language::Language;
use crate::notify::{Clipboard, Confirm, Notifier, NotifyKind};
use crate::output::{OutputKind, OutputLog};
use crate::session::{code_key, CodeStore, Session};
use crate::share;

pub struct Playground {
    session: Session,
    output: OutputLog,
    store: Box<dyn CodeStore>,
    notifier: Box<dyn Notifier>,
    native: Box<dyn ExecBackend>,
    sandbox: Box<dyn ExecBackend>,
    share_base_url: String,
}

impl Playground {
    /// Build a playground for `language`, restoring its saved buffer (or
    /// the default template) and initializing the sandbox backend when the
    /// starting language needs it.
    pub fn new(
        language: Language,
        store: Box<dyn CodeStore>,
        notifier: Box<dyn Notifier>,
        native: Box<dyn ExecBackend>,
        sandbox: Box<dyn ExecBackend>,
        share_base_url: impl Into<String>,
    ) -> Self {
        let mut playground = Self {
            session: Session::new(language),
            output: OutputLog::new(),
            store,
            notifier,
            native,
            sandbox,
            share_base_url: share_base_url.into(),
        };
        playground.session.buffer = playground.saved_or_default(language);
        if language.is_sandboxed() && !playground.sandbox.ready() {
            let _ = playground.sandbox.initialize(&mut playground.output);
        }
        playground
    }

    pub fn language(&self) -> Language {
        self.session.language
    }

    pub fn buffer(&self) -> &str {
        &self.session.buffer
    }

    /// Replace the editor buffer (user edits, host-driven loads).
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.session.buffer = text.into();
    }

    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    /// Reset the output log to its placeholder state. Idempotent.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Run the current buffer on the backend for the current language.
    ///
    /// A blank buffer is a validation no-op: one info notification, no
    /// log mutation, no backend invoked. Backend-boundary failures are
    /// reported as one error line; script errors never reach this level.
    pub fn run_code(&mut self) {
        if self.session.buffer.trim().is_empty() {
            self.notifier
                .notify("Please enter some code to run", NotifyKind::Info);
            return;
        }

        self.output.clear();
        self.output.append(
            format!("Running {} code...", self.session.language.label()),
            OutputKind::Info,
        );

        let result = match self.session.language {
            Language::Lua => self.native.run(&self.session.buffer, &mut self.output),
            Language::Python => self.sandbox.run(&self.session.buffer, &mut self.output),
        };

        if let Err(e) = result {
            self.output
                .append(format!("Execution error: {}", e), OutputKind::Error);
        }
    }

    /// Switch the active language.
    ///
    /// The current buffer is persisted under the current language key
    /// first, so switching never loses work. The new language's saved
    /// buffer (or default template) is loaded, the sandbox backend is
    /// lazily initialized when needed, and the output log is cleared.
    /// `current language` is updated last.
    pub fn switch_language(&mut self, new: Language) {
        self.persist_buffer();

        self.session.buffer = self.saved_or_default(new);

        if new.is_sandboxed() && !self.sandbox.ready() {
            // Failure is reported into the log (and cleared just below,
            // as the original surface did); the next run retries.
            let _ = self.sandbox.initialize(&mut self.output);
        }

        self.output.clear();
        self.notifier
            .notify(&format!("Switched to {}", new.label()), NotifyKind::Success);
        self.session.language = new;
    }

    /// Overwrite the buffer with the default template for the current
    /// language. Destructive, so it is gated on the confirmation
    /// capability; declining is a no-op.
    pub fn reset_code(&mut self, confirm: &dyn Confirm) {
        if !confirm.confirm("Reset the code? This will clear all your changes.") {
            return;
        }
        self.session.buffer =
            catalog::default_template(self.session.language).to_string();
        self.output.clear();
        self.notifier
            .notify("Code reset to default", NotifyKind::Success);
    }

    /// Persist the current buffer under the current language key.
    pub fn save_code(&mut self) {
        self.persist_buffer();
        self.notifier.notify("Code saved locally", NotifyKind::Success);
    }

    /// Load a challenge template into the buffer (not into the store).
    pub fn load_challenge(&mut self, id: &str) {
        let Some(challenge) = catalog::challenge(id) else {
            self.notifier
                .notify(&format!("Unknown challenge: {}", id), NotifyKind::Error);
            return;
        };
        match challenge.template(self.session.language) {
            Some(template) => {
                self.session.buffer = template.to_string();
                self.output.clear();
                self.notifier.notify(
                    &format!("Loaded challenge: {}", challenge.title),
                    NotifyKind::Success,
                );
            }
            None => {
                self.notifier.notify(
                    &format!(
                        "Challenge not available for {}",
                        self.session.language.label()
                    ),
                    NotifyKind::Error,
                );
            }
        }
    }

    /// Load a snippet template into the buffer (not into the store).
    pub fn load_snippet(&mut self, id: &str) {
        let Some(snippet) = catalog::snippet(id) else {
            self.notifier
                .notify(&format!("Unknown snippet: {}", id), NotifyKind::Error);
            return;
        };
        match snippet.template(self.session.language) {
            Some(template) => {
                self.session.buffer = template.to_string();
                self.output.clear();
                self.notifier.notify(
                    &format!("Loaded snippet: {}", snippet.id),
                    NotifyKind::Success,
                );
            }
            None => {
                self.notifier.notify(
                    &format!(
                        "Snippet not available for {}",
                        self.session.language.label()
                    ),
                    NotifyKind::Error,
                );
            }
        }
    }

    /// Build a share link for the current buffer and try to place it on
    /// the clipboard, falling back to presenting it for manual copy.
    /// Returns the link unless the buffer was blank. Never fails.
    pub fn share_code(&mut self, clipboard: &dyn Clipboard) -> Option<String> {
        if self.session.buffer.trim().is_empty() {
            self.notifier.notify("No code to share", NotifyKind::Info);
            return None;
        }

        let token = share::encode(self.session.language, &self.session.buffer, Utc::now());
        let url = format!("{}?{}={}", self.share_base_url, share::SHARE_PARAM, token);

        match clipboard.copy(&url) {
            Ok(()) => self
                .notifier
                .notify("Share URL copied to clipboard!", NotifyKind::Success),
            Err(_) => self.notifier.notify(
                &format!("Share URL (copy this): {}", url),
                NotifyKind::Info,
            ),
        }
        Some(url)
    }

    /// Apply a share token received at startup. Malformed tokens are
    /// reported and leave the session untouched. The decoded code is only
    /// placed in the buffer, never auto-run.
    pub fn apply_shared(&mut self, token: &str) {
        match share::decode(token) {
            Ok((language, code)) => {
                self.switch_language(language);
                self.session.buffer = code;
                self.notifier.notify("Shared code loaded!", NotifyKind::Success);
            }
            Err(_) => {
                self.notifier.notify("Invalid share URL", NotifyKind::Error);
            }
        }
    }

    fn saved_or_default(&self, language: Language) -> String {
        self.store
            .load(&code_key(language))
            .unwrap_or_else(|| catalog::default_template(language).to_string())
    }

    fn persist_buffer(&mut self) {
        let key = code_key(self.session.language);
        if let Err(e) = self.store.save(&key, &self.session.buffer) {
            eprintln!("Error saving {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::notify::NoClipboard;
    use crate::session::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct CollectNotifier {
        events: RefCell<Vec<(String, NotifyKind)>>,
    }

    struct SharedNotifier(Rc<CollectNotifier>);

    impl Notifier for SharedNotifier {
        fn notify(&self, message: &str, kind: NotifyKind) {
            self.0.events.borrow_mut().push((message.to_string(), kind));
        }
    }

    /// Backend that records every run and appends one canned line.
    struct FakeBackend {
        runs: Rc<RefCell<Vec<String>>>,
        ready: bool,
        init_fails: bool,
    }

    impl FakeBackend {
        fn new(runs: Rc<RefCell<Vec<String>>>) -> Self {
            Self { runs, ready: true, init_fails: false }
        }

        fn lazy(runs: Rc<RefCell<Vec<String>>>) -> Self {
            Self { runs, ready: false, init_fails: false }
        }
    }

    impl ExecBackend for FakeBackend {
        fn ready(&self) -> bool {
            self.ready
        }

        fn initialize(&mut self, log: &mut OutputLog) -> Result<(), BackendError> {
            if self.init_fails {
                log.append("init failed", OutputKind::Error);
                return Err(BackendError::new("init failed"));
            }
            self.ready = true;
            log.append("backend ready", OutputKind::Success);
            Ok(())
        }

        fn run(&mut self, source: &str, log: &mut OutputLog) -> Result<(), BackendError> {
            self.runs.borrow_mut().push(source.to_string());
            log.append("ran", OutputKind::Log);
            Ok(())
        }
    }

    struct Always(bool);

    impl Confirm for Always {
        fn confirm(&self, _prompt: &str) -> bool {
            self.0
        }
    }

    struct Harness {
        playground: Playground,
        notifier: Rc<CollectNotifier>,
        native_runs: Rc<RefCell<Vec<String>>>,
        sandbox_runs: Rc<RefCell<Vec<String>>>,
    }

    fn harness() -> Harness {
        let notifier = Rc::new(CollectNotifier::default());
        let native_runs = Rc::new(RefCell::new(Vec::new()));
        let sandbox_runs = Rc::new(RefCell::new(Vec::new()));
        let playground = Playground::new(
            Language::Lua,
            Box::new(MemoryStore::new()),
            Box::new(SharedNotifier(notifier.clone())),
            Box::new(FakeBackend::new(native_runs.clone())),
            Box::new(FakeBackend::lazy(sandbox_runs.clone())),
            "https://scriptpad.dev/play",
        );
        Harness { playground, notifier, native_runs, sandbox_runs }
    }

    fn last_notification(h: &Harness) -> (String, NotifyKind) {
        h.notifier.events.borrow().last().cloned().unwrap()
    }

    #[test]
    fn starts_with_default_template() {
        let h = harness();
        assert_eq!(h.playground.language(), Language::Lua);
        assert_eq!(h.playground.buffer(), catalog::default_template(Language::Lua));
        assert!(h.playground.output().is_placeholder());
    }

    #[test]
    fn blank_run_is_a_validation_no_op() {
        let mut h = harness();
        h.playground.set_buffer("   \n\t  ");
        h.playground.run_code();

        assert!(h.playground.output().is_placeholder(), "log must stay untouched");
        assert!(h.native_runs.borrow().is_empty(), "no backend invoked");
        let (msg, kind) = last_notification(&h);
        assert_eq!(kind, NotifyKind::Info);
        assert!(msg.contains("enter some code"));
    }

    #[test]
    fn run_dispatches_to_the_active_language_backend() {
        let mut h = harness();
        h.playground.set_buffer("print(1)");
        h.playground.run_code();
        assert_eq!(h.native_runs.borrow().as_slice(), ["print(1)"]);
        assert!(h.sandbox_runs.borrow().is_empty());

        // First line is the running indicator, then backend output.
        let lines = h.playground.output().lines();
        assert_eq!(lines[0].kind, OutputKind::Info);
        assert!(lines[0].text.contains("Running lua code"));
        assert_eq!(lines[1].text, "ran");

        h.playground.switch_language(Language::Python);
        h.playground.set_buffer("print(2)");
        h.playground.run_code();
        assert_eq!(h.sandbox_runs.borrow().as_slice(), ["print(2)"]);
        assert_eq!(h.native_runs.borrow().len(), 1);
    }

    #[test]
    fn each_run_replaces_previous_output() {
        let mut h = harness();
        h.playground.set_buffer("print(1)");
        h.playground.run_code();
        h.playground.run_code();
        // One indicator plus one backend line; nothing from the first run.
        assert_eq!(h.playground.output().lines().len(), 2);
    }

    #[test]
    fn switch_persists_and_restores_buffers() {
        let mut h = harness();
        h.playground.set_buffer("-- my lua work");
        h.playground.switch_language(Language::Python);
        assert_eq!(h.playground.language(), Language::Python);
        assert_eq!(h.playground.buffer(), catalog::default_template(Language::Python));

        h.playground.set_buffer("# my python work");
        h.playground.switch_language(Language::Lua);
        assert_eq!(h.playground.buffer(), "-- my lua work");

        h.playground.switch_language(Language::Python);
        assert_eq!(h.playground.buffer(), "# my python work");
    }

    #[test]
    fn switch_initializes_the_sandbox_lazily() {
        let mut h = harness();
        assert!(!h.playground.sandbox.ready());
        h.playground.switch_language(Language::Python);
        assert!(h.playground.sandbox.ready());
        // Init lines are cleared along with the rest of the log.
        assert!(h.playground.output().is_placeholder());
        let (msg, kind) = last_notification(&h);
        assert_eq!(kind, NotifyKind::Success);
        assert_eq!(msg, "Switched to python");
    }

    #[test]
    fn reset_declined_is_a_no_op() {
        let mut h = harness();
        h.playground.set_buffer("keep me");
        h.playground.reset_code(&Always(false));
        assert_eq!(h.playground.buffer(), "keep me");
    }

    #[test]
    fn reset_confirmed_restores_the_default_template() {
        let mut h = harness();
        h.playground.set_buffer("scrap this");
        h.playground.output.append("old", OutputKind::Log);
        h.playground.reset_code(&Always(true));
        assert_eq!(h.playground.buffer(), catalog::default_template(Language::Lua));
        assert!(h.playground.output().is_placeholder());
    }

    #[test]
    fn save_then_switch_round_trip() {
        let mut h = harness();
        h.playground.set_buffer("print('saved')");
        h.playground.save_code();
        let (msg, kind) = last_notification(&h);
        assert_eq!(kind, NotifyKind::Success);
        assert_eq!(msg, "Code saved locally");

        h.playground.set_buffer("unsaved edits");
        h.playground.switch_language(Language::Python);
        h.playground.switch_language(Language::Lua);
        // The switch auto-persisted the latest edits.
        assert_eq!(h.playground.buffer(), "unsaved edits");
    }

    #[test]
    fn load_challenge_replaces_buffer_and_clears_log() {
        let mut h = harness();
        h.playground.output.append("stale", OutputKind::Log);
        h.playground.load_challenge("fizzbuzz");

        let expected = catalog::challenge("fizzbuzz")
            .unwrap()
            .template(Language::Lua)
            .unwrap();
        assert_eq!(h.playground.buffer(), expected);
        assert!(h.playground.output().is_placeholder());
        let (msg, kind) = last_notification(&h);
        assert_eq!(kind, NotifyKind::Success);
        assert_eq!(msg, "Loaded challenge: FizzBuzz Classic");
    }

    #[test]
    fn unknown_challenge_changes_nothing() {
        let mut h = harness();
        let before = h.playground.buffer().to_string();
        h.playground.load_challenge("no-such-id");
        assert_eq!(h.playground.buffer(), before);
        let (msg, kind) = last_notification(&h);
        assert_eq!(kind, NotifyKind::Error);
        assert!(msg.contains("no-such-id"));
    }

    #[test]
    fn snippet_missing_for_language_changes_nothing() {
        let mut h = harness();
        let before = h.playground.buffer().to_string();
        // list-comprehensions has no Lua template.
        h.playground.load_snippet("list-comprehensions");
        assert_eq!(h.playground.buffer(), before);
        let (msg, kind) = last_notification(&h);
        assert_eq!(kind, NotifyKind::Error);
        assert!(msg.contains("not available for lua"));
    }

    #[test]
    fn share_blank_buffer_is_a_no_op() {
        let mut h = harness();
        h.playground.set_buffer("");
        assert!(h.playground.share_code(&NoClipboard).is_none());
        let (msg, kind) = last_notification(&h);
        assert_eq!(kind, NotifyKind::Info);
        assert_eq!(msg, "No code to share");
    }

    #[test]
    fn share_then_apply_round_trips_through_the_link() {
        let mut h = harness();
        let source = "print(\"héllo\\n\")";
        h.playground.set_buffer(source);
        let url = h.playground.share_code(&NoClipboard).unwrap();
        // Headless clipboard falls back to presenting the link.
        let (msg, kind) = last_notification(&h);
        assert_eq!(kind, NotifyKind::Info);
        assert!(msg.contains(&url));

        let mut other = harness().playground;
        other.apply_shared(share::token_from_link(&url));
        assert_eq!(other.language(), Language::Lua);
        assert_eq!(other.buffer(), source);
    }

    #[test]
    fn malformed_token_leaves_session_unchanged() {
        let mut h = harness();
        h.playground.set_buffer("my work");
        h.playground.apply_shared("!!!not-a-token!!!");
        assert_eq!(h.playground.language(), Language::Lua);
        assert_eq!(h.playground.buffer(), "my work");
        let (msg, kind) = last_notification(&h);
        assert_eq!(kind, NotifyKind::Error);
        assert_eq!(msg, "Invalid share URL");
    }

    #[test]
    fn applied_share_switches_language_but_never_runs() {
        let mut h = harness();
        let token = share::encode(Language::Python, "print('shared')", Utc::now());
        h.playground.apply_shared(&token);
        assert_eq!(h.playground.language(), Language::Python);
        assert_eq!(h.playground.buffer(), "print('shared')");
        assert!(h.sandbox_runs.borrow().is_empty(), "decoded code must not auto-run");
        let (msg, _) = last_notification(&h);
        assert_eq!(msg, "Shared code loaded!");
    }

    #[test]
    fn clear_output_is_idempotent() {
        let mut h = harness();
        h.playground.output.append("x", OutputKind::Log);
        h.playground.clear_output();
        assert!(h.playground.output().is_placeholder());
        h.playground.clear_output();
        assert!(h.playground.output().is_placeholder());
    }
}
