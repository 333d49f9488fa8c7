// Interactive playground session.
//
// Typed lines accumulate into the editor buffer; colon commands drive the
// playground. The prompt and notifications stay on stderr so stdout only
// carries program output.

use std::io::{self, BufRead, Write};

use scriptpad_config::{EditorTheme, FileStore, Settings};
use scriptpad_core::share;

use crate::term::{print_log, SystemClipboard, TermConfirm};
use crate::CliError;

#[derive(Debug, PartialEq, Eq)]
enum ShellCmd {
    Run,
    Show,
    Clear,
    Save,
    Share,
    Reset,
    Help,
    Quit,
    Lang(String),
    Load(String),
    Snippet(String),
    Theme(Option<String>),
    Unknown(String),
    Code(String),
}

fn parse_cmd(line: &str) -> ShellCmd {
    let trimmed = line.trim_end();
    if !trimmed.starts_with(':') {
        return ShellCmd::Code(trimmed.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or("");
    let arg = parts.next().map(|a| a.trim().to_string()).filter(|a| !a.is_empty());

    match (head, arg) {
        ("run", None) => ShellCmd::Run,
        ("show", None) => ShellCmd::Show,
        ("clear", None) => ShellCmd::Clear,
        ("save", None) => ShellCmd::Save,
        ("share", None) => ShellCmd::Share,
        ("reset", None) => ShellCmd::Reset,
        ("help", None) | ("h", None) => ShellCmd::Help,
        ("quit", None) | ("q", None) | ("exit", None) => ShellCmd::Quit,
        ("lang", Some(name)) => ShellCmd::Lang(name),
        ("load", Some(id)) => ShellCmd::Load(id),
        ("snippet", Some(id)) => ShellCmd::Snippet(id),
        ("theme", arg) => ShellCmd::Theme(arg),
        _ => ShellCmd::Unknown(trimmed.to_string()),
    }
}

const HELP: &str = "\
Commands:
  :run            run the buffer
  :show           print the buffer
  :clear          empty the buffer
  :save           persist the buffer for this language
  :share          build a share link (copies to clipboard when possible)
  :reset          restore the default template
  :lang <name>    switch language (lua, python)
  :load <id>      load a challenge template
  :snippet <id>   load a snippet template
  :theme [name]   show or set the editor theme
  :quit           leave the shell
Anything else is appended to the buffer.";

pub fn run(
    settings: &Settings,
    lang: Option<String>,
    shared: Option<String>,
) -> Result<(), CliError> {
    let language = crate::resolve_lang(settings, lang.as_deref())?;
    let mut playground = crate::build_playground(settings, language);

    if let Some(link) = shared {
        playground.apply_shared(share::token_from_link(&link));
    }

    eprintln!("Scriptpad shell - :help for commands, :quit to leave");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        eprint!("{}> ", playground.language().label());
        let _ = io::stderr().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => return Err(CliError::error(format!("reading stdin: {}", e))),
            None => return Ok(()), // EOF
        };

        match parse_cmd(&line) {
            ShellCmd::Code(code) => {
                let mut buffer = playground.buffer().to_string();
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(&code);
                playground.set_buffer(buffer);
            }
            ShellCmd::Run => {
                playground.run_code();
                print_log(playground.output());
            }
            ShellCmd::Show => println!("{}", playground.buffer()),
            ShellCmd::Clear => playground.set_buffer(""),
            ShellCmd::Save => playground.save_code(),
            ShellCmd::Share => {
                let _ = playground.share_code(&SystemClipboard);
            }
            ShellCmd::Reset => playground.reset_code(&TermConfirm),
            ShellCmd::Lang(name) => match crate::resolve_lang(settings, Some(&name)) {
                Ok(language) => playground.switch_language(language),
                Err(e) => eprintln!("error: {}", e.message),
            },
            ShellCmd::Load(id) => playground.load_challenge(&id),
            ShellCmd::Snippet(id) => playground.load_snippet(&id),
            ShellCmd::Theme(None) => {
                println!("{}", EditorTheme::load(&FileStore::new()).name)
            }
            ShellCmd::Theme(Some(name)) => {
                match EditorTheme::set(&mut FileStore::new(), &name) {
                    Ok(theme) => eprintln!("[ok] theme set to {}", theme.name),
                    Err(e) => eprintln!("error: {}", e),
                }
            }
            ShellCmd::Help => eprintln!("{}", HELP),
            ShellCmd::Quit => return Ok(()),
            ShellCmd::Unknown(cmd) => {
                eprintln!("error: unknown command '{}' (:help lists commands)", cmd)
            }
        }
    }
}
