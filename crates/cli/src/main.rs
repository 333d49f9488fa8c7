// Scriptpad CLI - playground sessions from the terminal

mod exit_codes;
mod shell;
mod term;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use scriptpad_config::{EditorTheme, FileStore, Settings};
use scriptpad_core::backend::{LuaBackend, PythonBackend};
use scriptpad_core::{
    catalog, code_key, share, Clipboard, CodeStore, Confirm, Language, NoClipboard,
    OutputKind, Playground,
};

use exit_codes::{
    EXIT_ERROR, EXIT_RUN_INIT, EXIT_RUN_SCRIPT, EXIT_SHARE_DECODE, EXIT_SUCCESS, EXIT_USAGE,
};
use term::{print_log, SystemClipboard, TermConfirm, TermNotifier};

#[derive(Parser)]
#[command(name = "spad")]
#[command(about = "Scriptpad - a two-language code playground")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive playground session (default)
    Shell {
        /// Starting language
        #[arg(long, short = 'l')]
        lang: Option<String>,

        /// Share link or token to load before the first prompt
        #[arg(long)]
        shared: Option<String>,
    },

    /// Run a file (or stdin) through the playground
    #[command(after_help = "\
Examples:
  spad run hello.lua
  spad run analysis.py --lang python
  echo 'print(1 + 1)' | spad run
  spad run --lang python  < script.py")]
    Run {
        /// Source file (omit to read from stdin)
        file: Option<PathBuf>,

        /// Language (inferred from the file extension when omitted)
        #[arg(long, short = 'l')]
        lang: Option<String>,
    },

    /// Build a share link for a file or the saved buffer
    Share {
        /// Source file (omit to share the saved buffer)
        file: Option<PathBuf>,

        /// Language
        #[arg(long, short = 'l')]
        lang: Option<String>,

        /// Print the link without touching the clipboard
        #[arg(long)]
        no_clipboard: bool,
    },

    /// Persist a file (or stdin) as the saved buffer for a language
    Save {
        /// Source file (omit to read from stdin)
        file: Option<PathBuf>,

        /// Language
        #[arg(long, short = 'l')]
        lang: Option<String>,
    },

    /// Decode a share link and print the embedded code
    Open {
        /// Share link or bare token
        link: String,

        /// Also persist the decoded code as the saved buffer
        #[arg(long)]
        save: bool,
    },

    /// List coding challenges
    Challenges {
        #[arg(long)]
        json: bool,
    },

    /// List code snippets
    Snippets {
        #[arg(long)]
        json: bool,
    },

    /// Print a challenge or snippet template
    Load {
        /// Challenge (or, with --snippet, snippet) id
        id: String,

        /// Look the id up among snippets instead of challenges
        #[arg(long)]
        snippet: bool,

        /// Language
        #[arg(long, short = 'l')]
        lang: Option<String>,
    },

    /// Show or set the editor theme
    Theme {
        /// Theme name (omit to print the current theme)
        name: Option<String>,
    },

    /// Reset the saved buffer to the default template
    Reset {
        /// Language
        #[arg(long, short = 'l')]
        lang: Option<String>,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List supported languages
    Langs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::load();

    let result = match cli.command {
        None => shell::run(&settings, None, None),
        Some(Commands::Shell { lang, shared }) => shell::run(&settings, lang, shared),
        Some(Commands::Run { file, lang }) => cmd_run(&settings, file, lang),
        Some(Commands::Share { file, lang, no_clipboard }) => {
            cmd_share(&settings, file, lang, no_clipboard)
        }
        Some(Commands::Save { file, lang }) => cmd_save(&settings, file, lang),
        Some(Commands::Open { link, save }) => cmd_open(&link, save),
        Some(Commands::Challenges { json }) => cmd_challenges(json),
        Some(Commands::Snippets { json }) => cmd_snippets(json),
        Some(Commands::Load { id, snippet, lang }) => cmd_load(&settings, &id, snippet, lang),
        Some(Commands::Theme { name }) => cmd_theme(name),
        Some(Commands::Reset { lang, yes }) => cmd_reset(&settings, lang, yes),
        Some(Commands::Langs) => cmd_langs(),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Non-zero exit with nothing extra on stderr (the log already said it).
    fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }
}

/// Build a playground wired to the on-disk store and terminal adapters.
pub fn build_playground(settings: &Settings, language: Language) -> Playground {
    let lua = LuaBackend::with_timeout(settings.run_timeout());
    let python = match settings.python_bin() {
        Some(bin) => PythonBackend::with_interpreter(bin),
        None => PythonBackend::new(),
    }
    .with_timeout(settings.run_timeout());

    Playground::new(
        language,
        Box::new(FileStore::new()),
        Box::new(TermNotifier),
        Box::new(lua),
        Box::new(python),
        settings.share_base_url.clone(),
    )
}

pub fn resolve_lang(settings: &Settings, lang: Option<&str>) -> Result<Language, CliError> {
    match lang {
        None => Ok(settings.language()),
        Some(name) => Language::parse(name).ok_or_else(|| {
            CliError::args(format!("unknown language '{}'", name))
                .with_hint(format!("supported: {}", lang_list()))
        }),
    }
}

fn lang_list() -> String {
    Language::ALL
        .iter()
        .map(|l| l.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn lang_for_file(path: &PathBuf) -> Option<Language> {
    match path.extension()?.to_str()? {
        "lua" => Some(Language::Lua),
        "py" => Some(Language::Python),
        _ => None,
    }
}

fn read_source(file: Option<&PathBuf>) -> Result<String, CliError> {
    match file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| CliError::error(format!("reading {}: {}", path.display(), e))),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| CliError::error(format!("reading stdin: {}", e)))?;
            Ok(source)
        }
    }
}

fn cmd_run(
    settings: &Settings,
    file: Option<PathBuf>,
    lang: Option<String>,
) -> Result<(), CliError> {
    let language = match (&lang, &file) {
        (Some(name), _) => resolve_lang(settings, Some(name.as_str()))?,
        (None, Some(path)) => lang_for_file(path).unwrap_or(settings.language()),
        (None, None) => settings.language(),
    };

    let source = read_source(file.as_ref())?;
    let mut playground = build_playground(settings, language);
    playground.set_buffer(source);
    playground.run_code();
    print_log(playground.output());

    let lines = playground.output().lines();
    let init_failed = lines
        .iter()
        .any(|l| l.kind == OutputKind::Error && l.text.starts_with("Error initializing"));
    if init_failed {
        return Err(CliError::silent(EXIT_RUN_INIT));
    }
    if lines.iter().any(|l| l.kind == OutputKind::Error) {
        return Err(CliError::silent(EXIT_RUN_SCRIPT));
    }
    Ok(())
}

fn cmd_share(
    settings: &Settings,
    file: Option<PathBuf>,
    lang: Option<String>,
    no_clipboard: bool,
) -> Result<(), CliError> {
    let language = match (&lang, &file) {
        (Some(name), _) => resolve_lang(settings, Some(name.as_str()))?,
        (None, Some(path)) => lang_for_file(path).unwrap_or(settings.language()),
        (None, None) => settings.language(),
    };

    let mut playground = build_playground(settings, language);
    if file.is_some() {
        playground.set_buffer(read_source(file.as_ref())?);
    }

    let clipboard: &dyn Clipboard = if no_clipboard { &NoClipboard } else { &SystemClipboard };
    match playground.share_code(clipboard) {
        Some(url) => {
            println!("{}", url);
            Ok(())
        }
        None => Err(CliError::args("nothing to share")),
    }
}

fn cmd_save(
    settings: &Settings,
    file: Option<PathBuf>,
    lang: Option<String>,
) -> Result<(), CliError> {
    let language = match (&lang, &file) {
        (Some(name), _) => resolve_lang(settings, Some(name.as_str()))?,
        (None, Some(path)) => lang_for_file(path).unwrap_or(settings.language()),
        (None, None) => settings.language(),
    };

    let source = read_source(file.as_ref())?;
    let mut store = FileStore::new();
    store
        .save(&code_key(language), &source)
        .map_err(CliError::error)?;
    eprintln!("[ok] saved as the {} buffer", language.label());
    Ok(())
}

fn cmd_open(link: &str, save: bool) -> Result<(), CliError> {
    let token = share::token_from_link(link);
    let (language, code) = share::decode(token).map_err(|e| CliError {
        code: EXIT_SHARE_DECODE,
        message: format!("invalid share link: {}", e),
        hint: Some("expected a spad share URL or its token".to_string()),
    })?;

    eprintln!("[info] shared {} code:", language.label());
    println!("{}", code);

    if save {
        let mut store = FileStore::new();
        store
            .save(&code_key(language), &code)
            .map_err(CliError::error)?;
        eprintln!("[ok] saved as the {} buffer", language.label());
    }
    Ok(())
}

fn cmd_challenges(json: bool) -> Result<(), CliError> {
    if json {
        let entries: Vec<_> = catalog::CHALLENGES
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "title": c.title,
                    "description": c.description,
                    "languages": labels(&c.languages()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries).map_err(|e| CliError::error(e.to_string()))?);
    } else {
        for c in catalog::CHALLENGES {
            println!("{:<12} {} - {}", c.id, c.title, c.description);
        }
    }
    Ok(())
}

fn cmd_snippets(json: bool) -> Result<(), CliError> {
    if json {
        let entries: Vec<_> = catalog::SNIPPETS
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id,
                    "languages": labels(&s.languages()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries).map_err(|e| CliError::error(e.to_string()))?);
    } else {
        for s in catalog::SNIPPETS {
            println!("{:<20} ({})", s.id, labels(&s.languages()).join(", "));
        }
    }
    Ok(())
}

fn labels(languages: &[Language]) -> Vec<&'static str> {
    languages.iter().map(|l| l.label()).collect()
}

fn cmd_load(
    settings: &Settings,
    id: &str,
    snippet: bool,
    lang: Option<String>,
) -> Result<(), CliError> {
    let language = resolve_lang(settings, lang.as_deref())?;

    let template = if snippet {
        catalog::snippet(id)
            .ok_or_else(|| CliError::args(format!("unknown snippet '{}'", id)))?
            .template(language)
    } else {
        catalog::challenge(id)
            .ok_or_else(|| CliError::args(format!("unknown challenge '{}'", id)))?
            .template(language)
    };

    match template {
        Some(code) => {
            println!("{}", code);
            Ok(())
        }
        None => Err(CliError::error(format!(
            "'{}' has no {} template",
            id,
            language.label()
        ))),
    }
}

fn cmd_theme(name: Option<String>) -> Result<(), CliError> {
    let mut store = FileStore::new();
    match name {
        None => {
            println!("{}", EditorTheme::load(&store).name);
            Ok(())
        }
        Some(name) => {
            let theme = EditorTheme::set(&mut store, &name).map_err(CliError::args)?;
            eprintln!("[ok] theme set to {}", theme.name);
            Ok(())
        }
    }
}

struct AlwaysYes;

impl Confirm for AlwaysYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

fn cmd_reset(settings: &Settings, lang: Option<String>, yes: bool) -> Result<(), CliError> {
    let language = resolve_lang(settings, lang.as_deref())?;
    let mut playground = build_playground(settings, language);

    let confirm: &dyn Confirm = if yes { &AlwaysYes } else { &TermConfirm };
    let before = playground.buffer().to_string();
    playground.reset_code(confirm);
    if playground.buffer() == before && before != catalog::default_template(language) {
        // Declined at the prompt.
        return Ok(());
    }
    playground.save_code();
    Ok(())
}

fn cmd_langs() -> Result<(), CliError> {
    for lang in Language::ALL {
        let backend = if lang.is_sandboxed() { "sandboxed interpreter" } else { "in-process" };
        println!("{:<8} {}", lang.label(), backend);
    }
    Ok(())
}
