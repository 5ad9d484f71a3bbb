//! Interactive REPL for the ASP server.
//!
//! Launch with `asp-server repl` to query sheets by hand through the same
//! dispatcher the transports use. Type `/help` for available commands, Tab
//! for completion.

use std::path::PathBuf;
use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde_json::{json, Value};

use asp_sheets::{CsvBackend, SpreadsheetBackend};

use crate::protocol::ProtocolHandler;
use crate::transport::framing;
use crate::types::{AspRequest, Envelope};

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/discover", "List the tools an agent can discover"),
    ("/sheets", "List available sheets"),
    ("/read", "Read a range: /read <sheet> <range>"),
    ("/send", "Send a raw request: /send {\"type\": ...}"),
    ("/load", "Serve sheets from another directory"),
    ("/info", "Show server capabilities"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion.
#[derive(Default)]
struct SheetHelper {
    sheets: Vec<String>,
}

impl Completer for SheetHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        // Sheet name completion for the first /read argument
        let parts: Vec<&str> = input.splitn(2, ' ').collect();
        let cmd = parts[0];
        let args = if parts.len() > 1 { parts[1] } else { "" };

        if cmd == "/read" && !args.trim_start().contains(' ') {
            let prefix_start = input.len() - args.trim_start().len();
            let matches: Vec<Pair> = self
                .sheets
                .iter()
                .filter(|s| s.starts_with(args.trim_start()))
                .map(|s| Pair {
                    display: s.clone(),
                    replacement: format!("{s} "),
                })
                .collect();
            return Ok((prefix_start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for SheetHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for SheetHelper {}
impl Validator for SheetHelper {}
impl Helper for SheetHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Session state.
struct ReplState {
    data_dir: PathBuf,
    backend: Arc<CsvBackend>,
    handler: ProtocolHandler,
}

impl ReplState {
    fn open(data_dir: PathBuf) -> anyhow::Result<Self> {
        let backend = Arc::new(CsvBackend::new(&data_dir));
        let handler = ProtocolHandler::with_backend(backend.clone())?;
        Ok(Self {
            data_dir,
            backend,
            handler,
        })
    }

    fn sheet_names(&self) -> Vec<String> {
        self.backend.list_tables().unwrap_or_default()
    }
}

/// Run the interactive REPL against the sheets in `data_dir`.
pub fn run(data_dir: PathBuf) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1masp-server v{}\x1b[0m \x1b[90m\u{2014} Spreadsheets for AI Agents\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut state = ReplState::open(data_dir)?;

    let mut rl: Editor<SheetHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(SheetHelper {
        sheets: state.sheet_names(),
    }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = PathBuf::from(&home).join(".asp_server_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let prompt = " \x1b[36masp>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(&state),
                    "discover" | "tools" => print_envelope(&state.handler.discover()),
                    "sheets" => cmd_sheets(&state),
                    "read" => cmd_read(args, &state),
                    "send" => cmd_send(args, &state),
                    "load" => {
                        if cmd_load(args, &mut state) {
                            if let Some(helper) = rl.helper_mut() {
                                helper.sheets = state.sheet_names();
                            }
                        }
                    }
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: Tab completes commands and, after /read, sheet names.");
    eprintln!();
}

fn cmd_info(state: &ReplState) {
    let info = state.handler.server_info();
    eprintln!();
    eprintln!("  Server:   {} v{}", info.name, info.version);
    eprintln!("  Protocol: ASP {}", info.protocol_version);
    eprintln!("  Types:    {}", info.message_types.join(", "));
    eprintln!("  Tools:    {}", info.tools.len());
    eprintln!("  Sheets:   {}", state.data_dir.display());
    eprintln!();
}

fn cmd_sheets(state: &ReplState) {
    dispatch(state, AspRequest::new("SHEET_LIST", json!({})));
}

fn cmd_read(args: &str, state: &ReplState) {
    let mut parts = args.split_whitespace();
    let (Some(sheet), Some(range)) = (parts.next(), parts.next()) else {
        eprintln!("  Usage: /read <sheet> <range>   e.g. /read Sheet1 A1:D10");
        return;
    };
    dispatch(
        state,
        AspRequest::new("READ_RANGE", json!({ "sheet": sheet, "range": range })),
    );
}

fn cmd_send(args: &str, state: &ReplState) {
    if args.is_empty() {
        eprintln!("  Usage: /send {{\"type\": \"SHEET_LIST\", \"payload\": {{}}}}");
        return;
    }
    match framing::parse_request(args) {
        Ok(request) => dispatch(state, request),
        Err(e) => print_envelope(&state.handler.error_envelope(&e)),
    }
}

fn cmd_load(args: &str, state: &mut ReplState) -> bool {
    if args.is_empty() {
        eprintln!("  Usage: /load <directory>");
        return false;
    }
    let dir = PathBuf::from(args.split_whitespace().next().unwrap_or(args));
    let backend = CsvBackend::new(&dir);
    match backend.list_tables() {
        Ok(sheets) => match ReplState::open(dir.clone()) {
            Ok(next) => {
                eprintln!("  Loaded: {} ({} sheets)", dir.display(), sheets.len());
                *state = next;
                true
            }
            Err(e) => {
                eprintln!("  Failed to load: {e}");
                false
            }
        },
        Err(e) => {
            eprintln!("  Failed to load {}: {e}", dir.display());
            false
        }
    }
}

fn dispatch(state: &ReplState, request: AspRequest) {
    print_envelope(&state.handler.handle_message(&request));
}

fn print_envelope(envelope: &Envelope) {
    let value = serde_json::to_value(envelope).unwrap_or(Value::Null);
    match serde_json::to_string_pretty(&value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("  Error: {e}"),
    }
}
