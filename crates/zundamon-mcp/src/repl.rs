//! Interactive REPL for the hello-zundamon MCP server.
//!
//! Launch with `zundamon-mcp repl`. Requests go through the same registry and
//! dispatcher as the stdio server. Type `/help` for commands, Tab to complete.

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

use zundamon::PeoplePolicy;

use crate::handlers::build_registry;
use crate::protocol::Dispatcher;
use crate::resources::ResourceRegistry;
use crate::tools::ToolRegistry;
use crate::types::{InitializeResult, JsonRpcMessage, JsonRpcRequest, RequestId, JSONRPC_VERSION};

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/info", "Show server capabilities"),
    ("/resources", "List resources"),
    ("/read", "Read a resource: /read <uri>"),
    ("/tools", "List tools"),
    ("/call", "Call a tool: /call <name> [json-arguments]"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// Completes commands, resource URIs after `/read` and tool names after `/call`.
struct ZundaHelper {
    uris: Vec<String>,
    tools: Vec<String>,
}

impl ZundaHelper {
    fn new() -> Self {
        Self {
            uris: ResourceRegistry::list_resources()
                .into_iter()
                .map(|r| r.uri)
                .collect(),
            tools: ToolRegistry::list_tools().into_iter().map(|t| t.name).collect(),
        }
    }
}

impl Completer for ZundaHelper {
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

        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        let candidates = match cmd {
            "/read" => &self.uris,
            "/call" if !args.contains(' ') => &self.tools,
            _ => return Ok((pos, Vec::new())),
        };

        let prefix_start = input.len() - args.len();
        let matches: Vec<Pair> = candidates
            .iter()
            .filter(|c| c.starts_with(args.trim()))
            .map(|c| Pair {
                display: c.clone(),
                replacement: format!("{c} "),
            })
            .collect();
        Ok((prefix_start, matches))
    }
}

impl Hinter for ZundaHelper {
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

impl Highlighter for ZundaHelper {}
impl Validator for ZundaHelper {}
impl Helper for ZundaHelper {}

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

/// REPL state: the dispatcher and the next request id.
struct ReplState {
    dispatcher: Dispatcher,
    next_id: i64,
}

impl ReplState {
    fn request(&mut self, method: &str, params: Option<Value>) -> JsonRpcMessage {
        self.next_id += 1;
        let request = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: RequestId::Number(self.next_id),
            method: method.to_string(),
            params,
        };
        self.dispatcher.dispatch(&request)
    }
}

/// Run the interactive REPL.
pub fn run(policy: PeoplePolicy) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mzundamon-mcp v{}\x1b[0m \x1b[90m\u{2014} ずんだもんのMCPサーバーなのだ\x1b[0m",
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

    let mut rl: Editor<ZundaHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(ZundaHelper::new()));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".zundamon_mcp_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let registry = Arc::new(build_registry(policy)?);
    let mut state = ReplState {
        dispatcher: Dispatcher::new(registry),
        next_id: 0,
    };
    let prompt = " \x1b[36mzunda>\x1b[0m ";

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

                let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
                let args = args.trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m またねなのだ！");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(&state),
                    "resources" => print_reply(&state.request("resources/list", None)),
                    "tools" => print_reply(&state.request("tools/list", None)),
                    "read" => cmd_read(args, &mut state),
                    "call" => cmd_call(args, &mut state),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m またねなのだ！");
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
    eprintln!("  Tip: Tab completes commands, resource URIs and tool names.");
    eprintln!();
}

fn cmd_info(state: &ReplState) {
    let options = InitializeResult::new(state.dispatcher.registry().server_capabilities());
    let methods: Vec<_> = state
        .dispatcher
        .registry()
        .kinds()
        .map(|k| k.method())
        .collect();
    eprintln!();
    eprintln!(
        "  Server:   {} v{}",
        options.server_info.name, options.server_info.version
    );
    eprintln!("  Protocol: {}", options.protocol_version);
    eprintln!("  Methods:  {}", methods.join(", "));
    eprintln!();
}

fn cmd_read(args: &str, state: &mut ReplState) {
    if args.is_empty() {
        eprintln!("  Usage: /read <uri>");
        return;
    }
    let uri = args.split_whitespace().next().unwrap_or(args);
    print_reply(&state.request("resources/read", Some(json!({ "uri": uri }))));
}

fn cmd_call(args: &str, state: &mut ReplState) {
    if args.is_empty() {
        eprintln!("  Usage: /call <name> [json-arguments]");
        return;
    }
    let (name, raw_args) = args.split_once(' ').unwrap_or((args, ""));
    let arguments = if raw_args.trim().is_empty() {
        json!({})
    } else {
        match serde_json::from_str::<Value>(raw_args.trim()) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("  Arguments are not valid JSON: {e}");
                return;
            }
        }
    };
    print_reply(&state.request(
        "tools/call",
        Some(json!({ "name": name, "arguments": arguments })),
    ));
}

fn print_reply(reply: &JsonRpcMessage) {
    let body = match reply {
        JsonRpcMessage::Response(r) => &r.result,
        JsonRpcMessage::Error(e) => {
            eprintln!("  \x1b[31merror {}\x1b[0m {}", e.error.code, e.error.message);
            return;
        }
        _ => return,
    };

    // Show text payloads directly, everything else as JSON.
    let texts: Vec<&str> = body
        .get("content")
        .or_else(|| body.get("contents"))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|i| i.get("text")?.as_str()).collect())
        .unwrap_or_default();

    eprintln!();
    if texts.is_empty() {
        eprintln!(
            "{}",
            serde_json::to_string_pretty(body).unwrap_or_else(|e| e.to_string())
        );
    } else {
        for text in texts {
            eprintln!("  {text}");
        }
    }
    eprintln!();
}
