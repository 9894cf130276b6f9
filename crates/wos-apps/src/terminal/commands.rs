//! Builtin terminal commands
//!
//! Commands live in a [`CommandRegistry`] table of verb to handler, so the
//! full command surface can be listed (for `help` and Tab completion) and
//! extended without touching the dispatcher. Handlers never fail outward:
//! problems are printed into the terminal as red lines.

use wos_desktop::Clock;
use wos_terminal::{theme, AnsiColor, Palette, TerminalEngine};

use crate::ai::{self, AiAnswer, AiCompletion, AiReply, AiTask, PendingAnswer};
use crate::registry::AppRegistry;
use crate::terminal::fs::{FileTree, NodeKind};

/// App opened by the `code` command
pub const CODE_EDITOR_APP: &str = "code-editor";

/// Everything a handler may touch
pub struct CommandContext<'a> {
    pub engine: &'a mut TerminalEngine,
    pub commands: &'a CommandRegistry,
    pub files: &'a FileTree,
    pub apps: &'a AppRegistry,
    pub ai: Option<&'a dyn AiCompletion>,
    pub clock: &'a dyn Clock,
    /// Set by a command returning [`CommandOutcome::Pending`]
    pub awaiting: Option<AwaitingAi>,
}

/// An `ai` request the assistant has not answered yet
#[derive(Debug)]
pub struct AwaitingAi {
    pub task: AiTask,
    pub input: String,
    pub answer: PendingAnswer,
}

impl CommandContext<'_> {
    fn print(&mut self, text: &str) {
        self.engine.writeln(text);
    }

    fn print_colored(&mut self, text: &str, color: AnsiColor) {
        self.engine.writeln_colored(text, color);
    }

    fn error(&mut self, text: &str) -> CommandOutcome {
        self.engine.writeln_colored(text, AnsiColor::Red);
        CommandOutcome::Failed
    }
}

/// What the terminal app must do after a command ran
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    /// The command printed an error
    Failed,
    /// Apply this palette to every tab
    ThemeChanged(&'static Palette),
    /// Waiting on the AI assistant; the prompt returns with the answer
    Pending,
}

pub type Handler = fn(&mut CommandContext<'_>, &[&str]) -> CommandOutcome;

/// One builtin verb
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Verb table, in `help` order
#[derive(Clone, Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every builtin verb
    pub fn builtins() -> Self {
        let mut registry = Self::new();
        for command in BUILTINS {
            registry.register(*command);
        }
        registry
    }

    /// Add a command, replacing one with the same name
    pub fn register(&mut self, command: Command) {
        match self.commands.iter_mut().find(|c| c.name == command.name) {
            Some(slot) => *slot = command,
            None => self.commands.push(command),
        }
    }

    pub fn get(&self, verb: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == verb)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|c| c.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Run one submitted line
///
/// The verb is matched case-insensitively; unknown verbs print an error
/// and a hint.
pub fn execute(ctx: &mut CommandContext<'_>, line: &str) -> CommandOutcome {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return CommandOutcome::Done;
    };
    let verb = verb.to_lowercase();
    let args: Vec<&str> = words.collect();

    match ctx.commands.get(&verb).map(|c| c.handler) {
        Some(handler) => {
            tracing::debug!(verb = %verb, args = args.len(), "running command");
            handler(ctx, &args)
        }
        None => {
            tracing::debug!(verb = %verb, "unknown command");
            let outcome = ctx.error(&format!("Command not found: {}", verb));
            ctx.print_colored(
                "Type 'help' for a list of available commands.",
                AnsiColor::Yellow,
            );
            outcome
        }
    }
}

// =============================================================================
// Builtins
// =============================================================================

const BUILTINS: &[Command] = &[
    Command {
        name: "help",
        usage: "help [command]",
        summary: "Show available commands",
        handler: cmd_help,
    },
    Command {
        name: "clear",
        usage: "clear",
        summary: "Clear the screen",
        handler: cmd_clear,
    },
    Command {
        name: "echo",
        usage: "echo [text...]",
        summary: "Print text, expanding $VARIABLES",
        handler: cmd_echo,
    },
    Command {
        name: "date",
        usage: "date",
        summary: "Show the current date and time",
        handler: cmd_date,
    },
    Command {
        name: "whoami",
        usage: "whoami",
        summary: "Show the current user",
        handler: cmd_whoami,
    },
    Command {
        name: "pwd",
        usage: "pwd",
        summary: "Print the working directory",
        handler: cmd_pwd,
    },
    Command {
        name: "ls",
        usage: "ls [path]",
        summary: "List directory contents",
        handler: cmd_ls,
    },
    Command {
        name: "cd",
        usage: "cd [path]",
        summary: "Change the working directory",
        handler: cmd_cd,
    },
    Command {
        name: "open",
        usage: "open <app>",
        summary: "Open a desktop app",
        handler: cmd_open,
    },
    Command {
        name: "code",
        usage: "code [file]",
        summary: "Open the code editor",
        handler: cmd_code,
    },
    Command {
        name: "theme",
        usage: "theme [list|name]",
        summary: "List or change the terminal theme",
        handler: cmd_theme,
    },
    Command {
        name: "history",
        usage: "history [-c]",
        summary: "Show or clear command history",
        handler: cmd_history,
    },
    Command {
        name: "ai",
        usage: "ai <explain|debug|suggest|help> [text...]",
        summary: "Ask the AI assistant",
        handler: cmd_ai,
    },
];

fn cmd_help(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandOutcome {
    if let Some(verb) = args.first() {
        let verb = verb.to_lowercase();
        return match ctx.commands.get(&verb) {
            Some(command) => {
                let (usage, summary) = (command.usage, command.summary);
                ctx.print(&format!("Usage: {}", usage));
                ctx.print(&format!("  {}", summary));
                CommandOutcome::Done
            }
            None => ctx.error(&format!("help: no such command: {}", verb)),
        };
    }

    ctx.print_colored("Available commands:", AnsiColor::Cyan);
    let lines: Vec<String> = ctx
        .commands
        .iter()
        .map(|c| format!("  {:<10} {}", c.name, c.summary))
        .collect();
    for line in lines {
        ctx.print(&line);
    }
    CommandOutcome::Done
}

fn cmd_clear(ctx: &mut CommandContext<'_>, _args: &[&str]) -> CommandOutcome {
    ctx.engine.clear();
    CommandOutcome::Done
}

fn cmd_echo(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandOutcome {
    let text = args
        .iter()
        .map(|word| match word.strip_prefix('$') {
            Some(name) if !name.is_empty() => ctx.engine.env(name).unwrap_or_default().to_string(),
            _ => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    ctx.print(&text);
    CommandOutcome::Done
}

fn cmd_date(ctx: &mut CommandContext<'_>, _args: &[&str]) -> CommandOutcome {
    let now = format_utc(ctx.clock.now_ms());
    ctx.print(&now);
    CommandOutcome::Done
}

fn cmd_whoami(ctx: &mut CommandContext<'_>, _args: &[&str]) -> CommandOutcome {
    let user = ctx.engine.env("USER").unwrap_or("user").to_string();
    ctx.print(&user);
    CommandOutcome::Done
}

fn cmd_pwd(ctx: &mut CommandContext<'_>, _args: &[&str]) -> CommandOutcome {
    let cwd = ctx.engine.current_dir().to_string();
    ctx.print(&cwd);
    CommandOutcome::Done
}

fn cmd_ls(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandOutcome {
    let arg = args.first().copied().unwrap_or(".");
    let path = ctx.files.normalize(ctx.engine.current_dir(), arg);
    match ctx.files.kind(&path) {
        Some(NodeKind::File) => {
            ctx.print(arg);
            return CommandOutcome::Done;
        }
        None => {
            return ctx.error(&format!(
                "ls: cannot access '{}': No such file or directory",
                arg
            ))
        }
        Some(NodeKind::Dir) => {}
    }

    let entries = match ctx.files.list(&path) {
        Ok(entries) => entries,
        Err(e) => return ctx.error(&format!("ls: {}", e)),
    };
    if entries.is_empty() {
        return CommandOutcome::Done;
    }
    let listing = entries
        .iter()
        .map(|entry| match entry.kind {
            NodeKind::Dir => format!(
                "{}{}/{}",
                AnsiColor::Blue.escape(),
                entry.name,
                wos_terminal::ansi::RESET
            ),
            NodeKind::File => entry.name.clone(),
        })
        .collect::<Vec<_>>()
        .join("  ");
    ctx.print(&listing);
    CommandOutcome::Done
}

fn cmd_cd(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandOutcome {
    let arg = args.first().copied().unwrap_or("~");
    match ctx.files.resolve_dir(ctx.engine.current_dir(), arg) {
        Ok(dir) => {
            ctx.engine.set_current_dir(dir);
            CommandOutcome::Done
        }
        Err(e) => ctx.error(&format!("cd: {}", e)),
    }
}

fn cmd_open(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandOutcome {
    let Some(id) = args.first() else {
        ctx.print("Usage: open <app>");
        let available = ctx.apps.ids().collect::<Vec<_>>().join(", ");
        ctx.print(&format!("Available apps: {}", available));
        return CommandOutcome::Done;
    };
    let id = id.to_lowercase();
    match ctx.apps.open(&id) {
        Ok(entry) => {
            let message = format!("Opening {}...", entry.title);
            ctx.print_colored(&message, AnsiColor::Green);
            CommandOutcome::Done
        }
        Err(e) => {
            let outcome = ctx.error(&format!("open: {}", e));
            let available = ctx.apps.ids().collect::<Vec<_>>().join(", ");
            ctx.print(&format!("Available apps: {}", available));
            outcome
        }
    }
}

fn cmd_code(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandOutcome {
    match ctx.apps.open(CODE_EDITOR_APP) {
        Ok(entry) => {
            let message = match args.first() {
                Some(file) => format!("Opening {} in {}...", file, entry.title),
                None => format!("Opening {}...", entry.title),
            };
            ctx.print_colored(&message, AnsiColor::Green);
            CommandOutcome::Done
        }
        Err(_) => ctx.error("code: the code editor is not installed"),
    }
}

fn cmd_theme(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandOutcome {
    match args.first().copied() {
        None | Some("list") => {
            let current = ctx.engine.theme().name;
            ctx.print_colored("Available themes:", AnsiColor::Cyan);
            for name in theme::names() {
                let marker = if name == current { "*" } else { " " };
                ctx.print(&format!("  {} {}", marker, name));
            }
            CommandOutcome::Done
        }
        Some(name) => match theme::find(&name.to_lowercase()) {
            Some(palette) => {
                ctx.print_colored(&format!("Theme changed to {}", palette.name), AnsiColor::Green);
                CommandOutcome::ThemeChanged(palette)
            }
            None => {
                let outcome = ctx.error(&format!("theme: unknown theme '{}'", name));
                ctx.print("Run 'theme list' to see available themes.");
                outcome
            }
        },
    }
}

fn cmd_history(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandOutcome {
    if args.first() == Some(&"-c") {
        ctx.engine.clear_history();
        return CommandOutcome::Done;
    }
    let lines: Vec<String> = ctx
        .engine
        .history()
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>4}  {}", i + 1, line))
        .collect();
    for line in lines {
        ctx.print(&line);
    }
    CommandOutcome::Done
}

fn cmd_ai(ctx: &mut CommandContext<'_>, args: &[&str]) -> CommandOutcome {
    let Some((sub, rest)) = args.split_first() else {
        ctx.print(ai::HELP_TEXT);
        return CommandOutcome::Done;
    };
    let Some(task) = AiTask::parse(sub) else {
        let outcome = ctx.error(&format!("ai: unknown subcommand '{}'", sub));
        ctx.print(ai::HELP_TEXT);
        return outcome;
    };
    let input = rest.join(" ");
    if task != AiTask::Help && input.is_empty() {
        return ctx.error(&format!("Usage: ai {} <text>", task.name()));
    }

    match ai::ask(ctx.ai, task, &input) {
        AiAnswer::Ready(reply) => {
            print_reply(ctx.engine, &reply);
            CommandOutcome::Done
        }
        AiAnswer::Pending(answer) => {
            ctx.awaiting = Some(AwaitingAi {
                task,
                input,
                answer,
            });
            CommandOutcome::Pending
        }
    }
}

/// Print an `ai` answer, flagging canned text in red
pub fn print_reply(engine: &mut TerminalEngine, reply: &AiReply) {
    match &reply.fallback {
        None => engine.writeln(&reply.text),
        Some(reason) => {
            engine.writeln_colored(&format!("{} (showing offline help)", reason), AnsiColor::Red);
            engine.writeln_colored(&reply.text, AnsiColor::Yellow);
        }
    }
}

// =============================================================================
// Time formatting
// =============================================================================

/// Format a Unix timestamp in milliseconds as `YYYY-MM-DD HH:MM:SS UTC`
pub fn format_utc(ms: f64) -> String {
    let secs = (ms / 1000.0).floor() as i64;
    let (year, month, day) = civil_from_days(secs.div_euclid(86_400));
    let rem = secs.rem_euclid(86_400);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
        year,
        month,
        day,
        rem / 3600,
        rem % 3600 / 60,
        rem % 60
    )
}

/// Proleptic Gregorian date for days since 1970-01-01
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
