//! AI assistant collaborator
//!
//! The terminal's `ai` commands ask an [`AiCompletion`] for an answer and
//! fall back to fixed text when none is attached or the call fails.
//!
//! Requests never block the terminal. [`ask`] hands the assistant an
//! [`AiResponder`] and returns at once; the terminal keeps the matching
//! [`PendingAnswer`] and polls it until the assistant responds, now or
//! on a later tick.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{AppError, AppResult};

/// Chat-completion style assistant
pub trait AiCompletion {
    /// Start answering `prompt`; `include_context` asks the assistant to
    /// consider recent terminal activity
    ///
    /// Must return without waiting for the answer. The result goes to
    /// `reply` whenever it is ready, which may be before this returns.
    /// Dropping `reply` unanswered counts as a failed request.
    fn get_response(&self, prompt: &str, include_context: bool, reply: AiResponder);
}

type Slot = Rc<RefCell<Option<AppResult<String>>>>;

/// Sending half of a one-shot answer
#[derive(Debug)]
pub struct AiResponder {
    slot: Slot,
}

impl AiResponder {
    /// Deliver the answer or the failure
    pub fn respond(self, result: AppResult<String>) {
        *self.slot.borrow_mut() = Some(result);
    }
}

/// Receiving half of a one-shot answer
#[derive(Debug)]
pub struct PendingAnswer {
    slot: Slot,
}

impl PendingAnswer {
    /// The result, once the assistant has responded
    ///
    /// A responder dropped without responding yields an error.
    pub fn poll(&self) -> Option<AppResult<String>> {
        let taken = self.slot.borrow_mut().take();
        if taken.is_some() {
            return taken;
        }
        if Rc::strong_count(&self.slot) == 1 {
            return Some(Err(AppError::AiFailed("no response".into())));
        }
        None
    }
}

/// Linked responder and pending answer
pub fn reply_channel() -> (AiResponder, PendingAnswer) {
    let slot: Slot = Rc::new(RefCell::new(None));
    (
        AiResponder { slot: slot.clone() },
        PendingAnswer { slot },
    )
}

/// Subcommands of `ai`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiTask {
    Explain,
    Debug,
    Suggest,
    Help,
}

impl AiTask {
    pub fn parse(name: &str) -> Option<AiTask> {
        match name.to_ascii_lowercase().as_str() {
            "explain" => Some(AiTask::Explain),
            "debug" => Some(AiTask::Debug),
            "suggest" => Some(AiTask::Suggest),
            "help" => Some(AiTask::Help),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AiTask::Explain => "explain",
            AiTask::Debug => "debug",
            AiTask::Suggest => "suggest",
            AiTask::Help => "help",
        }
    }

    /// Prompt sent to the assistant for `input`
    pub fn prompt(self, input: &str) -> String {
        match self {
            AiTask::Explain => format!("Explain this command or concept concisely: {}", input),
            AiTask::Debug => format!("Help debug this error and suggest a fix: {}", input),
            AiTask::Suggest => format!("Suggest terminal commands to accomplish: {}", input),
            AiTask::Help => "List what you can help with in this terminal.".to_string(),
        }
    }

    /// Text shown when the assistant cannot answer
    pub fn canned(self, input: &str) -> String {
        match self {
            AiTask::Explain => format!(
                "'{}' - try 'help {}' for built-in usage. The AI assistant is offline, so only built-in help is available.",
                input,
                input.split_whitespace().next().unwrap_or_default()
            ),
            AiTask::Debug => "Check the command spelling, run 'help' for usage, and verify paths with 'ls' and 'pwd'.".to_string(),
            AiTask::Suggest => "Try 'ls' to look around, 'cd <dir>' to move, 'open <app>' to launch an app.".to_string(),
            AiTask::Help => HELP_TEXT.to_string(),
        }
    }
}

/// Usage for the `ai` namespace
pub const HELP_TEXT: &str = "ai explain <topic>   explain a command or concept
ai debug <error>     suggest a fix for an error
ai suggest <goal>    suggest commands for a task
ai help              show this help";

/// Text to print for an `ai` command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiReply {
    pub text: String,
    /// Why canned text was used instead of the assistant
    pub fallback: Option<AppError>,
}

/// Outcome of [`ask`]
#[derive(Debug)]
pub enum AiAnswer {
    /// Answered locally, nothing to wait for
    Ready(AiReply),
    /// Sent to the assistant; pass the result to [`answer`] when it arrives
    Pending(PendingAnswer),
}

/// Send `task` to `ai`, or answer locally
///
/// `ai help` and a missing assistant are answered at once with canned
/// text.
pub fn ask(ai: Option<&dyn AiCompletion>, task: AiTask, input: &str) -> AiAnswer {
    if task == AiTask::Help {
        return AiAnswer::Ready(canned(task, input, None));
    }
    let Some(ai) = ai else {
        return AiAnswer::Ready(canned(task, input, Some(AppError::AiUnavailable)));
    };
    let (responder, pending) = reply_channel();
    ai.get_response(&task.prompt(input), true, responder);
    AiAnswer::Pending(pending)
}

/// Turn the assistant's result into printable text
///
/// Never fails: an error or an empty answer produce the task's canned
/// text.
pub fn answer(task: AiTask, input: &str, result: AppResult<String>) -> AiReply {
    match result {
        Ok(text) if !text.trim().is_empty() => AiReply {
            text,
            fallback: None,
        },
        Ok(_) => {
            tracing::warn!(task = task.name(), "AI returned an empty answer");
            canned(task, input, Some(AppError::AiFailed("empty response".into())))
        }
        Err(e) => {
            tracing::warn!(task = task.name(), error = %e, "AI request failed");
            canned(task, input, Some(e))
        }
    }
}

fn canned(task: AiTask, input: &str, fallback: Option<AppError>) -> AiReply {
    AiReply {
        text: task.canned(input),
        fallback,
    }
}
