//! Few-shot prompt assembly.
//!
//! The prompt is a flat text block: an instruction preamble, the most recent
//! [`EXAMPLE_WINDOW`] example turns, then the user's query as an unanswered
//! turn.

pub mod context;
mod examples;

pub use context::{load_context_file, parse_context, ContextError};
pub use examples::built_in;

/// Number of example turn pairs embedded in a prompt.
pub const EXAMPLE_WINDOW: usize = 10;

const USER_LABEL: &str = "Human:";
const BOT_LABEL: &str = "Assistant:";

const PREAMBLE: &str = "\
You are a Git command expert. Convert natural language descriptions into valid Git commands.
Reply with one Git command per line and nothing else.

CRITICAL RULES:
- For TIME periods (hours, days, weeks): use HEAD@{N.hours.ago} or --since syntax
- For COMMIT counts: use HEAD~N syntax
- 'go back 6 hours' means git reset --hard HEAD@{6.hours.ago} (TIME)
- 'go back 6 commits' means git reset --hard HEAD~6 (COMMITS)
- 'go back to yesterday' means git reset --hard HEAD@{1.day.ago} (TIME)
- 'show commits from 5 hours ago' means git log --since=\"5 hours ago\" --oneline
- Prefer --force-with-lease over --force

Examples:
";

/// A natural-language request paired with the command text that answers it.
///
/// `command` may hold several newline-separated commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub user: String,
    pub command: String,
}

impl Example {
    pub fn new(user: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            command: command.into(),
        }
    }
}

/// Builds the prompt for `query`.
///
/// Context examples are appended after the static ones, so when the combined
/// corpus is larger than the window they win over built-in pairs.
pub fn build_prompt(query: &str, static_examples: &[Example], context_examples: &[Example]) -> String {
    let combined: Vec<&Example> = static_examples.iter().chain(context_examples).collect();
    let window = &combined[combined.len().saturating_sub(EXAMPLE_WINDOW)..];

    let mut prompt = String::from(PREAMBLE);
    for example in window {
        push_turn(&mut prompt, &example.user, &example.command);
        prompt.push('\n');
    }
    push_line(&mut prompt, USER_LABEL, query.trim());
    prompt.push_str(BOT_LABEL);
    prompt
}

fn push_turn(prompt: &mut String, user: &str, command: &str) {
    push_line(prompt, USER_LABEL, user);
    push_line(prompt, BOT_LABEL, command);
}

fn push_line(prompt: &mut String, label: &str, text: &str) {
    prompt.push_str(label);
    prompt.push(' ');
    prompt.push_str(text);
    prompt.push('\n');
}
