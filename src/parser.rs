//! Turns raw model output into an ordered list of Git commands.

/// Invocation token every retained command starts with.
pub const TOOL_TOKEN: &str = "git";

/// Read-only command substituted when the model output holds no command.
pub const FALLBACK_COMMAND: &str = "git status";

/// Extracts commands from `model_output`, one per line, in order.
///
/// Never returns an empty list: when nothing survives filtering the result is
/// `[FALLBACK_COMMAND]`.
pub fn parse_commands(model_output: &str) -> Vec<String> {
    let commands: Vec<String> = model_output
        .lines()
        .filter_map(normalize_line)
        .filter(|line| is_tool_invocation(line))
        .map(str::to_string)
        .collect();

    if commands.is_empty() {
        vec![FALLBACK_COMMAND.to_string()]
    } else {
        commands
    }
}

fn normalize_line(line: &str) -> Option<&str> {
    let mut line = line.trim();
    if let Some(inner) = line
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        line = inner.trim();
    }
    if let Some(rest) = line.strip_prefix(|c: char| c == '$' || c == '>') {
        line = rest.trim();
    }
    (!line.is_empty()).then_some(line)
}

/// `git` followed by whitespace; `gitk` or a bare `git` do not count.
pub fn is_tool_invocation(line: &str) -> bool {
    line.strip_prefix(TOOL_TOKEN)
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_whitespace)
}
