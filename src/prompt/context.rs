//! Loader for `USER:` / `BOT:` context files.

use super::Example;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(user|bot)[ \t]*:").expect("label pattern is valid")
});

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read context file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn load_context_file(path: &Path) -> Result<Vec<Example>, ContextError> {
    if !path.exists() {
        return Err(ContextError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| ContextError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let examples = parse_context(&content);
    debug!(path = %path.display(), count = examples.len(), "loaded context examples");
    Ok(examples)
}

/// Extracts example pairs from context text.
///
/// Labels are matched case-insensitively at the start of a line; a label's
/// text runs until the next label or the end of input. A `USER` block only
/// forms an example when a `BOT` block follows it directly. Text without any
/// labels yields nothing.
pub fn parse_context(content: &str) -> Vec<Example> {
    let labels: Vec<(bool, usize, usize)> = LABEL_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let is_user = caps.get(1)?.as_str().eq_ignore_ascii_case("user");
            Some((is_user, whole.start(), whole.end()))
        })
        .collect();

    let mut examples = Vec::new();
    let mut pending_user: Option<&str> = None;
    for (i, &(is_user, _, text_start)) in labels.iter().enumerate() {
        let text_end = labels.get(i + 1).map_or(content.len(), |next| next.1);
        let text = content[text_start..text_end].trim();

        if is_user {
            pending_user = Some(text).filter(|t| !t.is_empty());
        } else if let Some(user) = pending_user.take() {
            if !text.is_empty() {
                examples.push(Example::new(user, text));
            }
        }
    }
    examples
}
