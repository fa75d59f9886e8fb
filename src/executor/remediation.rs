//! Recovery for branch switches that name a branch which does not exist.
//!
//! When `git checkout X` or `git switch X` fails because `X` cannot be
//! resolved, the branch list is queried and two retries are tried in order:
//! an existing branch whose name differs from `X` only by case, then creating
//! `X`. Similar branch names are computed independently and only ever shown.

use super::{render, CommandRunner, ExecutionOutcome};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const MAX_SUGGESTIONS: usize = 3;
const AFFIX_LEN: usize = 4;

/// Lower-cased stderr fragments git prints when a reference cannot be
/// resolved.
const REFERENCE_NOT_FOUND: &[&str] = &[
    "did not match any file(s) known to git",
    "invalid reference",
    "unknown revision",
    "not a valid object name",
    "not a valid ref",
    "couldn't find remote ref",
    "no such branch",
    "does not exist",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remediation {
    /// A retry succeeded; `command` is what actually ran.
    Recovered { command: String, stdout: String },
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationReport {
    pub remediation: Remediation,
    /// The reference that could not be found, when one was extracted.
    pub target: Option<String>,
    pub suggestions: Vec<String>,
}

impl RemediationReport {
    fn not_applicable() -> Self {
        Self {
            remediation: Remediation::NotApplicable,
            target: None,
            suggestions: Vec::new(),
        }
    }
}

/// Options that make checkout/switch create a branch rather than move to one.
const CREATE_FLAGS: &[&str] = &[
    "-b",
    "-B",
    "-c",
    "-C",
    "--orphan",
    "--create",
    "--force-create",
];

/// The reference a plain branch switch moves to.
///
/// Only `checkout <ref>` / `switch <ref>` with exactly one positional
/// argument qualify. A `--` separator (path restore), a create flag or a
/// second positional (start point or pathspec) means the command is not a
/// switch to an existing branch.
pub fn switch_target(args: &[String]) -> Option<&str> {
    let (subcommand, rest) = args.split_first()?;
    if !matches!(subcommand.as_str(), "checkout" | "switch") {
        return None;
    }
    let mut positional = None;
    for arg in rest {
        if arg == "--" || CREATE_FLAGS.iter().any(|flag| arg.split('=').next() == Some(*flag)) {
            return None;
        }
        if arg.starts_with('-') {
            continue;
        }
        if positional.replace(arg.as_str()).is_some() {
            return None;
        }
    }
    positional
}

pub fn is_reference_not_found(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    REFERENCE_NOT_FOUND.iter().any(|pattern| stderr.contains(pattern))
}

pub struct BranchRemediation<'a> {
    runner: &'a dyn CommandRunner,
    cwd: &'a Path,
    command_timeout: Duration,
    branch_query_timeout: Duration,
}

impl<'a> BranchRemediation<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        cwd: &'a Path,
        command_timeout: Duration,
        branch_query_timeout: Duration,
    ) -> Self {
        Self {
            runner,
            cwd,
            command_timeout,
            branch_query_timeout,
        }
    }

    /// Tries to recover from a failed command given its arguments (without
    /// the tool token) and its stderr.
    pub async fn attempt(&self, args: &[String], stderr: &str) -> RemediationReport {
        let Some(target) = switch_target(args) else {
            return RemediationReport::not_applicable();
        };
        if !is_reference_not_found(stderr) {
            return RemediationReport::not_applicable();
        }

        let Some(branches) = self.list_branches().await else {
            return RemediationReport::not_applicable();
        };

        let suggestions = similar_branches(target, &branches);
        let mut report = RemediationReport {
            remediation: Remediation::NotApplicable,
            target: Some(target.to_string()),
            suggestions,
        };

        for candidate in retry_candidates(&args[0], target, &branches) {
            let command = render(&candidate);
            debug!(%command, "trying remediation");
            if let ExecutionOutcome::Success { stdout } = self
                .runner
                .run(&candidate, self.cwd, self.command_timeout)
                .await
            {
                info!(%command, "recovered missing branch reference");
                report.remediation = Remediation::Recovered { command, stdout };
                break;
            }
        }
        report
    }

    async fn list_branches(&self) -> Option<Vec<String>> {
        let args = ["branch".to_string(), "-a".to_string()];
        match self
            .runner
            .run(&args, self.cwd, self.branch_query_timeout)
            .await
        {
            ExecutionOutcome::Success { stdout } => Some(normalize_branch_list(&stdout)),
            other => {
                debug!(outcome = ?other, "branch listing failed, skipping remediation");
                None
            }
        }
    }
}

/// Reduces `git branch -a` output to plain, unique branch names.
///
/// Drops the current-branch marker, `remotes/<remote>/` prefixes, symbolic
/// `->` entries, detached-HEAD lines and `HEAD` itself.
pub fn normalize_branch_list(output: &str) -> Vec<String> {
    let mut branches: Vec<String> = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        let line = line
            .strip_prefix('*')
            .or_else(|| line.strip_prefix('+'))
            .unwrap_or(line)
            .trim();
        if line.is_empty() || line.contains("->") || line.starts_with('(') {
            continue;
        }
        let name = match line.strip_prefix("remotes/") {
            Some(remote) => match remote.split_once('/') {
                Some((_, name)) => name,
                None => continue,
            },
            None => line,
        };
        if name == "HEAD" || branches.iter().any(|b| b == name) {
            continue;
        }
        branches.push(name.to_string());
    }
    branches
}

/// Retry commands, in the order they should be tried.
pub fn retry_candidates(subcommand: &str, target: &str, branches: &[String]) -> Vec<Vec<String>> {
    let mut candidates = Vec::new();
    if let Some(existing) = branches
        .iter()
        .find(|b| b.as_str() != target && b.eq_ignore_ascii_case(target))
    {
        candidates.push(vec![subcommand.to_string(), existing.clone()]);
    }
    let create_flag = if subcommand == "switch" { "-c" } else { "-b" };
    candidates.push(vec![
        subcommand.to_string(),
        create_flag.to_string(),
        target.to_string(),
    ]);
    candidates
}

/// Up to three branch names resembling `target`, best first.
///
/// Tiers: case-insensitive equality, substring containment in either
/// direction, then a shared four-character prefix or suffix (only for targets
/// longer than three characters). Ties keep branch-list order.
pub fn similar_branches(target: &str, branches: &[String]) -> Vec<String> {
    let wanted = target.to_lowercase();
    let lowered: Vec<String> = branches.iter().map(|b| b.to_lowercase()).collect();

    let tiers: [&dyn Fn(&str) -> bool; 3] = [
        &|b: &str| b == wanted,
        &|b: &str| b.contains(wanted.as_str()) || wanted.contains(b),
        &|b: &str| wanted.chars().count() > 3 && shares_affix(&wanted, b),
    ];

    let mut picked: Vec<String> = Vec::new();
    for tier in tiers {
        for (branch, lower) in branches.iter().zip(&lowered) {
            if picked.len() == MAX_SUGGESTIONS {
                return picked;
            }
            if tier(lower.as_str()) && !picked.contains(branch) {
                picked.push(branch.clone());
            }
        }
    }
    picked
}

fn shares_affix(a: &str, b: &str) -> bool {
    let prefix = |s: &str| s.chars().take(AFFIX_LEN).collect::<String>();
    let suffix = |s: &str| {
        let chars: Vec<char> = s.chars().collect();
        chars[chars.len().saturating_sub(AFFIX_LEN)..].iter().collect::<String>()
    };
    if a.chars().count() < AFFIX_LEN || b.chars().count() < AFFIX_LEN {
        return false;
    }
    prefix(a) == prefix(b) || suffix(a) == suffix(b)
}
