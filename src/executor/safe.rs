use super::remediation::{BranchRemediation, Remediation};
use super::{tokenize, CommandRunner, ExecutionOutcome};
use crate::ui::{Event, Question, Ui};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BRANCH_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ExecutionPolicy {
    pub dry_run: bool,
    pub no_confirm: bool,
    pub working_dir: PathBuf,
    pub command_timeout: Duration,
    pub branch_query_timeout: Duration,
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self {
            dry_run: false,
            no_confirm: false,
            working_dir: PathBuf::from("."),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            branch_query_timeout: DEFAULT_BRANCH_QUERY_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Plan shown, nothing executed.
    DryRun,
    /// The user declined (or interrupted) the initial confirmation.
    Cancelled,
    /// Every command was attempted.
    Completed,
    /// The user stopped the run after a failure.
    Halted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub status: RunStatus,
    pub attempted: usize,
    pub succeeded: usize,
    pub recovered: usize,
    pub failed: usize,
}

impl RunSummary {
    fn new(status: RunStatus) -> Self {
        Self {
            status,
            attempted: 0,
            succeeded: 0,
            recovered: 0,
            failed: 0,
        }
    }
}

/// How a single step ended once remediation has had its chance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepResolution {
    Succeeded,
    Recovered,
    NeedsUserDecision,
}

/// Shows a command plan, gates it behind confirmation and runs it step by
/// step.
pub struct SafeExecutor {
    runner: Arc<dyn CommandRunner>,
    policy: ExecutionPolicy,
}

impl SafeExecutor {
    pub fn new(runner: Arc<dyn CommandRunner>, policy: ExecutionPolicy) -> Self {
        Self { runner, policy }
    }

    pub async fn execute(&self, commands: &[String], ui: &mut dyn Ui) -> RunSummary {
        if commands.is_empty() {
            ui.report(Event::NothingToRun);
            return RunSummary::new(RunStatus::Completed);
        }

        ui.report(Event::Plan(commands.to_vec()));

        if self.policy.dry_run {
            ui.report(Event::DryRun);
            return RunSummary::new(RunStatus::DryRun);
        }

        if !self.policy.no_confirm && !ui.confirm(Question::Execute).await.is_yes() {
            ui.report(Event::Cancelled);
            return RunSummary::new(RunStatus::Cancelled);
        }

        ui.report(Event::Executing);
        let mut summary = RunSummary::new(RunStatus::Completed);
        let total = commands.len();

        for (i, command) in commands.iter().enumerate() {
            ui.report(Event::Started {
                index: i + 1,
                total,
                command: command.clone(),
            });
            summary.attempted += 1;

            match self.run_step(command, ui).await {
                StepResolution::Succeeded => summary.succeeded += 1,
                StepResolution::Recovered => summary.recovered += 1,
                StepResolution::NeedsUserDecision => {
                    summary.failed += 1;
                    let is_last = i + 1 == total;
                    if !is_last
                        && !self.policy.no_confirm
                        && !ui.confirm(Question::ContinueAfterFailure).await.is_yes()
                    {
                        ui.report(Event::Stopped);
                        summary.status = RunStatus::Halted;
                        break;
                    }
                }
            }
        }

        info!(?summary, "execution finished");
        ui.report(Event::Completed);
        summary
    }

    async fn run_step(&self, command: &str, ui: &mut dyn Ui) -> StepResolution {
        let Some(args) = tokenize(command) else {
            ui.report(Event::Outcome(ExecutionOutcome::UnexpectedError(format!(
                "not a git command: {command}"
            ))));
            return StepResolution::NeedsUserDecision;
        };

        let outcome = self
            .runner
            .run(&args, &self.policy.working_dir, self.policy.command_timeout)
            .await;

        match outcome {
            ExecutionOutcome::Success { .. } => {
                ui.report(Event::Outcome(outcome));
                StepResolution::Succeeded
            }
            ExecutionOutcome::Failure { ref stderr, .. } => {
                let report = BranchRemediation::new(
                    self.runner.as_ref(),
                    &self.policy.working_dir,
                    self.policy.command_timeout,
                    self.policy.branch_query_timeout,
                )
                .attempt(&args, stderr)
                .await;

                let resolution = match report.remediation {
                    Remediation::Recovered { command, stdout } => {
                        ui.report(Event::Recovered { command, stdout });
                        StepResolution::Recovered
                    }
                    Remediation::NotApplicable => {
                        warn!(%command, "command failed");
                        ui.report(Event::Outcome(outcome.clone()));
                        StepResolution::NeedsUserDecision
                    }
                };
                if let Some(reference) = report.target.filter(|_| !report.suggestions.is_empty()) {
                    ui.report(Event::Suggestions {
                        reference,
                        branches: report.suggestions,
                    });
                }
                resolution
            }
            ExecutionOutcome::Timeout(_) | ExecutionOutcome::UnexpectedError(_) => {
                warn!(%command, ?outcome, "command did not complete");
                ui.report(Event::Outcome(outcome));
                StepResolution::NeedsUserDecision
            }
        }
    }
}
