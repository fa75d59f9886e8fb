//! Interaction port used by the pipeline.
//!
//! Nothing in the pipeline prints or reads the terminal directly; it reports
//! [`Event`]s and asks yes/no [`Question`]s through a [`Ui`]. The console
//! front end lives in [`console`].

pub mod console;

pub use console::ConsoleUi;

use crate::executor::ExecutionOutcome;
use async_trait::async_trait;

/// Reply to a yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// End of input or Ctrl-C while waiting for the answer.
    Interrupted,
}

impl Answer {
    pub fn is_yes(self) -> bool {
        self == Answer::Yes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    /// Asked once, after the plan is shown.
    Execute,
    /// Asked after a failed step when more commands remain.
    ContinueAfterFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Banner,
    Help,
    Goodbye,
    Thinking,
    InferenceFailed(String),
    Plan(Vec<String>),
    NothingToRun,
    DryRun,
    Cancelled,
    Executing,
    Started {
        index: usize,
        total: usize,
        command: String,
    },
    Outcome(ExecutionOutcome),
    Recovered {
        command: String,
        stdout: String,
    },
    Suggestions {
        reference: String,
        branches: Vec<String>,
    },
    Stopped,
    Completed,
}

#[async_trait]
pub trait Ui: Send {
    fn report(&mut self, event: Event);

    async fn confirm(&mut self, question: Question) -> Answer;

    /// Next line typed at the shell prompt; `None` on end of input or
    /// interrupt.
    async fn read_query(&mut self) -> Option<String>;
}
