//! Per-process pipeline context.
//!
//! A [`Session`] is built once at start-up and owns everything that is
//! expensive or fixed for the lifetime of the process: the model client, the
//! example corpus and the executor. Each query goes through
//! [`Session::process_query`].

use crate::ai::{GenerationParams, Generator};
use crate::executor::{RunSummary, SafeExecutor};
use crate::parser::parse_commands;
use crate::prompt::{build_prompt, built_in, Example};
use crate::ui::{Event, Ui};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Executed(RunSummary),
    GenerationFailed(String),
}

pub struct Session {
    generator: Box<dyn Generator>,
    params: GenerationParams,
    static_examples: Vec<Example>,
    context_examples: Vec<Example>,
    executor: SafeExecutor,
}

impl Session {
    pub fn new(
        generator: Box<dyn Generator>,
        params: GenerationParams,
        context_examples: Vec<Example>,
        executor: SafeExecutor,
    ) -> Self {
        Self {
            generator,
            params,
            static_examples: built_in(),
            context_examples,
            executor,
        }
    }

    /// Runs one query end to end. Failures are reported through `ui` and
    /// returned as values; nothing here aborts the caller.
    pub async fn process_query(&self, query: &str, ui: &mut dyn Ui) -> QueryOutcome {
        let prompt = build_prompt(query, &self.static_examples, &self.context_examples);
        debug!(prompt_chars = prompt.len(), "built prompt");

        ui.report(Event::Thinking);
        let output = match self.generator.generate(&prompt, &self.params).await {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "generation failed");
                let message = e.to_string();
                ui.report(Event::InferenceFailed(message.clone()));
                return QueryOutcome::GenerationFailed(message);
            }
        };
        debug!(%output, "model output");

        let commands = parse_commands(&output);
        QueryOutcome::Executed(self.executor.execute(&commands, ui).await)
    }
}
