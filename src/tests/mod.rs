use crate::ai::{AIError, GenerationParams, Generator};
use crate::executor::{CommandRunner, ExecutionOutcome, ExecutionPolicy, SafeExecutor};
use crate::session::Session;
use crate::ui::{Answer, Event, Question, Ui};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

mod remediation_flow;

/// `Ui` fed from scripted answers and shell lines; records everything.
#[derive(Default)]
pub(crate) struct ScriptedUi {
    pub answers: VecDeque<Answer>,
    pub lines: VecDeque<String>,
    pub events: Vec<Event>,
    pub questions: Vec<Question>,
}

impl ScriptedUi {
    pub fn answering(answers: &[Answer]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn typing(lines: &[&str], answers: &[Answer]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            ..Self::answering(answers)
        }
    }

    pub fn has(&self, wanted: &Event) -> bool {
        self.events.iter().any(|event| event == wanted)
    }

    pub fn count(&self, matches: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|event| matches(event)).count()
    }
}

#[async_trait]
impl Ui for ScriptedUi {
    fn report(&mut self, event: Event) {
        self.events.push(event);
    }

    async fn confirm(&mut self, question: Question) -> Answer {
        self.questions.push(question);
        self.answers.pop_front().unwrap_or(Answer::Interrupted)
    }

    async fn read_query(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}

/// `CommandRunner` answering from a script keyed by the rendered command.
/// Unscripted commands succeed with empty output.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    script: Mutex<HashMap<String, VecDeque<ExecutionOutcome>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(self: &Arc<Self>, command: &str, outcome: ExecutionOutcome) -> Arc<Self> {
        self.script
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(outcome);
        Arc::clone(self)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[String], _cwd: &Path, _timeout: Duration) -> ExecutionOutcome {
        let command = crate::executor::render(args);
        self.calls.lock().unwrap().push(command.clone());
        self.script
            .lock()
            .unwrap()
            .get_mut(&command)
            .and_then(VecDeque::pop_front)
            .unwrap_or(ExecutionOutcome::Success {
                stdout: String::new(),
            })
    }
}

/// `Generator` that returns canned replies in order and records prompts.
pub(crate) struct CannedGenerator {
    replies: Mutex<VecDeque<Result<String, AIError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl CannedGenerator {
    pub fn new(replies: Vec<Result<String, AIError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Generator for CannedGenerator {
    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> Result<String, AIError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AIError::Api("no canned reply left".to_string())))
    }
}

pub(crate) struct TestUtils;

impl TestUtils {
    pub fn commands(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    pub fn policy() -> ExecutionPolicy {
        ExecutionPolicy::default()
    }

    pub fn executor(runner: &Arc<ScriptedRunner>, policy: ExecutionPolicy) -> SafeExecutor {
        SafeExecutor::new(Arc::clone(runner) as Arc<dyn CommandRunner>, policy)
    }

    pub fn session(
        replies: Vec<Result<String, AIError>>,
        runner: &Arc<ScriptedRunner>,
        policy: ExecutionPolicy,
    ) -> Session {
        Session::new(
            Box::new(CannedGenerator::new(replies)),
            GenerationParams::default(),
            Vec::new(),
            Self::executor(runner, policy),
        )
    }

    pub fn failure(stderr: &str) -> ExecutionOutcome {
        ExecutionOutcome::Failure {
            exit_code: 1,
            stderr: stderr.to_string(),
        }
    }

    pub fn success(stdout: &str) -> ExecutionOutcome {
        ExecutionOutcome::Success {
            stdout: stdout.to_string(),
        }
    }
}
