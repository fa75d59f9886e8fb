use super::{Answer, Event, Question, Ui};
use crate::executor::ExecutionOutcome;
use crate::theme::Theme;
use async_trait::async_trait;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const SHELL_PROMPT: &str = "giti> ";

const SHELL_HELP: &str = "
Available commands:
  - Any natural language Git query (e.g. \"commit all changes\")
  - help: Show this help message
  - exit/quit: Exit the shell
";

/// Terminal front end: themed output on stdout, answers from stdin.
pub struct ConsoleUi {
    theme: Theme,
    input: Lines<BufReader<Stdin>>,
}

enum Line {
    Text(String),
    Closed,
}

impl ConsoleUi {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            input: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn read_line(&mut self, prompt: &str) -> Line {
        print!("{prompt}");
        // A failed flush only delays the prompt text.
        let _ = io::stdout().flush();

        tokio::select! {
            line = self.input.next_line() => match line {
                Ok(Some(text)) => Line::Text(text),
                Ok(None) | Err(_) => {
                    println!();
                    Line::Closed
                }
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                Line::Closed
            }
        }
    }

    fn render_outcome(&self, outcome: &ExecutionOutcome) {
        match outcome {
            ExecutionOutcome::Success { stdout } => {
                println!("{}", self.theme.success.apply("✅ Success"));
                if !stdout.trim().is_empty() {
                    println!("📤 Output:\n{}", stdout.trim_end());
                }
            }
            ExecutionOutcome::Failure { exit_code, stderr } => {
                println!(
                    "{}",
                    self.theme
                        .error
                        .apply(&format!("❌ Error (exit code {exit_code})"))
                );
                if !stderr.trim().is_empty() {
                    println!("📥 Error output:\n{}", stderr.trim_end());
                }
            }
            ExecutionOutcome::Timeout(after) => {
                println!(
                    "{}",
                    self.theme
                        .error
                        .apply(&format!("⏰ Command timed out after {} seconds", after.as_secs()))
                );
            }
            ExecutionOutcome::UnexpectedError(message) => {
                println!(
                    "{}",
                    self.theme.error.apply(&format!("❌ Unexpected error: {message}"))
                );
            }
        }
    }
}

#[async_trait]
impl Ui for ConsoleUi {
    fn report(&mut self, event: Event) {
        let theme = &self.theme;
        match event {
            Event::Banner => {
                println!("{}", theme.header.apply("Welcome to giti interactive shell!"));
                println!("Type 'exit' or 'quit' to leave, 'help' for assistance\n");
            }
            Event::Help => println!("{SHELL_HELP}"),
            Event::Goodbye => println!("Goodbye!"),
            Event::Thinking => println!("Thinking..."),
            Event::InferenceFailed(message) => println!(
                "{}",
                theme.error.apply(&format!("Error processing query: {message}"))
            ),
            Event::Plan(commands) => {
                println!("{}", theme.header.apply("Generated commands:"));
                for (i, command) in commands.iter().enumerate() {
                    println!("  {}. {}", i + 1, theme.command.apply(command));
                }
                println!();
            }
            Event::NothingToRun => println!("{}", theme.warning.apply("❌ No commands to execute")),
            Event::DryRun => println!("{}", theme.warning.apply("Dry run mode - commands not executed")),
            Event::Cancelled => println!("{}", theme.warning.apply("❌ Execution cancelled")),
            Event::Executing => println!("🚀 Executing commands..."),
            Event::Started {
                index,
                total,
                command,
            } => println!("\n[{index}/{total}] {}", theme.command.apply(&command)),
            Event::Outcome(outcome) => self.render_outcome(&outcome),
            Event::Recovered { command, stdout } => {
                println!(
                    "{}",
                    theme
                        .success
                        .apply(&format!("✅ Recovered by running: {command}"))
                );
                if !stdout.trim().is_empty() {
                    println!("📤 Output:\n{}", stdout.trim_end());
                }
            }
            Event::Suggestions {
                reference,
                branches,
            } => {
                println!(
                    "{}",
                    theme
                        .suggestion
                        .apply(&format!("💡 Branches similar to '{reference}':"))
                );
                for branch in branches {
                    println!("   - {}", theme.suggestion.apply(&branch));
                }
            }
            Event::Stopped => println!("{}", theme.warning.apply("🛑 Execution stopped")),
            Event::Completed => println!("\n✨ Command execution completed"),
        }
    }

    async fn confirm(&mut self, question: Question) -> Answer {
        let prompt = match question {
            Question::Execute => "Execute these commands? [y/N]: ",
            Question::ContinueAfterFailure => "Continue with remaining commands? [y/N]: ",
        };
        loop {
            match self.read_line(prompt).await {
                Line::Closed => {
                    println!("{}", self.theme.warning.apply("❌ Cancelled by user"));
                    return Answer::Interrupted;
                }
                Line::Text(text) => match parse_answer(&text) {
                    Some(answer) => return answer,
                    None => println!("Please enter 'y' for yes or 'n' for no"),
                },
            }
        }
    }

    async fn read_query(&mut self) -> Option<String> {
        match self.read_line(SHELL_PROMPT).await {
            Line::Text(text) => Some(text),
            Line::Closed => None,
        }
    }
}

/// `y`/`yes` or `n`/`no`/empty, case-insensitive; anything else is `None`.
pub fn parse_answer(text: &str) -> Option<Answer> {
    match text.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(Answer::Yes),
        "" | "n" | "no" => Some(Answer::No),
        _ => None,
    }
}
