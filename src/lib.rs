pub mod ai;
pub mod config;
pub mod executor;
pub mod logging;
pub mod parser;
pub mod prompt;
pub mod session;
pub mod shell;
pub mod theme;
pub mod ui;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use ai::{AIError, GenerationParams, Generator, HttpGenerator};
pub use config::Config;
pub use executor::{CommandRunner, ExecutionOutcome, ExecutionPolicy, GitRunner, SafeExecutor};
pub use parser::parse_commands;
pub use prompt::{build_prompt, Example};
pub use session::{QueryOutcome, Session};
