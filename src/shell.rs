//! Interactive read-eval loop over the [`Ui`] port.

use crate::session::Session;
use crate::ui::{Event, Ui};

#[derive(Debug, PartialEq, Eq)]
pub enum ShellInput<'a> {
    Exit,
    Help,
    Empty,
    Query(&'a str),
}

impl<'a> ShellInput<'a> {
    pub fn classify(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ShellInput::Empty;
        }
        match line.to_lowercase().as_str() {
            "exit" | "quit" => ShellInput::Exit,
            "help" => ShellInput::Help,
            _ => ShellInput::Query(line),
        }
    }
}

/// Runs queries until `exit`/`quit`, end of input or interrupt. Returns the
/// number of queries processed.
pub async fn run_interactive(session: &Session, ui: &mut dyn Ui) -> usize {
    ui.report(Event::Banner);
    let mut processed = 0;

    while let Some(line) = ui.read_query().await {
        match ShellInput::classify(&line) {
            ShellInput::Exit => break,
            ShellInput::Help => ui.report(Event::Help),
            ShellInput::Empty => continue,
            ShellInput::Query(query) => {
                session.process_query(query, ui).await;
                processed += 1;
            }
        }
    }

    ui.report(Event::Goodbye);
    processed
}
