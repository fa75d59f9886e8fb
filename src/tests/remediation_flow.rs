use super::{ScriptedRunner, ScriptedUi, TestUtils};
use crate::executor::{ExecutionPolicy, RunStatus};
use crate::ui::{Answer, Event, Question};
use pretty_assertions::assert_eq;

const PATHSPEC_ERROR: &str = "error: pathspec 'Feature' did not match any file(s) known to git\n";

fn auto_policy() -> ExecutionPolicy {
    ExecutionPolicy {
        no_confirm: true,
        ..TestUtils::policy()
    }
}

#[test_log::test(tokio::test)]
async fn test_checkout_recovers_through_case_insensitive_match() {
    let runner = ScriptedRunner::new()
        .on("git checkout Feature", TestUtils::failure(PATHSPEC_ERROR))
        .on("git branch -a", TestUtils::success("* main\n  feature\n"))
        .on(
            "git checkout feature",
            TestUtils::success("Switched to branch 'feature'\n"),
        );
    let executor = TestUtils::executor(&runner, TestUtils::policy());
    let mut ui = ScriptedUi::answering(&[Answer::Yes]);

    let commands = TestUtils::commands(&["git checkout Feature", "git status"]);
    let summary = executor.execute(&commands, &mut ui).await;

    assert_eq!(
        runner.calls(),
        vec![
            "git checkout Feature",
            "git branch -a",
            "git checkout feature",
            "git status"
        ]
    );
    assert!(ui.has(&Event::Recovered {
        command: "git checkout feature".to_string(),
        stdout: "Switched to branch 'feature'\n".to_string(),
    }));
    assert!(ui.has(&Event::Suggestions {
        reference: "Feature".to_string(),
        branches: vec!["feature".to_string()],
    }));
    // A recovered step is not a failure, so nothing asks to continue.
    assert_eq!(ui.questions, vec![Question::Execute]);
    assert_eq!(summary.status, RunStatus::Completed);
    assert_eq!((summary.recovered, summary.failed), (1, 0));
}

#[test_log::test(tokio::test)]
async fn test_checkout_falls_back_to_creating_the_branch() {
    let runner = ScriptedRunner::new()
        .on(
            "git checkout topic",
            TestUtils::failure("error: pathspec 'topic' did not match any file(s) known to git\n"),
        )
        .on("git branch -a", TestUtils::success("* main\n"))
        .on(
            "git checkout -b topic",
            TestUtils::success("Switched to a new branch 'topic'\n"),
        );
    let executor = TestUtils::executor(&runner, auto_policy());
    let mut ui = ScriptedUi::default();

    let summary = executor
        .execute(&TestUtils::commands(&["git checkout topic"]), &mut ui)
        .await;

    assert_eq!(
        runner.calls(),
        vec!["git checkout topic", "git branch -a", "git checkout -b topic"]
    );
    assert_eq!(summary.recovered, 1);
    assert_eq!(
        ui.count(|event| matches!(event, Event::Suggestions { .. })),
        0
    );
}

#[test_log::test(tokio::test)]
async fn test_switch_creates_with_dash_c() {
    let runner = ScriptedRunner::new()
        .on(
            "git switch topic",
            TestUtils::failure("fatal: invalid reference: topic\n"),
        )
        .on("git branch -a", TestUtils::success("* main\n"));
    let executor = TestUtils::executor(&runner, auto_policy());
    let mut ui = ScriptedUi::default();

    executor
        .execute(&TestUtils::commands(&["git switch topic"]), &mut ui)
        .await;

    assert_eq!(runner.calls().last().map(String::as_str), Some("git switch -c topic"));
}

#[test_log::test(tokio::test)]
async fn test_failed_branch_listing_reports_the_checkout_failure() {
    let runner = ScriptedRunner::new()
        .on("git checkout Feature", TestUtils::failure(PATHSPEC_ERROR))
        .on(
            "git branch -a",
            TestUtils::failure("fatal: not a git repository\n"),
        );
    let executor = TestUtils::executor(&runner, auto_policy());
    let mut ui = ScriptedUi::default();

    let summary = executor
        .execute(&TestUtils::commands(&["git checkout Feature"]), &mut ui)
        .await;

    assert_eq!(runner.calls(), vec!["git checkout Feature", "git branch -a"]);
    assert!(ui.has(&Event::Outcome(TestUtils::failure(PATHSPEC_ERROR))));
    assert_eq!(summary.failed, 1);
}

#[test_log::test(tokio::test)]
async fn test_every_retry_failing_shows_failure_and_suggestions() {
    let runner = ScriptedRunner::new()
        .on("git checkout Feature", TestUtils::failure(PATHSPEC_ERROR))
        .on(
            "git branch -a",
            TestUtils::success("* main\n  feature\n  feature-login\n"),
        )
        .on("git checkout feature", TestUtils::failure("error: local changes\n"))
        .on(
            "git checkout -b Feature",
            TestUtils::failure("fatal: a branch named 'Feature' already exists\n"),
        );
    let executor = TestUtils::executor(&runner, TestUtils::policy());
    let mut ui = ScriptedUi::answering(&[Answer::Yes, Answer::No]);

    let summary = executor
        .execute(
            &TestUtils::commands(&["git checkout Feature", "git pull"]),
            &mut ui,
        )
        .await;

    assert!(ui.has(&Event::Outcome(TestUtils::failure(PATHSPEC_ERROR))));
    assert!(ui.has(&Event::Suggestions {
        reference: "Feature".to_string(),
        branches: vec!["feature".to_string(), "feature-login".to_string()],
    }));
    assert_eq!(summary.status, RunStatus::Halted);
    assert!(!runner.calls().contains(&"git pull".to_string()));
}

#[test_log::test(tokio::test)]
async fn test_unrelated_failures_are_not_remediated() {
    let runner = ScriptedRunner::new().on(
        "git checkout main",
        TestUtils::failure("error: Your local changes would be overwritten by checkout\n"),
    );
    let executor = TestUtils::executor(&runner, auto_policy());
    let mut ui = ScriptedUi::default();

    executor
        .execute(&TestUtils::commands(&["git checkout main"]), &mut ui)
        .await;

    assert_eq!(runner.calls(), vec!["git checkout main"]);
}

#[test_log::test(tokio::test)]
async fn test_file_restore_is_not_turned_into_a_branch() {
    let pathspec = "error: pathspec 'notes.txt' did not match any file(s) known to git\n";
    let runner = ScriptedRunner::new()
        .on("git checkout -- notes.txt", TestUtils::failure(pathspec))
        .on("git branch -a", TestUtils::success("* main\n"));
    let executor = TestUtils::executor(&runner, auto_policy());
    let mut ui = ScriptedUi::default();

    let summary = executor
        .execute(&TestUtils::commands(&["git checkout -- notes.txt"]), &mut ui)
        .await;

    assert_eq!(runner.calls(), vec!["git checkout -- notes.txt"]);
    assert!(ui.has(&Event::Outcome(TestUtils::failure(pathspec))));
    assert_eq!((summary.recovered, summary.failed), (0, 1));
}

#[test_log::test(tokio::test)]
async fn test_branch_creation_from_missing_start_point_is_not_retried() {
    let invalid = "fatal: invalid reference: origin/missing\n";
    let runner = ScriptedRunner::new()
        .on("git switch -c topic origin/missing", TestUtils::failure(invalid))
        .on("git branch -a", TestUtils::success("* main\n"));
    let executor = TestUtils::executor(&runner, auto_policy());
    let mut ui = ScriptedUi::default();

    let summary = executor
        .execute(
            &TestUtils::commands(&["git switch -c topic origin/missing"]),
            &mut ui,
        )
        .await;

    assert_eq!(runner.calls(), vec!["git switch -c topic origin/missing"]);
    assert!(ui.has(&Event::Outcome(TestUtils::failure(invalid))));
    assert_eq!(
        ui.count(|event| matches!(event, Event::Recovered { .. } | Event::Suggestions { .. })),
        0
    );
    assert_eq!(summary.failed, 1);
}
