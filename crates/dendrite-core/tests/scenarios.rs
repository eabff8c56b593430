//! End-to-end router scenarios against a temp vault, with the escalation
//! collaborator stubbed out.

use std::path::Path;

use dendrite_core::escalate::{EscalateError, Escalator};
use dendrite_core::{LocalStore, Router};

/// Stub that either answers with a fixed string or fails, so escalation
/// fallback paths can be exercised without a live model.
struct StubEscalator {
    answer: Option<&'static str>,
}

impl StubEscalator {
    fn up(answer: &'static str) -> Self {
        StubEscalator { answer: Some(answer) }
    }

    fn down() -> Self {
        StubEscalator { answer: None }
    }
}

impl Escalator for StubEscalator {
    async fn escalate(&self, _question: &str) -> Result<String, EscalateError> {
        match self.answer {
            Some(text) => Ok(text.to_string()),
            None => Err(EscalateError::Request("connection refused".to_string())),
        }
    }
}

fn router<'a>(
    store: &'a LocalStore,
    escalator: &'a StubEscalator,
    root: &'a Path,
) -> Router<'a, StubEscalator> {
    Router::new(store, escalator, root)
}

#[tokio::test]
async fn thought_command_creates_a_task_scaffold() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore;
    let escalator = StubEscalator::down();
    let r = router(&store, &escalator, dir.path());

    let outcome = r.route("[Thought] I need to organize my project ideas better").await;

    let path = outcome.note_path.expect("a note should be written");
    assert!(path.starts_with(dir.path().join("Notes/Fleeting")));
    assert!(path.extension().is_some_and(|e| e == "md"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("# Task:"));
    assert!(content.contains("- Tags:"));
    assert!(content.contains("#task"));
    assert!(content.contains("## Implementation Plan"));
    assert!(content.contains("## Success Criteria"));
    assert!(content.contains("- ["), "scaffold should keep placeholder bullets");
    // Round trip: the verbatim message survives in the note.
    assert!(content.contains("I need to organize my project ideas better"));
}

#[tokio::test]
async fn daily_journal_appends_within_the_same_day() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore;
    let escalator = StubEscalator::down();
    let r = router(&store, &escalator, dir.path());

    let first = r.route("[Daily] Shipped the API docs today, energy 8/10").await;
    let path = first.note_path.expect("first journal write");
    let after_first = std::fs::read_to_string(&path).unwrap();

    let second = r.route("[Daily] Shipped the API docs today, energy 8/10").await;
    assert_eq!(second.note_path.as_deref(), Some(path.as_path()));

    let after_second = std::fs::read_to_string(&path).unwrap();
    assert!(after_second.starts_with(&after_first), "first entry must be preserved");
    assert_eq!(after_second.matches("## ").count(), 2, "two timestamped subsections");

    // One file for the whole day.
    let daily_dir = dir.path().join("Notes/Journal/Daily");
    assert_eq!(std::fs::read_dir(daily_dir).unwrap().count(), 1);
}

#[tokio::test]
async fn search_against_empty_vault_offers_to_create() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore;
    let escalator = StubEscalator::down();
    let r = router(&store, &escalator, dir.path());

    let outcome = r.route("Find notes about machine learning").await;
    assert!(outcome.note_path.is_none());
    assert!(outcome.reply.contains("create a note about machine learning"));
}

#[tokio::test]
async fn greeting_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore;
    let escalator = StubEscalator::down();
    let r = router(&store, &escalator, dir.path());

    let outcome = r.route("hello").await;
    assert!(outcome.note_path.is_none());
    assert!(outcome.reply.starts_with("Hello"));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none(), "vault must stay empty");
}

#[tokio::test]
async fn project_command_bypasses_the_classifier() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore;
    let escalator = StubEscalator::down();
    let r = router(&store, &escalator, dir.path());

    let outcome = r.route("[Project: Website] Finished wireframes").await;
    let path = outcome.note_path.expect("project write");
    assert_eq!(path, dir.path().join("Projects/website/notes.md"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# Project: Website"));
    assert!(content.contains("Finished wireframes"));
    // No thought metadata: the structured command skipped classification.
    assert!(!content.contains("#thought"));
    assert!(!content.contains("## Metadata"));
}

#[tokio::test]
async fn system_question_uses_escalation_answer_when_available() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore;
    let escalator = StubEscalator::up("Fleeting notes are one file per capture.");
    let r = router(&store, &escalator, dir.path());

    let outcome = r.route("how do fleeting notes work?").await;
    assert!(outcome.note_path.is_none());
    assert_eq!(outcome.reply, "Fleeting notes are one file per capture.");
}

#[tokio::test]
async fn system_question_falls_back_to_canned_docs_when_escalation_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore;
    let escalator = StubEscalator::down();
    let r = router(&store, &escalator, dir.path());

    let outcome = r.route("how do fleeting notes work?").await;
    assert!(outcome.note_path.is_none());
    assert!(outcome.reply.contains("Notes/Fleeting"));
}

#[tokio::test]
async fn short_unmatched_message_gets_generic_help_when_escalation_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore;
    let escalator = StubEscalator::down();
    let r = router(&store, &escalator, dir.path());

    let outcome = r.route("hm ok").await;
    assert!(outcome.note_path.is_none());
    assert!(outcome.reply.contains("what can you do"));
}

#[tokio::test]
async fn implicit_thought_is_captured_and_searchable() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore;
    let escalator = StubEscalator::down();
    let r = router(&store, &escalator, dir.path());

    let capture = r.route("my sleep schedule is wrecking my mornings lately").await;
    assert!(capture.note_path.is_some());

    let found = r.route("find notes about sleep").await;
    assert!(found.reply.starts_with("Found one note"));
}

#[tokio::test]
async fn same_title_same_day_captures_get_separate_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore;
    let escalator = StubEscalator::down();
    let r = router(&store, &escalator, dir.path());

    // Both classify the same way and title to "Sleep".
    let first = r.route("thinking a lot about sleep lately").await;
    let second = r.route("thinking a lot about sleep lately").await;

    let p1 = first.note_path.expect("first capture");
    let p2 = second.note_path.expect("second capture");
    assert_ne!(p1, p2);

    let fleeting = dir.path().join("Notes/Fleeting");
    assert_eq!(std::fs::read_dir(fleeting).unwrap().count(), 2);

    // The first note keeps exactly one raw-thought section.
    let content = std::fs::read_to_string(&p1).unwrap();
    assert_eq!(content.matches("## Raw Thought").count(), 1);
}

#[tokio::test]
async fn summarize_and_review_scan_the_vault() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore;
    let escalator = StubEscalator::down();
    let r = router(&store, &escalator, dir.path());

    r.route("[Thought] keep a seed library at the community garden").await;
    r.route("[Daily] watered the beds").await;

    let summary = r.route("summarize my notes").await;
    assert!(summary.reply.contains("2 notes"));

    let review = r.route("review my notes").await;
    assert!(review.reply.contains("Notes/Fleeting"));
}
