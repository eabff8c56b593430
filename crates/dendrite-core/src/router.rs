//! Message routing: an ordered rule cascade over the raw message, plus the
//! handlers that turn the matched action into a reply and (usually) one
//! vault write.
//!
//! Rules are evaluated in three tiers with first-match-wins semantics:
//! structured prefix commands, structured verb commands, then
//! natural-language intent patterns. Anything left over becomes an implicit
//! fleeting thought when long enough, or an escalated question when not.
//! Every failure is converted to a plain-language reply here; nothing
//! escapes the router as an error.

use std::path::{Path, PathBuf};

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::classify;
use crate::entities::extract_tags;
use crate::escalate::Escalator;
use crate::note::{fleeting_plan, journal_plan, project_plan, JournalPeriod};
use crate::search::{format_results, recent_fleeting, search_notes, vault_overview};
use crate::store::{persist, VaultStore};
use crate::synth::synthesize;
use crate::title::generate_title;

/// Messages shorter than this are escalated instead of captured.
const MIN_THOUGHT_LEN: usize = 20;

/// How many captures the review command lists.
const REVIEW_LIMIT: usize = 5;

const GREETING_REPLY: &str =
    "Hello! Tell me a thought and I'll capture it, or try \"[Daily] ...\" for your journal.";
const THANKS_REPLY: &str = "Anytime. Your notes are safe with me.";
const SMALL_TALK_REPLY: &str =
    "Doing well and ready to capture. What's on your mind?";
const CAPABILITY_REPLY: &str = "\
Here's what I can do:
- Capture a thought: just type it, or use \"[Thought] ...\"
- Journal: \"[Daily] ...\", \"[Weekly] ...\", \"[Monthly] ...\"
- Projects: \"[Project: Name] ...\"
- Find notes: \"find notes about X\"
- Summarize or review your vault: \"summarize my notes\", \"review my notes\"";
const SYSTEM_DOC_FALLBACK: &str = "\
Quick tour: thoughts become fleeting notes under Notes/Fleeting, one file per \
capture, classified and expanded into a scaffold for you to finish. Journal \
entries append to one file per day, week, or month under Notes/Journal. \
Project updates append to Projects/<name>/notes.md.";
const GENERIC_HELP_FALLBACK: &str = "\
I didn't quite catch that. Try telling me a thought, or say \"what can you do\" \
for the full list of commands.";

/// What a matched rule decided to do with the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CaptureThought { text: String, process: bool },
    JournalAppend { period: JournalPeriod, text: String },
    ProjectAppend { project: String, text: String },
    Search { term: String },
    Summarize,
    Review,
    Combine { term: String },
    Reply(&'static str),
    EscalateSystemQuery { question: String },
    EscalateUnknown { question: String },
}

/// Result of routing one message: the reply to show, and the note path
/// when a write happened.
#[derive(Debug, Clone)]
pub struct RouteOutcome {
    pub reply: String,
    pub note_path: Option<PathBuf>,
}

impl RouteOutcome {
    fn reply_only(reply: impl Into<String>) -> Self {
        RouteOutcome { reply: reply.into(), note_path: None }
    }
}

type Rule = fn(&str) -> Option<Action>;

/// The priority decision list. Order is load-bearing: tier 1 prefix
/// commands, tier 2 verb commands, tier 3 natural-language intents.
const RULES: &[Rule] = &[
    // Tier 1: structured prefix commands.
    prefix_thought,
    prefix_process,
    prefix_journal,
    prefix_project,
    // Tier 2: structured verb commands.
    verb_find,
    verb_summarize,
    verb_review,
    verb_combine,
    // Tier 3: natural-language intent patterns.
    nl_greeting,
    nl_thanks,
    nl_small_talk,
    nl_capability,
    nl_create_note,
    nl_find_notes,
    nl_journal_update,
    nl_project_update,
    nl_system_query,
];

/// Matches `message` against the decision list; commits to the first hit.
/// The default tier captures long messages as implicit thoughts and
/// escalates short ones.
pub fn match_rules(message: &str) -> Action {
    let msg = message.trim();
    for rule in RULES {
        if let Some(action) = rule(msg) {
            return action;
        }
    }
    if msg.chars().count() >= MIN_THOUGHT_LEN {
        Action::CaptureThought { text: msg.to_string(), process: false }
    } else {
        Action::EscalateUnknown { question: msg.to_string() }
    }
}

fn bracket_payload<'a>(msg: &'a str, tag: &str) -> Option<&'a str> {
    let prefix_len = tag.len() + 2;
    let head = msg.get(..prefix_len)?;
    if head.eq_ignore_ascii_case(&format!("[{tag}]")) {
        Some(msg[prefix_len..].trim())
    } else {
        None
    }
}

fn prefix_thought(msg: &str) -> Option<Action> {
    let payload = bracket_payload(msg, "thought")?;
    Some(Action::CaptureThought { text: payload.to_string(), process: false })
}

fn prefix_process(msg: &str) -> Option<Action> {
    let payload = bracket_payload(msg, "process")?;
    Some(Action::CaptureThought { text: payload.to_string(), process: true })
}

fn prefix_journal(msg: &str) -> Option<Action> {
    for (tag, period) in [
        ("daily", JournalPeriod::Daily),
        ("weekly", JournalPeriod::Weekly),
        ("monthly", JournalPeriod::Monthly),
    ] {
        if let Some(payload) = bracket_payload(msg, tag) {
            return Some(Action::JournalAppend { period, text: payload.to_string() });
        }
    }
    None
}

static PROJECT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\[project:\s*([^\]]+)\]\s*(.+)$").expect("project prefix pattern is valid")
});

fn prefix_project(msg: &str) -> Option<Action> {
    let caps = PROJECT_PREFIX_RE.captures(msg)?;
    Some(Action::ProjectAppend {
        project: caps[1].trim().to_string(),
        text: caps[2].trim().to_string(),
    })
}

fn strip_prefix_ci<'a>(msg: &'a str, prefix: &str) -> Option<&'a str> {
    let head = msg.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(msg[prefix.len()..].trim())
    } else {
        None
    }
}

fn verb_find(msg: &str) -> Option<Action> {
    for prefix in ["find notes about", "find notes on", "search for", "search notes for"] {
        if let Some(term) = strip_prefix_ci(msg, prefix) {
            if !term.is_empty() {
                return Some(Action::Search { term: term.trim_end_matches(['.', '?', '!']).to_string() });
            }
        }
    }
    None
}

fn verb_summarize(msg: &str) -> Option<Action> {
    let lower = msg.to_lowercase();
    (lower.starts_with("summarize") || lower.starts_with("summarise"))
        .then_some(Action::Summarize)
}

fn verb_review(msg: &str) -> Option<Action> {
    let lower = msg.trim_end_matches(['.', '!']).to_lowercase();
    (lower == "review"
        || lower.starts_with("review my")
        || lower.starts_with("review recent")
        || lower.starts_with("review notes"))
    .then_some(Action::Review)
}

fn verb_combine(msg: &str) -> Option<Action> {
    for prefix in ["combine notes about", "combine notes on", "merge notes about"] {
        if let Some(term) = strip_prefix_ci(msg, prefix) {
            if !term.is_empty() {
                return Some(Action::Combine { term: term.trim_end_matches(['.', '?', '!']).to_string() });
            }
        }
    }
    None
}

fn nl_greeting(msg: &str) -> Option<Action> {
    let lower = msg.trim_end_matches(['!', '.', ',']).to_lowercase();
    let exact = ["hello", "hi", "hey", "yo", "hi there", "hello there"];
    let prefixes = ["good morning", "good afternoon", "good evening"];
    (exact.contains(&lower.as_str()) || prefixes.iter().any(|p| lower.starts_with(p)))
        .then_some(Action::Reply(GREETING_REPLY))
}

fn nl_thanks(msg: &str) -> Option<Action> {
    let lower = msg.trim_end_matches(['!', '.', ',']).to_lowercase();
    let exact = ["thanks", "thank you", "thanks a lot", "thanks so much", "thank you so much", "many thanks", "thx", "ty"];
    (exact.contains(&lower.as_str())
        || lower.starts_with("thanks for ")
        || lower.starts_with("thank you for "))
    .then_some(Action::Reply(THANKS_REPLY))
}

fn nl_small_talk(msg: &str) -> Option<Action> {
    let lower = msg.to_lowercase();
    ["how are you", "how's it going", "how is it going", "what's up"]
        .iter()
        .any(|p| lower.contains(p))
        .then_some(Action::Reply(SMALL_TALK_REPLY))
}

fn nl_capability(msg: &str) -> Option<Action> {
    let lower = msg.trim_end_matches(['?', '!', '.']).to_lowercase();
    (lower == "help"
        || lower.contains("what can you do")
        || lower.contains("how can you help")
        || lower.contains("what do you do"))
    .then_some(Action::Reply(CAPABILITY_REPLY))
}

fn nl_create_note(msg: &str) -> Option<Action> {
    for prefix in ["create a note about", "make a note about", "take a note about", "create a note:"] {
        if let Some(topic) = strip_prefix_ci(msg, prefix) {
            if !topic.is_empty() {
                return Some(Action::CaptureThought { text: topic.to_string(), process: false });
            }
        }
    }
    None
}

fn nl_find_notes(msg: &str) -> Option<Action> {
    for prefix in ["where are my notes about", "do i have notes about", "show me notes about"] {
        if let Some(term) = strip_prefix_ci(msg, prefix) {
            if !term.is_empty() {
                return Some(Action::Search { term: term.trim_end_matches(['.', '?', '!']).to_string() });
            }
        }
    }
    None
}

fn nl_journal_update(msg: &str) -> Option<Action> {
    let lower = msg.to_lowercase();
    let period = if ["today i", "today was", "my day was"].iter().any(|p| lower.starts_with(p)) {
        Some(JournalPeriod::Daily)
    } else if ["this week", "my week was"].iter().any(|p| lower.starts_with(p)) {
        Some(JournalPeriod::Weekly)
    } else if ["this month", "my month was"].iter().any(|p| lower.starts_with(p)) {
        Some(JournalPeriod::Monthly)
    } else {
        None
    };
    period.map(|period| Action::JournalAppend { period, text: msg.to_string() })
}

static PROJECT_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:update|for)\s+(?:the\s+)?project\s+([\w -]+?)\s*[:,]\s*(.+)$")
        .expect("project phrase pattern is valid")
});

fn nl_project_update(msg: &str) -> Option<Action> {
    let caps = PROJECT_PHRASE_RE.captures(msg)?;
    Some(Action::ProjectAppend {
        project: caps[1].trim().to_string(),
        text: caps[2].trim().to_string(),
    })
}

/// Informational queries about the system itself go to the external model.
fn nl_system_query(msg: &str) -> Option<Action> {
    let lower = msg.to_lowercase();
    let about_system = ["fleeting", "second brain", "journal", "vault", "note"]
        .iter()
        .any(|w| lower.contains(w));
    let reads_like_question = lower.contains('?')
        || ["how ", "what ", "why ", "where ", "can i "].iter().any(|p| lower.starts_with(p));
    (about_system && reads_like_question)
        .then(|| Action::EscalateSystemQuery { question: msg.to_string() })
}

/// Routes messages end to end: rule matching, then exactly one persistence,
/// search, or escalation call.
pub struct Router<'a, E> {
    store: &'a dyn VaultStore,
    escalator: &'a E,
    vault_root: &'a Path,
}

impl<'a, E: Escalator> Router<'a, E> {
    pub fn new(store: &'a dyn VaultStore, escalator: &'a E, vault_root: &'a Path) -> Self {
        Router { store, escalator, vault_root }
    }

    /// Handles one message to completion. Never returns an error: failures
    /// become apologetic replies with no path.
    pub async fn route(&self, message: &str) -> RouteOutcome {
        let action = match_rules(message);
        tracing::debug!(?action, "matched rule");
        match action {
            Action::CaptureThought { text, process } => self.capture_thought(&text, process),
            Action::JournalAppend { period, text } => {
                self.persist_or_apologize(journal_plan(period, &text, Local::now()), journal_reply(period))
            }
            Action::ProjectAppend { project, text } => {
                let reply = format!("Added an update to project \"{}\".", project.trim());
                self.persist_or_apologize(project_plan(&project, &text, Local::now()), reply)
            }
            Action::Search { term } => match search_notes(self.vault_root, &term) {
                Ok(matches) => RouteOutcome::reply_only(format_results(&term, &matches)),
                Err(e) => {
                    tracing::warn!(error = %e, "search failed");
                    RouteOutcome::reply_only(
                        "Sorry, I couldn't search your notes just now. \
                         Try again, maybe with different terms.",
                    )
                }
            },
            Action::Summarize => match vault_overview(self.vault_root) {
                Ok(reply) => RouteOutcome::reply_only(reply),
                Err(e) => {
                    tracing::warn!(error = %e, "summarize scan failed");
                    RouteOutcome::reply_only("Sorry, I couldn't read your vault just now. Try again.")
                }
            },
            Action::Review => match recent_fleeting(self.vault_root, REVIEW_LIMIT) {
                Ok(reply) => RouteOutcome::reply_only(reply),
                Err(e) => {
                    tracing::warn!(error = %e, "review scan failed");
                    RouteOutcome::reply_only("Sorry, I couldn't read your vault just now. Try again.")
                }
            },
            Action::Combine { term } => match search_notes(self.vault_root, &term) {
                Ok(matches) if matches.len() >= 2 => {
                    let mut reply = format!(
                        "Found {} notes about \"{term}\" that could be combined:\n",
                        matches.len()
                    );
                    for path in &matches {
                        reply.push_str(&format!("- {}\n", path.display()));
                    }
                    reply.push_str("Open them side by side and merge the keepers into one note.");
                    RouteOutcome::reply_only(reply)
                }
                Ok(_) => RouteOutcome::reply_only(format!(
                    "There aren't two notes about \"{term}\" yet, so nothing to combine."
                )),
                Err(e) => {
                    tracing::warn!(error = %e, "combine scan failed");
                    RouteOutcome::reply_only(
                        "Sorry, I couldn't search your notes just now. \
                         Try again, maybe with different terms.",
                    )
                }
            },
            Action::Reply(text) => RouteOutcome::reply_only(text),
            Action::EscalateSystemQuery { question } => {
                self.escalate_with_fallback(&question, SYSTEM_DOC_FALLBACK).await
            }
            Action::EscalateUnknown { question } => {
                self.escalate_with_fallback(&question, GENERIC_HELP_FALLBACK).await
            }
        }
    }

    /// Classification, extraction, titling, synthesis, then one write.
    fn capture_thought(&self, text: &str, process: bool) -> RouteOutcome {
        let now = Local::now();
        let category = classify(text);
        let mut tags = extract_tags(text, category);
        if process {
            tags.insert("process".to_string());
        }
        let title = generate_title(text, category, now);
        let sections = synthesize(text, category);
        let plan = fleeting_plan(&title, &tags, text, &sections, now);
        tracing::debug!(%category, %title, "captured thought");
        let reply = format!("Captured your {category} as \"{title}\".");
        self.persist_or_apologize(plan, reply)
    }

    fn persist_or_apologize(
        &self,
        plan: crate::note::WritePlan,
        reply: String,
    ) -> RouteOutcome {
        match persist(self.store, self.vault_root, &plan) {
            Ok(path) => RouteOutcome { reply, note_path: Some(path) },
            Err(e) => {
                tracing::warn!(error = %e, "persist failed");
                RouteOutcome::reply_only(format!(
                    "Sorry, I couldn't save that ({e}). Nothing was written; \
                     please try again."
                ))
            }
        }
    }

    async fn escalate_with_fallback(&self, question: &str, fallback: &str) -> RouteOutcome {
        match self.escalator.escalate(question).await {
            Ok(text) => RouteOutcome::reply_only(text),
            Err(e) => {
                tracing::warn!(error = %e, "escalation failed, using canned reply");
                RouteOutcome::reply_only(fallback)
            }
        }
    }
}

fn journal_reply(period: JournalPeriod) -> String {
    match period {
        JournalPeriod::Daily => "Added to today's journal.".to_string(),
        JournalPeriod::Weekly => "Added to this week's journal.".to_string(),
        JournalPeriod::Monthly => "Added to this month's journal.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_commands_win_over_everything() {
        let action = match_rules("[Thought] should I find notes about gardening?");
        assert_eq!(
            action,
            Action::CaptureThought {
                text: "should I find notes about gardening?".into(),
                process: false
            }
        );
    }

    #[test]
    fn bracket_tags_are_case_insensitive() {
        assert!(matches!(
            match_rules("[daily] slept in, slow start"),
            Action::JournalAppend { period: JournalPeriod::Daily, .. }
        ));
    }

    #[test]
    fn project_prefix_extracts_name_and_payload() {
        let action = match_rules("[Project: Website] Finished wireframes");
        assert_eq!(
            action,
            Action::ProjectAppend { project: "Website".into(), text: "Finished wireframes".into() }
        );
    }

    #[test]
    fn verb_search_extracts_the_term() {
        assert_eq!(
            match_rules("Find notes about machine learning"),
            Action::Search { term: "machine learning".into() }
        );
    }

    #[test]
    fn greeting_matches_exactly() {
        assert_eq!(match_rules("hello"), Action::Reply(GREETING_REPLY));
        // "hello" embedded in a longer thought should not match.
        assert!(matches!(
            match_rules("hello darkness my old friend, today went sideways"),
            Action::CaptureThought { .. }
        ));
    }

    #[test]
    fn thanks_matches_only_real_acknowledgements() {
        assert_eq!(match_rules("thanks!"), Action::Reply(THANKS_REPLY));
        assert_eq!(match_rules("thank you for remembering that"), Action::Reply(THANKS_REPLY));
        // "thank" inside a thought must not trigger the canned reply.
        assert!(matches!(
            match_rules("I need to thank Sarah for her help"),
            Action::CaptureThought { .. }
        ));
    }

    #[test]
    fn journal_phrasing_routes_to_the_right_period() {
        assert!(matches!(
            match_rules("today I shipped the parser rewrite"),
            Action::JournalAppend { period: JournalPeriod::Daily, .. }
        ));
        assert!(matches!(
            match_rules("this week was mostly maintenance work"),
            Action::JournalAppend { period: JournalPeriod::Weekly, .. }
        ));
    }

    #[test]
    fn system_questions_escalate() {
        assert!(matches!(
            match_rules("how do fleeting notes work?"),
            Action::EscalateSystemQuery { .. }
        ));
    }

    #[test]
    fn long_unmatched_messages_become_thoughts() {
        assert!(matches!(
            match_rules("the garden swale held up through the storm"),
            Action::CaptureThought { process: false, .. }
        ));
    }

    #[test]
    fn short_unmatched_messages_escalate() {
        assert!(matches!(match_rules("hm ok"), Action::EscalateUnknown { .. }));
    }

    #[test]
    fn process_directive_is_flagged() {
        assert!(matches!(
            match_rules("[Process] inbox zero plan"),
            Action::CaptureThought { process: true, .. }
        ));
    }
}
