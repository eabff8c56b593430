//! Title generation for captured thoughts.
//!
//! Tries a category-specific extraction pattern first, then falls back to
//! the first entity, then to the first sentence with filler stripped, and
//! finally to a timestamped default. Always non-empty and at most
//! [`MAX_TITLE_LEN`] characters.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::Category;
use crate::entities::{extract_entities, strip_filler};

pub const MAX_TITLE_LEN: usize = 70;

/// Canonical title for meta-system thoughts, regardless of content.
pub const META_SYSTEM_TITLE: &str = "Thoughts on My Second Brain";

static DECISION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:should i|whether to|between|do i)\s+(.+?)\s+or\s+(.+?)\s*(?:[.?!,;]|$)")
        .expect("decision pattern is valid")
});

static OPTION_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\w+(?:[ '\-]\w+){0,3})\s+or\s+(\w+(?:[ '\-]\w+){0,3})\b")
        .expect("option pair pattern is valid")
});

static TASK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:need to|have to|must|should)\s+([^.,!?\n]{3,80})")
        .expect("task pattern is valid")
});

static IDEA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:idea(?:\s+for)?[:\s]|what if)\s*([^.,!?\n]{3,80})")
        .expect("idea pattern is valid")
});

static QUESTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([^.!?\n]+\?)").expect("question pattern is valid")
});

/// Extracts the two options of an "X or Y" construction, if one is present.
/// Leading choice verbs and trailing qualifiers are trimmed so the options
/// read as bare alternatives.
pub(crate) fn decision_options(text: &str) -> Option<(String, String)> {
    let caps = DECISION_RE
        .captures(text)
        .or_else(|| OPTION_PAIR_RE.captures(text))?;
    let raw_a = caps.get(1)?.as_str();
    let raw_b = caps.get(2)?.as_str();
    // A leading verb distributes over both options ("use React or Vue").
    // When the first option carries no verb, both sides are options in
    // their own right and keep their words ("rent or buy this year").
    let (a_src, b_src) = match strip_choice_verb(raw_a) {
        Some(rest) => (rest, strip_choice_verb(raw_b).unwrap_or(raw_b)),
        None => (raw_a, raw_b),
    };
    let a = trim_option(a_src);
    let b = trim_option(b_src);
    if a.is_empty() || b.is_empty() {
        return None;
    }
    Some((a, b))
}

fn strip_choice_verb(raw: &str) -> Option<&str> {
    let s = raw.trim();
    for verb in ["use ", "pick ", "choose ", "go with ", "buy ", "try ", "take "] {
        if let Some(head) = s.get(..verb.len()) {
            if head.eq_ignore_ascii_case(verb) {
                let rest = s[verb.len()..].trim_start();
                if !rest.is_empty() {
                    return Some(rest);
                }
            }
        }
    }
    None
}

fn trim_option(raw: &str) -> String {
    let mut s = raw.trim();
    for qualifier in [" for ", " because ", " since ", " so that ", " when "] {
        if let Some(pos) = s.to_ascii_lowercase().find(qualifier) {
            s = s[..pos].trim_end();
        }
    }
    capitalize(s)
}

/// Extracts the imperative phrase of a "need to / should / must Y"
/// construction, if present.
pub(crate) fn task_action(text: &str) -> Option<String> {
    TASK_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn idea_topic(text: &str) -> Option<String> {
    IDEA_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn question_clause(text: &str) -> Option<String> {
    QUESTION_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Generates a title for `text` under `category`. Non-empty, at most
/// [`MAX_TITLE_LEN`] characters; `now` only feeds the last-resort default.
pub fn generate_title(text: &str, category: Category, now: DateTime<Local>) -> String {
    if category == Category::MetaSystem {
        return META_SYSTEM_TITLE.to_string();
    }

    let candidate = match category {
        Category::Decision => {
            decision_options(text).map(|(a, b)| format!("Decision: {a} vs {b}"))
        }
        Category::Task => task_action(text).map(|a| format!("Task: {}", capitalize(&a))),
        Category::Question => question_clause(text).map(|q| capitalize(&q)),
        Category::Idea => idea_topic(text).map(|t| format!("Idea: {}", capitalize(&t))),
        _ => None,
    };

    let title = candidate
        .or_else(|| extract_entities(text).into_iter().next().map(|e| capitalize(&e)))
        .or_else(|| first_sentence(text))
        .unwrap_or_default();

    let title = truncate(&title);
    if title.trim().chars().count() < 3 {
        return format!("Thought Captured {}", now.format("%Y-%m-%d %H:%M"));
    }
    title
}

fn first_sentence(text: &str) -> Option<String> {
    let stripped = strip_filler(text);
    let sentence = stripped
        .split(['.', '!', '?', '\n'])
        .map(str::trim)
        .find(|s| !s.is_empty())?;
    Some(capitalize(sentence))
}

fn capitalize(s: &str) -> String {
    let s = s.trim();
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_TITLE_LEN {
        return s.to_string();
    }
    let head: String = s.chars().take(MAX_TITLE_LEN - 3).collect();
    format!("{}...", head.trim_end())
}
