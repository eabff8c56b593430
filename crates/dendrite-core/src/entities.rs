//! Entity and tag extraction from raw thought text.
//!
//! Entities come from two sources: tokens that hit a fixed domain
//! vocabulary, and adjacent capitalized words treated as proper-noun
//! phrases. Tags always contain the base markers plus the category, with
//! additional tags contributed by domain keyword groups.

use std::collections::BTreeSet;

use crate::classify::Category;

/// Leading filler phrases stripped before any extraction. Longer phrases
/// first so e.g. "i think that" wins over "i think".
const FILLER_PREFIXES: &[&str] = &[
    "i have a thought about",
    "i have a thought",
    "i've been thinking about",
    "i've been thinking",
    "i was thinking about",
    "i was thinking",
    "i think that",
    "i think",
    "just a thought",
    "random thought",
    "quick thought",
    "note to self",
    "thought:",
];

/// Fixed domain vocabulary. A lowercase token equal to one of these is an
/// entity in its own right.
const DOMAIN_VOCAB: &[&str] = &[
    "work",
    "health",
    "learning",
    "finance",
    "relationships",
    "creativity",
    "technology",
    "travel",
    "family",
    "career",
    "project",
    "projects",
    "money",
    "exercise",
    "sleep",
    "writing",
    "music",
    "reading",
    "business",
    "habits",
];

/// Keyword group that maps cue words in the text to one or more tags.
struct TagRule {
    cues: &'static [&'static str],
    tags: &'static [&'static str],
}

const TAG_RULES: &[TagRule] = &[
    TagRule {
        cues: &["work", "job", "meeting", "boss", "office", "colleague", "deadline"],
        tags: &["work"],
    },
    TagRule {
        cues: &["sleep", "tired", "insomnia", "nap", "exhausted"],
        tags: &["health", "sleep"],
    },
    TagRule {
        cues: &["exercise", "gym", "workout", "running", "fitness"],
        tags: &["health", "fitness"],
    },
    TagRule {
        cues: &["health", "doctor", "diet", "nutrition"],
        tags: &["health"],
    },
    TagRule {
        cues: &["money", "budget", "finance", "invest", "savings", "salary"],
        tags: &["finance"],
    },
    TagRule {
        cues: &["learn", "study", "course", "book", "reading", "tutorial"],
        tags: &["learning"],
    },
    TagRule {
        cues: &["friend", "family", "partner", "relationship", "parents"],
        tags: &["relationships"],
    },
    TagRule {
        cues: &["code", "coding", "software", "programming", "computer", "api"],
        tags: &["technology"],
    },
    TagRule {
        cues: &["travel", "trip", "flight", "vacation", "holiday"],
        tags: &["travel"],
    },
    TagRule {
        cues: &["write", "writing", "art", "music", "design", "creative"],
        tags: &["creativity"],
    },
    TagRule {
        cues: &["project", "organize", "goal", "plan", "productivity", "habit"],
        tags: &["productivity"],
    },
];

/// Strips one leading filler phrase (case-insensitive) plus any separator
/// punctuation that follows it. Returns the remainder, trimmed.
pub fn strip_filler(text: &str) -> &str {
    let trimmed = text.trim();
    for filler in FILLER_PREFIXES {
        if let Some(head) = trimmed.get(..filler.len()) {
            if head.eq_ignore_ascii_case(filler) {
                return trimmed[filler.len()..].trim_start_matches([' ', ',', ':', '-']);
            }
        }
    }
    trimmed
}

/// Extracts entities in first-discovery order, deduplicated.
pub fn extract_entities(text: &str) -> Vec<String> {
    let stripped = strip_filler(text);
    let tokens: Vec<&str> = stripped
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .collect();

    let mut entities: Vec<String> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut push = |entities: &mut Vec<String>, value: String| {
        let key = value.to_lowercase();
        if seen.insert(key) {
            entities.push(value);
        }
    };

    for token in &tokens {
        let lower = token.to_lowercase();
        if DOMAIN_VOCAB.contains(&lower.as_str()) {
            push(&mut entities, lower);
        }
    }

    // Runs of two or more capitalized tokens read as proper-noun phrases.
    let mut run: Vec<&str> = Vec::new();
    for token in tokens.iter().copied().chain(std::iter::once("")) {
        if token.chars().next().is_some_and(|c| c.is_uppercase()) {
            run.push(token);
        } else {
            if run.len() >= 2 {
                push(&mut entities, run.join(" "));
            }
            run.clear();
        }
    }

    entities
}

/// Extracts the tag set for a thought: the base markers, the category tag,
/// and every domain group whose cues appear in the text. A single group may
/// contribute more than one tag.
pub fn extract_tags(text: &str, category: Category) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    let mut tags: BTreeSet<String> = BTreeSet::new();
    tags.insert("thought".to_string());
    tags.insert("fleeting".to_string());
    tags.insert(category.tag().to_string());

    for rule in TAG_RULES {
        if rule.cues.iter().any(|cue| lower.contains(cue)) {
            for tag in rule.tags {
                tags.insert((*tag).to_string());
            }
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_filler_removes_leading_phrase() {
        assert_eq!(strip_filler("I think that sleep matters"), "sleep matters");
        assert_eq!(strip_filler("Note to self: buy stamps"), "buy stamps");
        assert_eq!(strip_filler("no filler here"), "no filler here");
    }

    #[test]
    fn entities_hit_domain_vocab_in_order() {
        let e = extract_entities("my work schedule is wrecking my sleep and my health");
        assert_eq!(e, vec!["work", "sleep", "health"]);
    }

    #[test]
    fn entities_dedupe_preserving_first_discovery() {
        let e = extract_entities("work then more work then sleep");
        assert_eq!(e, vec!["work", "sleep"]);
    }

    #[test]
    fn capitalized_runs_become_proper_noun_phrases() {
        let e = extract_entities("I met Sarah Chen about the travel budget");
        assert!(e.contains(&"Sarah Chen".to_string()));
        assert!(e.contains(&"travel".to_string()));
    }

    #[test]
    fn tags_always_include_base_set_and_category() {
        let tags = extract_tags("the quiet streets after rain", Category::General);
        assert!(tags.contains("thought"));
        assert!(tags.contains("fleeting"));
        assert!(tags.contains("general"));
    }

    #[test]
    fn sleep_text_adds_health_and_sleep() {
        let tags = extract_tags("so tired, my sleep has been awful", Category::Emotion);
        assert!(tags.contains("health"));
        assert!(tags.contains("sleep"));
        assert!(tags.contains("emotion"));
    }
}
