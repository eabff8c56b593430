//! Classifies a raw thought into one of nine fixed categories.
//!
//! Categories are checked as an ordered decision list: the first rule whose
//! cues match wins, so a sentence containing both task and question cues
//! lands in `Task`. No match falls through to `General`, which makes
//! [`classify`] total.

use std::fmt;

/// Closed set of thought categories. The order of the variants mirrors the
/// evaluation order of the decision list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    MetaSystem,
    Decision,
    Task,
    Idea,
    Question,
    Observation,
    Reflection,
    Emotion,
    General,
}

impl Category {
    /// Tag string used in note metadata and filenames.
    pub fn tag(self) -> &'static str {
        match self {
            Category::MetaSystem => "meta-system",
            Category::Decision => "decision",
            Category::Task => "task",
            Category::Idea => "idea",
            Category::Question => "question",
            Category::Observation => "observation",
            Category::Reflection => "reflection",
            Category::Emotion => "emotion",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One row of the decision list: a category plus the cue phrases that
/// select it. `prefixes` match at the start of the message only.
struct CategoryRule {
    category: Category,
    cues: &'static [&'static str],
    prefixes: &'static [&'static str],
}

/// Evaluated top to bottom; earlier rows deliberately shadow later ones.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::MetaSystem,
        cues: &[
            "second brain",
            "note-taking system",
            "note system",
            "notes system",
            "this system",
            "knowledge system",
            "my vault",
        ],
        prefixes: &[],
    },
    CategoryRule {
        category: Category::Decision,
        cues: &[
            "decide",
            "decision",
            "choose",
            "choosing",
            "should i",
            "whether to",
            "torn between",
            "can't decide",
            "weighing",
        ],
        prefixes: &[],
    },
    CategoryRule {
        category: Category::Task,
        cues: &[
            "need to",
            "have to",
            "must ",
            "todo",
            "to-do",
            "don't forget",
            "remember to",
            "deadline",
        ],
        prefixes: &[],
    },
    CategoryRule {
        category: Category::Idea,
        cues: &[
            "idea",
            "what if",
            "concept for",
            "imagine if",
            "could build",
            "would be cool",
        ],
        prefixes: &[],
    },
    CategoryRule {
        category: Category::Question,
        cues: &["?", "i wonder", "curious about", "curious whether"],
        prefixes: &["why ", "how ", "what ", "when ", "where ", "who ", "is it ", "does "],
    },
    CategoryRule {
        category: Category::Observation,
        cues: &[
            "noticed",
            "i saw",
            "observed",
            "it seems",
            "seems like",
            "apparently",
            "interesting that",
        ],
        prefixes: &[],
    },
    CategoryRule {
        category: Category::Reflection,
        cues: &[
            "reflecting",
            "looking back",
            "i realized",
            "i've learned",
            "learned that",
            "in retrospect",
            "i've been thinking about",
        ],
        prefixes: &[],
    },
    CategoryRule {
        category: Category::Emotion,
        cues: &[
            "i feel",
            "feeling",
            "i felt",
            "anxious",
            "excited",
            "frustrated",
            "overwhelmed",
            "stressed",
            "worried",
            "grateful",
            "angry",
        ],
        prefixes: &[],
    },
];

/// Classifies `text` into exactly one [`Category`]. Total and deterministic:
/// the same input always yields the same category.
pub fn classify(text: &str) -> Category {
    let lower = text.trim().to_lowercase();
    for rule in CATEGORY_RULES {
        let hit = rule.cues.iter().any(|cue| lower.contains(cue))
            || rule.prefixes.iter().any(|p| lower.starts_with(p));
        if hit {
            return rule.category;
        }
    }
    Category::General
}
