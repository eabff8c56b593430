//! Narrative synthesis: turns a raw thought into a structured elaboration.
//!
//! Each category maps to a fixed scaffold: one or two lead paragraphs that
//! restate the thought in first person, then two or three fixed-header
//! subsections of bracketed placeholder bullets. The placeholders are left
//! for the user to fill in; the scaffold is deliberately incomplete.

use crate::classify::Category;
use crate::entities::strip_filler;
use crate::title::{decision_options, task_action};

/// One body section. Lead paragraphs carry no heading; subsections render
/// under a `##` heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: Option<String>,
    pub body: String,
}

impl Section {
    fn lead(body: impl Into<String>) -> Self {
        Section { heading: None, body: body.into() }
    }

    fn titled(heading: &str, bullets: &[String]) -> Self {
        Section {
            heading: Some(heading.to_string()),
            body: bullets.join("\n"),
        }
    }
}

/// Renders sections to markdown, separated by blank lines.
pub fn render_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| match &s.heading {
            Some(h) => format!("## {h}\n\n{}", s.body),
            None => s.body.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn placeholder(text: &str) -> String {
    format!("- [{text}]")
}

type Template = fn(&str) -> Vec<Section>;

/// Scaffold dispatch table, keyed by the category variant.
fn template_for(category: Category) -> Template {
    match category {
        Category::MetaSystem => meta_system_scaffold,
        Category::Decision => decision_scaffold,
        Category::Task => task_scaffold,
        Category::Idea => idea_scaffold,
        Category::Question => question_scaffold,
        Category::Observation => observation_scaffold,
        Category::Reflection => reflection_scaffold,
        Category::Emotion => emotion_scaffold,
        Category::General => general_scaffold,
    }
}

/// Synthesizes the body sections for a thought. Deterministic: the same
/// `(text, category)` pair always yields the same scaffold.
pub fn synthesize(text: &str, category: Category) -> Vec<Section> {
    template_for(category)(strip_filler(text))
}

fn decision_scaffold(text: &str) -> Vec<Section> {
    let mut sections = vec![Section::lead(format!(
        "I'm facing a decision I want to think through on paper: {text}"
    ))];
    let considerations = match decision_options(text) {
        Some((a, b)) => vec![
            placeholder(&format!("What would choosing {a} make easier?")),
            placeholder(&format!("What would choosing {b} cost me?")),
            placeholder("Which of the two is easier to undo?"),
        ],
        None => vec![
            placeholder("What are the real options here?"),
            placeholder("Which constraint matters most?"),
            placeholder("Which outcome is easier to undo?"),
        ],
    };
    sections.push(Section::titled("Considerations", &considerations));
    sections.push(Section::titled(
        "Next Steps",
        &[
            placeholder("Gather the one piece of information still missing"),
            placeholder("Set a date by which this gets decided"),
            placeholder("Tell someone affected what I'm leaning toward"),
        ],
    ));
    sections
}

fn task_scaffold(text: &str) -> Vec<Section> {
    let mut sections = vec![Section::lead(format!(
        "Something I need to get done, captured before it slips: {text}"
    ))];
    let plan = match task_action(text) {
        Some(action) => vec![
            placeholder(&format!("First physical step toward \"{action}\"")),
            placeholder("What has to exist before I can start?"),
            placeholder("Rough time estimate and when to schedule it"),
        ],
        None => vec![
            placeholder("Name the very first step"),
            placeholder("What has to exist before I can start?"),
            placeholder("Rough time estimate and when to schedule it"),
        ],
    };
    sections.push(Section::titled("Implementation Plan", &plan));
    sections.push(Section::titled(
        "Success Criteria",
        &[
            placeholder("How will I know this is actually done?"),
            placeholder("Who or what confirms it?"),
        ],
    ));
    sections
}

fn idea_scaffold(text: &str) -> Vec<Section> {
    vec![
        Section::lead(format!(
            "An idea worth keeping, written down while it's fresh: {text}"
        )),
        Section::titled(
            "Key Components",
            &[
                placeholder("The core mechanism in one sentence"),
                placeholder("What already exists that this builds on"),
                placeholder("The smallest version that still works"),
            ],
        ),
        Section::titled(
            "Potential Applications",
            &[
                placeholder("Where would I use this first?"),
                placeholder("Who else would want it?"),
            ],
        ),
        Section::titled(
            "Questions to Explore",
            &[
                placeholder("What would make this idea fail fast?"),
                placeholder("What does it connect to in my existing notes?"),
            ],
        ),
    ]
}

fn question_scaffold(text: &str) -> Vec<Section> {
    vec![
        Section::lead(format!(
            "A question I keep coming back to: {text}"
        )),
        Section::titled(
            "Current Understanding",
            &[
                placeholder("What I already believe, stated plainly"),
                placeholder("Where that belief comes from"),
            ],
        ),
        Section::titled(
            "Research Directions",
            &[
                placeholder("One source or person to consult"),
                placeholder("One small experiment that would produce evidence"),
            ],
        ),
        Section::titled(
            "Why This Matters",
            &[
                placeholder("What changes for me once this is answered?"),
                placeholder("What decision is waiting on it?"),
            ],
        ),
    ]
}

fn observation_scaffold(text: &str) -> Vec<Section> {
    vec![
        Section::lead(format!("Something I noticed and want to keep: {text}")),
        Section::titled(
            "Context",
            &[
                placeholder("Where and when this happened"),
                placeholder("What I was doing at the time"),
            ],
        ),
        Section::titled(
            "Potential Patterns",
            &[
                placeholder("Have I seen this before? When?"),
                placeholder("What condition seems to trigger it?"),
            ],
        ),
        Section::titled(
            "Questions Raised",
            &[
                placeholder("What would I expect to see if the pattern is real?"),
                placeholder("What would disprove it?"),
            ],
        ),
    ]
}

fn reflection_scaffold(text: &str) -> Vec<Section> {
    vec![
        Section::lead(format!(
            "Looking back on this and trying to put it into words: {text}"
        )),
        Section::titled(
            "Insights",
            &[
                placeholder("The one-sentence takeaway"),
                placeholder("What I would tell my past self"),
            ],
        ),
        Section::titled(
            "Implications",
            &[
                placeholder("What this changes about how I work"),
                placeholder("What this changes about what I value"),
            ],
        ),
        Section::titled(
            "Future Directions",
            &[
                placeholder("One habit to adjust starting this week"),
                placeholder("When to revisit this note"),
            ],
        ),
    ]
}

fn emotion_scaffold(text: &str) -> Vec<Section> {
    vec![
        Section::lead(format!(
            "Naming what I'm feeling so it stops running in the background: {text}"
        )),
        Section::titled(
            "Triggers",
            &[
                placeholder("What happened right before this feeling?"),
                placeholder("Is this feeling about the event or about me?"),
            ],
        ),
        Section::titled(
            "Underlying Needs",
            &[
                placeholder("What need is going unmet here?"),
                placeholder("What would \"enough\" look like?"),
            ],
        ),
        Section::titled(
            "Healthy Responses",
            &[
                placeholder("One thing in my control to do today"),
                placeholder("One person to talk to about it"),
            ],
        ),
    ]
}

fn meta_system_scaffold(text: &str) -> Vec<Section> {
    vec![
        Section::lead(format!(
            "A thought about the note system itself: {text}"
        )),
        Section::lead(
            "The system only earns its keep if capturing is cheaper than forgetting. \
             This note records a friction point or an improvement to the workflow, \
             to be reviewed next time I tend the vault.",
        ),
        Section::titled(
            "How I Use This System",
            &[
                placeholder("The workflow step this thought is about"),
                placeholder("How often the friction shows up"),
            ],
        ),
        Section::titled(
            "Changes to Try",
            &[
                placeholder("Smallest change that would help"),
                placeholder("What to measure to know it helped"),
            ],
        ),
    ]
}

fn general_scaffold(text: &str) -> Vec<Section> {
    vec![
        Section::lead(format!("Capturing this before it fades: {text}")),
        Section::titled(
            "Related Ideas",
            &[
                placeholder("What existing note does this touch?"),
                placeholder("What topic does it belong to?"),
            ],
        ),
        Section::titled(
            "Questions to Explore",
            &[
                placeholder("What is the interesting part here, exactly?"),
                placeholder("Is this worth promoting to a permanent note?"),
            ],
        ),
        Section::titled(
            "Potential Actions",
            &[
                placeholder("One concrete follow-up, if any"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_scaffold_has_plan_and_criteria() {
        let sections = synthesize("I need to organize my project ideas better", Category::Task);
        let headings: Vec<_> = sections.iter().filter_map(|s| s.heading.as_deref()).collect();
        assert_eq!(headings, vec!["Implementation Plan", "Success Criteria"]);
    }

    #[test]
    fn scaffolds_emit_bracketed_placeholders() {
        for category in [
            Category::Decision,
            Category::Task,
            Category::Idea,
            Category::Question,
            Category::Observation,
            Category::Reflection,
            Category::Emotion,
            Category::MetaSystem,
            Category::General,
        ] {
            let rendered = render_sections(&synthesize("a plain thought", category));
            assert!(rendered.contains("- ["), "no placeholders for {category}");
            assert!(rendered.contains("## "), "no subsection for {category}");
        }
    }

    #[test]
    fn decision_scaffold_interpolates_options() {
        let sections = synthesize("Should I rent or buy this year?", Category::Decision);
        let rendered = render_sections(&sections);
        assert!(rendered.contains("## Considerations"));
        assert!(rendered.contains("Rent"));
        assert!(rendered.contains("Buy"));
    }

    #[test]
    fn lead_paragraph_restates_the_thought() {
        let sections = synthesize("I think that walking meetings beat standups", Category::General);
        assert!(sections[0].heading.is_none());
        assert!(sections[0].body.contains("walking meetings beat standups"));
    }

    #[test]
    fn synthesis_is_deterministic() {
        let a = synthesize("an idea for a seed library", Category::Idea);
        let b = synthesize("an idea for a seed library", Category::Idea);
        assert_eq!(a, b);
    }
}
