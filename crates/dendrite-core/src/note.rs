//! Note variants, identity keys, and vault path resolution.
//!
//! Identity keys are pure functions of the variant and its inputs:
//! resolving the same `(kind, date)` twice always yields the same path.
//! Fleeting notes get one file per capture; journal and project notes are
//! period- or name-keyed and append-only.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, Local};

use crate::synth::{render_sections, Section};

/// Calendar period of a journal note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalPeriod {
    Daily,
    Weekly,
    Monthly,
}

/// The three note variants and their identity-key inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteKind {
    Fleeting { title: String },
    Journal { period: JournalPeriod },
    Project { name: String },
}

/// How the store treats an existing file at the target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Append the section after a blank line (journal and project logs).
    Append,
    /// Never touch an existing file; the name is uniquified instead. Every
    /// fleeting capture gets its own file, even on a title collision.
    NewFile,
}

/// A resolved write: target path relative to the vault root, the header
/// used when the file does not exist yet, the section body, and the
/// collision policy.
#[derive(Debug, Clone)]
pub struct WritePlan {
    pub path: PathBuf,
    pub header: String,
    pub section: String,
    pub mode: WriteMode,
}

/// Sanitizes a title or project name for use in a path: alphanumerics,
/// `_` and `-` survive, everything else (spaces included) becomes `_`;
/// lowercased.
pub fn sanitize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .to_lowercase()
}

/// Resolves the vault-relative path for a note. Deterministic per
/// `(kind, now)`; `now` only contributes for date-keyed variants and the
/// fleeting date prefix.
pub fn resolve_path(kind: &NoteKind, now: DateTime<Local>) -> PathBuf {
    match kind {
        NoteKind::Fleeting { title } => PathBuf::from(format!(
            "Notes/Fleeting/{}_{}.md",
            now.format("%Y%m%d"),
            sanitize(title)
        )),
        NoteKind::Journal { period: JournalPeriod::Daily } => {
            PathBuf::from(format!("Notes/Journal/Daily/{}.md", now.format("%Y%m%d")))
        }
        NoteKind::Journal { period: JournalPeriod::Weekly } => {
            let iso = now.iso_week();
            PathBuf::from(format!(
                "Notes/Journal/Weekly/{}_W{:02}.md",
                iso.year(),
                iso.week()
            ))
        }
        NoteKind::Journal { period: JournalPeriod::Monthly } => PathBuf::from(format!(
            "Notes/Journal/Monthly/{}_{:02}.md",
            now.year(),
            now.month()
        )),
        NoteKind::Project { name } => {
            PathBuf::from(format!("Projects/{}/notes.md", sanitize(name)))
        }
    }
}

/// Builds the write plan for a fleeting capture: structured metadata block,
/// the verbatim source message, then the synthesized sections.
pub fn fleeting_plan(
    title: &str,
    tags: &BTreeSet<String>,
    source: &str,
    sections: &[Section],
    now: DateTime<Local>,
) -> WritePlan {
    let kind = NoteKind::Fleeting { title: title.to_string() };
    let tag_line = tags
        .iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ");
    let header = format!(
        "# {title}\n\n## Metadata\n- Created: {}\n- Type: fleeting\n- Tags: {tag_line}",
        now.format("%Y-%m-%d")
    );
    let section = format!("## Raw Thought\n{source}\n\n{}", render_sections(sections))
        .trim_end()
        .to_string();
    WritePlan { path: resolve_path(&kind, now), header, section, mode: WriteMode::NewFile }
}

/// Builds the write plan for a journal append. The header names the period;
/// each section opens with a timestamped subheading.
pub fn journal_plan(period: JournalPeriod, text: &str, now: DateTime<Local>) -> WritePlan {
    let kind = NoteKind::Journal { period };
    let header = match period {
        JournalPeriod::Daily => format!("# Daily Journal {}", now.format("%Y-%m-%d")),
        JournalPeriod::Weekly => {
            let iso = now.iso_week();
            format!("# Weekly Journal {} W{:02}", iso.year(), iso.week())
        }
        JournalPeriod::Monthly => format!("# Monthly Journal {}", now.format("%Y-%m")),
    };
    let section = format!("## {}\n\n{}", now.format("%H:%M"), text.trim());
    WritePlan { path: resolve_path(&kind, now), header, section, mode: WriteMode::Append }
}

/// Builds the write plan for a project append. Sections are dated rather
/// than timestamped.
pub fn project_plan(name: &str, text: &str, now: DateTime<Local>) -> WritePlan {
    let kind = NoteKind::Project { name: name.to_string() };
    let header = format!("# Project: {}", name.trim());
    let section = format!("## {}\n\n{}", now.format("%Y-%m-%d"), text.trim());
    WritePlan { path: resolve_path(&kind, now), header, section, mode: WriteMode::Append }
}
