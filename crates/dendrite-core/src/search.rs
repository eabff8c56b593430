//! Filename search over the vault, plus the vault scans behind the
//! summarize and review commands.
//!
//! The scan matches filenames only, case-insensitively, and skips hidden
//! entries. Results come back sorted so responses are stable.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("walk error: {0}")]
    Walk(String),
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Returns the vault-relative paths of all `.md` notes whose filename
/// contains `term` (case-insensitive), sorted. A missing root is an empty
/// vault, not an error.
pub fn search_notes(root: &Path, term: &str) -> Result<Vec<PathBuf>, SearchError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let needle = term.to_lowercase();
    let mut matches = Vec::new();
    // Depth 0 is the root itself; its name must not be subject to the
    // hidden filter or a dot-named vault reads as empty.
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry.map_err(|e| SearchError::Walk(e.to_string()))?;
        let path = entry.path();
        if !path.is_file() || !path.extension().map_or(false, |e| e == "md") {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.contains(&needle) {
            let rel = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            matches.push(rel);
        }
    }
    matches.sort();
    Ok(matches)
}

/// Formats the search result for the user: zero matches offers to create a
/// note, one match answers directly, several are itemized.
pub fn format_results(term: &str, matches: &[PathBuf]) -> String {
    match matches {
        [] => format!(
            "I couldn't find any notes about \"{term}\". Want me to create one? \
             Just say: create a note about {term}"
        ),
        [single] => format!("Found one note about \"{term}\": {}", single.display()),
        many => {
            let mut reply = format!("Found {} notes about \"{term}\":\n", many.len());
            for path in many {
                reply.push_str(&format!("- {}\n", path.display()));
            }
            reply.trim_end().to_string()
        }
    }
}

/// Counts notes per top-level vault folder, for the summarize command.
pub fn vault_overview(root: &Path) -> Result<String, SearchError> {
    let all = search_notes(root, "")?;
    if all.is_empty() {
        return Ok("Your vault is empty so far. Capture a thought to get started.".to_string());
    }
    let mut counts: Vec<(String, usize)> = Vec::new();
    for path in &all {
        let top = path
            .components()
            .next()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .unwrap_or_else(|| "(root)".to_string());
        match counts.iter_mut().find(|(name, _)| *name == top) {
            Some((_, n)) => *n += 1,
            None => counts.push((top, 1)),
        }
    }
    let mut reply = format!("You have {} notes:\n", all.len());
    for (folder, n) in counts {
        reply.push_str(&format!("- {folder}: {n}\n"));
    }
    Ok(reply.trim_end().to_string())
}

/// Lists the most recent fleeting captures, newest first, for the review
/// command. Fleeting filenames are date-prefixed, so name order is capture
/// order.
pub fn recent_fleeting(root: &Path, limit: usize) -> Result<String, SearchError> {
    let mut fleeting: Vec<PathBuf> = search_notes(root, "")?
        .into_iter()
        .filter(|p| p.starts_with("Notes/Fleeting"))
        .collect();
    if fleeting.is_empty() {
        return Ok("No fleeting notes to review yet.".to_string());
    }
    fleeting.sort_by(|a, b| b.cmp(a));
    let mut reply = String::from("Your most recent captures:\n");
    for path in fleeting.iter().take(limit) {
        reply.push_str(&format!("- {}\n", path.display()));
    }
    Ok(reply.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "content").unwrap();
    }

    #[test]
    fn missing_root_is_an_empty_vault() {
        let dir = tempfile::tempdir().unwrap();
        let matches = search_notes(&dir.path().join("absent"), "anything").unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn matches_filenames_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "Notes/Fleeting/20240101_machine_learning.md");
        seed(dir.path(), "Notes/Fleeting/20240102_groceries.md");
        let matches = search_notes(dir.path(), "Machine").unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn dot_named_root_is_still_searched() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".vault");
        seed(&root, "Notes/Fleeting/20240101_machine_learning.md");
        seed(&root, ".trash/20240101_machine_old.md");
        let matches = search_notes(&root, "machine").unwrap();
        // The root's own dot name is fine; hidden children stay filtered.
        assert_eq!(matches, vec![PathBuf::from("Notes/Fleeting/20240101_machine_learning.md")]);
    }

    #[test]
    fn formatting_covers_zero_one_many() {
        let none = format_results("gardens", &[]);
        assert!(none.contains("create a note about gardens"));

        let one = format_results("x", &[PathBuf::from("Notes/Fleeting/x.md")]);
        assert!(one.starts_with("Found one note"));

        let many = format_results(
            "x",
            &[PathBuf::from("a/x1.md"), PathBuf::from("a/x2.md")],
        );
        assert!(many.contains("2 notes"));
        assert!(many.contains("- a/x1.md"));
    }

    #[test]
    fn overview_counts_by_top_level_folder() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "Notes/Fleeting/20240101_a.md");
        seed(dir.path(), "Notes/Journal/Daily/20240101.md");
        seed(dir.path(), "Projects/site/notes.md");
        let overview = vault_overview(dir.path()).unwrap();
        assert!(overview.contains("3 notes"));
        assert!(overview.contains("Notes: 2"));
        assert!(overview.contains("Projects: 1"));
    }

    #[test]
    fn review_lists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path(), "Notes/Fleeting/20240101_old.md");
        seed(dir.path(), "Notes/Fleeting/20240301_new.md");
        let review = recent_fleeting(dir.path(), 5).unwrap();
        let newer = review.find("20240301_new").unwrap();
        let older = review.find("20240101_old").unwrap();
        assert!(newer < older);
    }
}
