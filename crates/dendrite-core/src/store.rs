//! Vault persistence: the file-store boundary and the write path.
//!
//! All vault I/O goes through [`VaultStore`]; the engine never touches the
//! filesystem directly. Appends are strict: existing content is read back
//! and the new section is added after a blank line, never rewritten or
//! reordered. New-file plans never append; a colliding name shifts to the
//! next free numbered sibling. Known limitation: the read-then-append
//! sequence is not atomic, so two racing appends to the same key can lose
//! one section (last writer's read snapshot wins). The source behavior
//! specified no locking policy and none is imposed here.

use std::io;
use std::path::{Path, PathBuf};

use crate::note::{WriteMode, WritePlan};

/// File-store collaborator. Paths are absolute by the time they reach it.
pub trait VaultStore {
    /// Reads a file; `Ok(None)` when it does not exist.
    fn read_file(&self, path: &Path) -> io::Result<Option<String>>;
    fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;
    fn ensure_dir(&self, path: &Path) -> io::Result<()>;
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Local-disk store backed by `std::fs`.
#[derive(Debug, Default)]
pub struct LocalStore;

impl VaultStore for LocalStore {
    fn read_file(&self, path: &Path) -> io::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            entries.push(entry?.path());
        }
        entries.sort();
        Ok(entries)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to create directory {path}: {source}")]
    EnsureDir { path: PathBuf, source: io::Error },
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Executes a write plan against the vault. Append plans read the file back
/// and get exactly `content + "\n\n" + section` (fresh files get the header
/// first). New-file plans never touch an existing file: a title collision
/// shifts to the next free numbered name. Returns the path actually
/// written. No retry on failure; the caller may re-invoke.
pub fn persist(
    store: &dyn VaultStore,
    root: &Path,
    plan: &WritePlan,
) -> Result<PathBuf, PersistError> {
    let mut path = root.join(&plan.path);
    if let Some(parent) = path.parent() {
        store.ensure_dir(parent).map_err(|source| PersistError::EnsureDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let content = match plan.mode {
        WriteMode::NewFile => {
            path = free_path(store, path)?;
            format!("{}\n\n{}", plan.header, plan.section)
        }
        WriteMode::Append => {
            let existing = store
                .read_file(&path)
                .map_err(|source| PersistError::Read { path: path.clone(), source })?;
            match existing {
                None => format!("{}\n\n{}", plan.header, plan.section),
                Some(current) => format!("{}\n\n{}", current, plan.section),
            }
        }
    };

    store
        .write_file(&path, &content)
        .map_err(|source| PersistError::Write { path: path.clone(), source })?;
    tracing::info!(path = %path.display(), "note written");
    Ok(path)
}

fn occupied(store: &dyn VaultStore, path: &Path) -> Result<bool, PersistError> {
    let existing = store
        .read_file(path)
        .map_err(|source| PersistError::Read { path: path.to_path_buf(), source })?;
    Ok(existing.is_some())
}

/// Returns the target itself when free, otherwise the first free
/// `stem_2`, `stem_3`, ... sibling.
fn free_path(store: &dyn VaultStore, path: PathBuf) -> Result<PathBuf, PersistError> {
    if !occupied(store, &path)? {
        return Ok(path);
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    let mut n = 2u32;
    loop {
        let name = match &ext {
            Some(ext) => format!("{stem}_{n}.{ext}"),
            None => format!("{stem}_{n}"),
        };
        let candidate = path.with_file_name(name);
        if !occupied(store, &candidate)? {
            return Ok(candidate);
        }
        n += 1;
    }
}
