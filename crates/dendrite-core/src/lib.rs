//! All engine logic independent of how the app is run (CLI today).
//!
//! User notes live in a vault folder they choose. One free-text message
//! goes in; the router either executes a structured command or classifies
//! the text as a thought, synthesizes a scaffold around it, and persists a
//! markdown note. Dendrite stores only its config in its own app data
//! directory (see [config]).

pub mod classify;
pub mod config;
pub mod entities;
pub mod escalate;
pub mod note;
pub mod router;
pub mod search;
pub mod store;
pub mod synth;
pub mod title;

pub use classify::{classify, Category};
pub use config::{
    app_data_dir, get_vault_root, load_config, set_vault_root, Config, ConfigError,
};
pub use entities::{extract_entities, extract_tags};
pub use escalate::{Escalator, OllamaEscalator};
pub use note::{resolve_path, JournalPeriod, NoteKind, WriteMode, WritePlan};
pub use router::{match_rules, Action, RouteOutcome, Router};
pub use search::{search_notes, SearchError};
pub use store::{persist, LocalStore, PersistError, VaultStore};
pub use synth::{synthesize, Section};
pub use title::generate_title;

/// Returns a short status string. Used to verify the backend is wired up.
pub fn status() -> &'static str {
    "dendrite-core ready"
}
