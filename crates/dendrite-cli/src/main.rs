//! CLI entry point for the dendrite engine (for dev and daily capture).

use std::path::PathBuf;

use clap::Parser;
use dendrite_core::escalate::{OllamaEscalator, DEFAULT_BASE_URL};
use dendrite_core::{
    app_data_dir, get_vault_root, load_config, search_notes, set_vault_root, status, LocalStore,
    Router,
};

#[derive(Parser)]
#[command(name = "dendrite")]
#[command(about = "Dendrite: rule-based second brain capture")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show backend status (for dev).
    Status,
    /// Show where dendrite stores its config (app data directory).
    DataDir,
    /// Set the vault directory that notes are written into.
    SetVault {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Send one message through the router (capture, journal, search, ...).
    Send {
        /// The message, e.g. "[Daily] shipped the docs" or any free text.
        #[arg(value_name = "MESSAGE", trailing_var_arg = true, required = true)]
        message: Vec<String>,
    },
    /// Search note filenames in the vault.
    Search {
        #[arg(value_name = "TERM")]
        term: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => {
            println!("Dendrite backend");
            println!("  core: {}", status());
        }
        Commands::DataDir => match app_data_dir() {
            Some(p) => println!("{}", p.display()),
            None => eprintln!("Could not determine app data directory."),
        },
        Commands::SetVault { path } => match set_vault_root(&path) {
            Ok(()) => println!("Vault root set to {}", path.display()),
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::Send { message } => {
            let Some(root) = get_vault_root() else {
                eprintln!("No vault configured. Run: dendrite set-vault <PATH>");
                return;
            };
            let config = load_config();
            let escalator = match OllamaEscalator::from_url(
                config.ollama_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            ) {
                Ok(e) => match config.ollama_model {
                    Some(model) => e.with_model(model),
                    None => e,
                },
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return;
                }
            };
            let store = LocalStore;
            let router = Router::new(&store, &escalator, &root);
            let outcome = router.route(&message.join(" ")).await;
            println!("{}", outcome.reply);
            if let Some(path) = outcome.note_path {
                println!("  -> {}", path.display());
            }
        }
        Commands::Search { term } => {
            let Some(root) = get_vault_root() else {
                eprintln!("No vault configured. Run: dendrite set-vault <PATH>");
                return;
            };
            match search_notes(&root, &term) {
                Ok(matches) => {
                    println!("Found {} note(s) matching \"{}\"", matches.len(), term);
                    for path in matches {
                        println!("  {}", path.display());
                    }
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }
    }
}
