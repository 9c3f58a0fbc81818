//! Layer graph editor CLI.
//!
//! Provides the `layerforge` binary for replaying request scripts against a
//! model and managing models stored in a SQLite database. Responses and
//! listings go to stdout as JSON; logs go to stderr.

mod script;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;

use layerforge_model::{Model, ModelConfig};
use layerforge_storage::{ModelStore, SqliteStore};

use crate::script::{parse_script, run_script};

/// Layer graph editor tools.
#[derive(Parser)]
#[command(name = "layerforge", about = "Layer graph editor tools")]
struct Cli {
    /// Path to the model database file.
    #[arg(long, global = true, env = "LAYERFORGE_DB_PATH", default_value = "layerforge.db")]
    db: String,

    /// Log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a JSON array of requests and print one response per line.
    Replay {
        /// Script file.
        #[arg(short, long)]
        script: PathBuf,

        /// Start from a stored model instead of an empty one.
        #[arg(long)]
        load: Option<String>,

        /// Store the resulting model under this name.
        #[arg(long)]
        save: Option<String>,

        /// Seed for generated ids.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List stored models.
    List,
    /// Print a stored model's graph data.
    Show {
        #[arg(short, long)]
        name: String,
    },
    /// Delete a stored model.
    Delete {
        #[arg(short, long)]
        name: String,
    },
}

/// Exit codes: 0 = success, 1 = bad input, 3 = storage error.
const EXIT_BAD_INPUT: i32 = 1;
const EXIT_STORAGE: i32 = 3;

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match cli.command {
        Commands::Replay {
            script,
            load,
            save,
            seed,
        } => run_replay(&cli.db, &script, load.as_deref(), save.as_deref(), seed),
        Commands::List => run_list(&cli.db),
        Commands::Show { name } => run_show(&cli.db, &name),
        Commands::Delete { name } => run_delete(&cli.db, &name),
    };
    process::exit(exit_code);
}

fn open_store(db_path: &str) -> Result<SqliteStore, i32> {
    SqliteStore::new(db_path).map_err(|e| {
        eprintln!("Error: failed to open database '{}': {}", db_path, e);
        EXIT_STORAGE
    })
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("{{\"error\": \"failed to serialize result: {}\"}}", e),
    }
}

/// Execute the replay subcommand.
fn run_replay(
    db_path: &str,
    script_path: &Path,
    load: Option<&str>,
    save: Option<&str>,
    seed: Option<u64>,
) -> i32 {
    let text = match std::fs::read_to_string(script_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: cannot read script '{}': {}", script_path.display(), e);
            return EXIT_BAD_INPUT;
        }
    };
    let requests = match parse_script(&text) {
        Ok(requests) => requests,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_BAD_INPUT;
        }
    };

    let config = match seed {
        Some(seed) => ModelConfig::seeded(seed),
        None => ModelConfig::default(),
    };

    // Only touch the database when the run needs it.
    let mut store = match (load, save) {
        (None, None) => None,
        _ => match open_store(db_path) {
            Ok(store) => Some(store),
            Err(code) => return code,
        },
    };

    let mut model = match (load, store.as_ref()) {
        (Some(name), Some(store)) => {
            let restored = store
                .load(name)
                .map_err(|e| e.to_string())
                .and_then(|snapshot| Model::from_snapshot(snapshot, config).map_err(|e| e.to_string()));
            match restored {
                Ok(model) => model,
                Err(e) => {
                    eprintln!("Error: failed to load model '{}': {}", name, e);
                    return EXIT_STORAGE;
                }
            }
        }
        _ => Model::with_config(config),
    };

    for response in run_script(&mut model, &requests) {
        print_json(&response);
    }

    if let (Some(name), Some(store)) = (save, store.as_mut()) {
        match store.save(name, &model.snapshot()) {
            Ok(outcome) => tracing::info!(name, ?outcome, "saved model"),
            Err(e) => {
                eprintln!("Error: failed to save model '{}': {}", name, e);
                return EXIT_STORAGE;
            }
        }
    }
    0
}

fn run_list(db_path: &str) -> i32 {
    let store = match open_store(db_path) {
        Ok(store) => store,
        Err(code) => return code,
    };
    match store.list() {
        Ok(summaries) => {
            for summary in &summaries {
                print_json(summary);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: failed to list models: {}", e);
            EXIT_STORAGE
        }
    }
}

fn run_show(db_path: &str, name: &str) -> i32 {
    let store = match open_store(db_path) {
        Ok(store) => store,
        Err(code) => return code,
    };
    let model = store
        .load(name)
        .map_err(|e| e.to_string())
        .and_then(|snapshot| Model::from_snapshot(snapshot, ModelConfig::default()).map_err(|e| e.to_string()));
    match model {
        Ok(model) => {
            print_json(&model.graph_data());
            0
        }
        Err(e) => {
            eprintln!("Error: failed to load model '{}': {}", name, e);
            EXIT_STORAGE
        }
    }
}

fn run_delete(db_path: &str, name: &str) -> i32 {
    let mut store = match open_store(db_path) {
        Ok(store) => store,
        Err(code) => return code,
    };
    match store.delete(name) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: failed to delete model '{}': {}", name, e);
            EXIT_STORAGE
        }
    }
}
