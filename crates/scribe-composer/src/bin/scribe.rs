//! scribe: command-line notes composer.
//!
//! Notes and the document goal are kept in one JSON file between runs
//! (`SCRIBE_DATA_FILE`, default `./scribe-data.json`). Notes are addressed
//! by id or by their 1-based position in `scribe list`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use scribe_composer::{
    ComposerConfig, ComposerController, JsonFileStore, NoteStore, PersistedDocument,
};
use scribe_core::{
    BulletLabel, DocumentContextProvider, EventBus, Note, NoteId, WebSearchResult,
};
use scribe_inference::{parse_model_output, parse_web_results, InferenceConfig};

#[derive(Parser)]
#[command(name = "scribe")]
#[command(author, version, about = "AI-assisted research notes composer")]
#[command(propagate_version = true)]
struct Cli {
    /// Data file holding notes and the document goal
    #[arg(long, global = true, env = "SCRIBE_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Document text the notes support
    #[arg(long, global = true, env = "SCRIBE_DOCUMENT_CONTEXT")]
    context: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List notes with their state and results
    List,

    /// Add a note
    Add {
        /// Note text
        content: String,
    },

    /// Replace the content of a note
    Edit {
        /// Note id or 1-based position
        note: String,

        /// New note text
        text: String,
    },

    /// Delete a note
    Delete {
        /// Note id or 1-based position
        note: String,
    },

    /// Brainstorm ideas for a note
    Analyze {
        /// Note id or 1-based position
        note: String,
    },

    /// Find sources for a note
    Search {
        /// Note id or 1-based position
        note: String,
    },

    /// Add a note with brainstorm ideas and sources attached
    Compose {
        /// Note text
        content: String,
    },

    /// Drop stored AI results from a note (both when no flag is given)
    Clear {
        /// Note id or 1-based position
        note: String,

        /// Drop brainstorm ideas
        #[arg(long)]
        brainstorm: bool,

        /// Drop web results
        #[arg(long)]
        web: bool,
    },

    /// Show or set the document goal
    Goal {
        /// New goal; omit to print the current one
        text: Option<String>,
    },

    /// Parse a saved model answer and print the bullets it yields
    Parse {
        /// File holding the raw model output
        file: PathBuf,

        /// Read the file as a web results answer
        #[arg(long)]
        web: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing on stderr, or on a daily-rotated file.
///
/// Environment variables:
///   LOG_FORMAT - "json" or "text" (default: "text")
///   LOG_FILE   - path to log file (optional)
///   RUST_LOG   - standard env filter (default: "scribe=info,scribe_composer=info,scribe_inference=info")
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "scribe=info,scribe_composer=info,scribe_inference=info".into()
    });
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("scribe.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else {
        // stdout is reserved for command output
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

struct App {
    composer: ComposerController,
    document: Arc<PersistedDocument>,
}

async fn open(cli: &Cli) -> anyhow::Result<App> {
    let mut config = ComposerConfig::from_env()?;
    if let Some(ref path) = cli.data_file {
        config.data_file = path.clone();
    }
    config.validate()?;

    let persistence = Arc::new(JsonFileStore::new(&config.data_file));
    let store = Arc::new(NoteStore::new(persistence.clone()));
    store
        .load()
        .await
        .with_context(|| format!("failed to load {}", config.data_file.display()))?;

    let events = EventBus::new(config.event_capacity);
    let mut document = PersistedDocument::new(persistence).with_event_bus(events.clone());
    if let Some(ref text) = cli.context {
        document = document.with_text(text.clone());
    }
    let document = Arc::new(document);

    let inference = InferenceConfig::from_env()?;
    inference.validate()?;
    let ai = inference.build_service()?;

    let composer = ComposerController::new(store, ai, document.clone()).with_event_bus(events);
    Ok(App { composer, document })
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Parse { ref file, web } = cli.command {
        return cmd_parse(file, web);
    }

    let app = open(&cli).await?;
    let composer = &app.composer;

    match cli.command {
        Commands::List => cmd_list(composer),
        Commands::Add { content } => {
            let note = composer.add_note(&content).await?;
            println!("Added {}", note.id);
        }
        Commands::Edit { note, text } => {
            let id = resolve(composer, &note)?;
            composer.start_edit(&id).await?;
            composer.update_draft(&id, &text).await?;
            composer.save_edit(&id).await?;
            println!("Saved {}", id);
        }
        Commands::Delete { note } => {
            let id = resolve(composer, &note)?;
            composer.delete_note(&id).await;
            println!("Deleted {}", id);
        }
        Commands::Analyze { note } => {
            let id = resolve(composer, &note)?;
            print_bullets(&composer.analyze(&id).await?);
        }
        Commands::Search { note } => {
            let id = resolve(composer, &note)?;
            print_results(&composer.search(&id).await?);
        }
        Commands::Compose { content } => {
            let note = composer.analyze_and_search_combined(&content).await?;
            print_note(0, &note);
        }
        Commands::Clear {
            note,
            brainstorm,
            web,
        } => {
            let id = resolve(composer, &note)?;
            let both = !brainstorm && !web;
            if brainstorm || both {
                composer.clear_brainstorm(&id).await?;
            }
            if web || both {
                composer.clear_web_results(&id).await?;
            }
            println!("Cleared {}", id);
        }
        Commands::Goal { text } => match text {
            Some(text) => {
                let goal = app.document.set_goal(&text).await?;
                println!("Goal: {}", goal);
            }
            None => println!("Goal: {}", app.document.document_goal().await),
        },
        Commands::Parse { file, web } => cmd_parse(&file, web)?,
    }
    Ok(())
}

/// Accept a note id or a 1-based position.
fn resolve(composer: &ComposerController, reference: &str) -> anyhow::Result<NoteId> {
    let notes = composer.notes();
    if let Ok(position) = reference.parse::<usize>() {
        if let Some(note) = position.checked_sub(1).and_then(|idx| notes.get(idx)) {
            return Ok(note.id.clone());
        }
    }

    let id = NoteId::from(reference);
    if notes.iter().any(|n| n.id == id) {
        Ok(id)
    } else {
        anyhow::bail!("no note matches `{}`", reference)
    }
}

fn cmd_parse(file: &std::path::Path, web: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    if web {
        print_results(&parse_web_results(&raw));
    } else {
        print_bullets(&parse_model_output(&raw).bullet_points);
    }
    Ok(())
}

fn cmd_list(composer: &ComposerController) {
    let notes = composer.notes();
    if notes.is_empty() {
        println!("No notes yet. Add one with `scribe add <text>`.");
        return;
    }
    for (idx, note) in notes.iter().enumerate() {
        print_note(idx + 1, note);
    }
}

fn print_note(position: usize, note: &Note) {
    let states: Vec<&str> = note.statuses().iter().map(|s| s.as_str()).collect();
    if position > 0 {
        println!("{}. [{}] {}", position, states.join(","), note.id);
    } else {
        println!("[{}] {}", states.join(","), note.id);
    }
    println!("   {}", note.content);
    if let Some(ref bullets) = note.brainstorm_bullets {
        for bullet in bullets {
            println!("   * {}", bullet);
        }
    }
    if let Some(ref results) = note.web_results {
        for result in results {
            println!("   > {} <{}>", result.title, result.url);
        }
    }
}

fn print_bullets(bullets: &[String]) {
    if bullets.is_empty() {
        println!("(no ideas)");
    }
    for bullet in bullets {
        match BulletLabel::classify(bullet) {
            Some((label, body)) => println!("{:<13} {}", label.prefix(), body),
            None => println!("{}", bullet),
        }
    }
}

fn print_results(results: &[WebSearchResult]) {
    if results.is_empty() {
        println!("(no results)");
    }
    for result in results {
        println!("{}\n  {}\n  {}", result.title, result.url, result.description);
    }
}
