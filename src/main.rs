use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use srs_engine::config::{load_database_path, load_engine_config, load_env_file};
use srs_engine::{paths, Engine, EngineError, Flashcard, Outcome, Result, SqliteStore};

/// Spaced-repetition scheduler over a local SQLite store.
#[derive(Parser, Debug)]
#[command(name = "srs")]
#[command(about = "Schedule flashcard reviews and report study stats")]
struct Args {
  /// Learner whose schedule is read or updated
  #[arg(long, env = "SRS_USER", default_value = "default")]
  user: String,

  /// Database file (overrides config.toml and DATABASE_PATH)
  #[arg(long)]
  db: Option<PathBuf>,

  /// Config file with [database] and [engine] tables
  #[arg(long, default_value = paths::CONFIG_FILE)]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Add cards from a JSON array file to the catalog
  Ingest { file: PathBuf },
  /// List cards due now
  Due {
    #[arg(long)]
    subject: Option<String>,
  },
  /// Record a review outcome (again, hard or easy)
  Review { card: String, outcome: String },
  /// Weekly reviews, streak and due count
  Stats,
  /// Show what each outcome would schedule for a card
  Preview { card: String },
  /// When the next card becomes due
  Next {
    #[arg(long)]
    subject: Option<String>,
  },
  /// Make every scheduled card due now
  MakeAllDue,
  /// Remove cards from the catalog
  Remove {
    #[arg(required = true)]
    ids: Vec<String>,
  },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

fn run(args: Args) -> Result<()> {
  let config = load_engine_config(&args.config)?;
  let db_path = args.db.unwrap_or_else(|| load_database_path(&args.config));
  let engine = Engine::new(SqliteStore::open(&db_path)?, config)?;
  let user = args.user.as_str();

  match args.command {
    Command::Ingest { file } => {
      let contents = std::fs::read_to_string(&file)?;
      let cards: Vec<Flashcard> = serde_json::from_str(&contents)?;
      let added = engine.ingest_cards(&cards)?;
      print_json(&json!({ "received": cards.len(), "added": added }))
    }
    Command::Due { subject } => print_json(&engine.get_due_cards(user, subject.as_deref())?),
    Command::Review { card, outcome } => {
      let outcome =
        Outcome::from_str(&outcome).ok_or_else(|| EngineError::UnknownOutcome(outcome.clone()))?;
      let recorded = engine.record_review(user, &card, outcome)?;
      if recorded.orphan {
        tracing::warn!("Card {} is not in the catalog", card);
      }
      print_json(&recorded)
    }
    Command::Stats => print_json(&engine.get_stats(user)?),
    Command::Preview { card } => print_json(&engine.preview(user, &card)?),
    Command::Next { subject } => {
      print_json(&json!({ "next_review_at": engine.next_review_at(user, subject.as_deref())? }))
    }
    Command::MakeAllDue => print_json(&json!({ "updated": engine.make_all_due(user)? })),
    Command::Remove { ids } => {
      let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
      print_json(&json!({ "removed": engine.remove_cards(&ids)? }))
    }
  }
}

fn main() -> Result<()> {
  // Before RUST_LOG and the clap env defaults are read
  let env_loaded = load_env_file(Path::new(".env"));

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "srs_engine=info,srs=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();
  if env_loaded {
    tracing::debug!("Loaded .env");
  }

  let args = Args::parse();
  run(args).inspect_err(|e| tracing::error!("{}", e))
}
