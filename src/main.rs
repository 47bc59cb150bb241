//! Slovo - keyword match engine for Russian-language social media text.
//!
//! Entry point for the slovo CLI.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use clap::{Parser, Subcommand};

use slovo::engine::{
    compile_all, matched_keyword_ids, sync_comment_matches, MatchStore, Reconciler,
};
use slovo::observability::init_tracing;
use slovo::storage::{
    delete_keyword, init_storage, insert_keyword, list_keywords, upsert_comment, upsert_post,
    CommentRecord, Database, KeywordRecord, PostRecord,
};
use slovo::{Config, Error, Result};

/// Slovo - keyword match engine for Russian-language social media text.
#[derive(Parser, Debug)]
#[command(name = "slovo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory for the `SQLite` database
    #[arg(short, long, env = "SLOVO_DATA_DIR", default_value = "./data")]
    data_dir: std::path::PathBuf,

    /// Content rows loaded per reconciliation window
    #[arg(short, long, env = "SLOVO_WINDOW_SIZE", default_value = "1000")]
    window_size: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SLOVO_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "SLOVO_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recompute matches for the entire corpus
    Reconcile,

    /// Manage the keyword table
    Keyword {
        #[command(subcommand)]
        action: KeywordAction,
    },

    /// Ingest content and run write-time matching
    Ingest {
        #[command(subcommand)]
        content: IngestContent,
    },

    /// Print the keyword ids matching a text (debug helper)
    MatchText {
        /// Raw text to match against the current keyword set
        text: String,
    },
}

#[derive(Subcommand, Debug)]
enum KeywordAction {
    /// Add a keyword
    Add {
        /// Keyword text as entered
        word: String,

        /// Treat the keyword as a phrase (requires an end boundary)
        #[arg(long)]
        phrase: bool,

        /// Optional category label
        #[arg(long)]
        category: Option<String>,
    },

    /// List all keywords
    List,

    /// Remove a keyword by id
    Remove {
        /// Keyword id
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum IngestContent {
    /// Insert or replace a comment and sync its matches
    Comment {
        /// External comment id
        #[arg(long)]
        id: i64,

        /// Owner id of the parent post
        #[arg(long)]
        owner: i64,

        /// Post id on the owner's wall
        #[arg(long)]
        post: i64,

        /// Comment text; omit for an empty comment
        #[arg(long)]
        text: Option<String>,
    },

    /// Insert or replace a post (matched on the next reconcile)
    Post {
        /// External post id
        #[arg(long)]
        id: i64,

        /// Owner id
        #[arg(long)]
        owner: i64,

        /// Post id on the owner's wall
        #[arg(long)]
        post: i64,

        /// Post text; omit for an empty post
        #[arg(long)]
        text: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_json);

    let config = Config {
        data_dir: cli.data_dir,
        window_size: cli.window_size,
        log_level: cli.log_level,
        log_json: cli.log_json,
    };

    tracing::debug!(?config, "Configuration loaded");
    config.validate()?;

    let db = Database::open(config.database_path())?;
    init_storage(&db)?;

    run_command(&cli.command, &db, &config)
}

fn run_command(command: &Command, db: &Database, config: &Config) -> Result<()> {
    match command {
        Command::Reconcile => {
            let stats = Reconciler::new(db)
                .with_window_size(config.window_size)
                .run()?;
            println!(
                "{}",
                serde_json::to_string(&stats).map_err(|e| Error::internal(e.to_string()))?
            );
        }

        Command::Keyword { action } => run_keyword(action, db)?,

        Command::Ingest { content } => run_ingest(content, db)?,

        Command::MatchText { text } => {
            let keywords = db.keyword_candidates()?;
            let candidates = compile_all(&keywords);
            let ids: Vec<i64> = matched_keyword_ids(Some(text), &candidates)
                .into_iter()
                .collect();
            println!(
                "{}",
                serde_json::to_string(&ids).map_err(|e| Error::internal(e.to_string()))?
            );
        }
    }

    Ok(())
}

fn run_keyword(action: &KeywordAction, db: &Database) -> Result<()> {
    match action {
        KeywordAction::Add {
            word,
            phrase,
            category,
        } => {
            let mut record = KeywordRecord::new(word.as_str(), *phrase);
            if let Some(category) = category {
                record = record.with_category(category.as_str());
            }
            let id = db.with_conn(|conn| insert_keyword(conn, &record))?;
            println!("{id}");
        }

        KeywordAction::List => {
            let keywords = db.with_conn(list_keywords)?;
            for keyword in &keywords {
                println!(
                    "{}",
                    serde_json::to_string(keyword).map_err(|e| Error::internal(e.to_string()))?
                );
            }
        }

        KeywordAction::Remove { id } => {
            let removed = db.with_conn(|conn| delete_keyword(conn, *id))?;
            if !removed {
                tracing::warn!(id, "No keyword with this id");
            }
        }
    }

    Ok(())
}

fn run_ingest(content: &IngestContent, db: &Database) -> Result<()> {
    match content {
        IngestContent::Comment {
            id,
            owner,
            post,
            text,
        } => {
            let record = CommentRecord::new(*id, *owner, *post, text.clone());
            db.with_conn(|conn| upsert_comment(conn, &record))?;

            // Write-time path: match against the full current candidate set.
            let keywords = db.keyword_candidates()?;
            let candidates = compile_all(&keywords);
            let diff = sync_comment_matches(db, *id, text.as_deref(), &candidates)?;

            tracing::info!(
                comment_id = id,
                created = diff.to_create.len(),
                deleted = diff.to_delete.len(),
                "Ingested comment"
            );
        }

        IngestContent::Post {
            id,
            owner,
            post,
            text,
        } => {
            let record = PostRecord::new(*id, *owner, *post, text.clone());
            db.with_conn(|conn| upsert_post(conn, &record))?;
            tracing::info!(post_id = id, "Ingested post");
        }
    }

    Ok(())
}
