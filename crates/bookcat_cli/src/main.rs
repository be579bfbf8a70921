//! Command-line adapter over the catalog service.
//!
//! # Responsibility
//! - Load configuration, open the configured store and run one operation.
//! - Print projections as JSON and outcomes as their user-facing messages.
//!
//! # Invariants
//! - `NotFound` prints the same message whatever the cause.
//! - Exit code is non-zero for every failed operation.

use bookcat_core::{
    init_logging, BookService, CatalogConfig, SqliteBookRepository, DELETE_SUCCESS_MESSAGE,
};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::to_string_pretty;
use std::error::Error;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "bookcat", version, about = "Book catalog with comments")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List books sorted by title with their comment counts.
    List,
    /// Create a book.
    Create { title: Option<String> },
    /// Show one book with its comments.
    Get { id: String },
    /// Append a comment to a book.
    Comment { id: String, comment: Option<String> },
    /// Delete one book.
    Delete { id: String },
    /// Delete every book.
    Clear,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create { .. } => "create",
            Self::Get { .. } => "get",
            Self::Comment { .. } => "comment",
            Self::Delete { .. } => "delete",
            Self::Clear => "clear",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<String, Box<dyn Error>> {
    let config = CatalogConfig::load_with_dotenv()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = config.store_target()?.open()?;
    let service = BookService::new(SqliteBookRepository::try_new(&conn)?);
    info!(
        "event=cli_command module=cli status=start command={}",
        command.name()
    );

    let output = match command {
        Command::List => to_string_pretty(&service.list_all()?)?,
        Command::Create { title } => to_string_pretty(&service.create(title.as_deref())?)?,
        Command::Get { id } => to_string_pretty(&service.get_by_id(&id)?)?,
        Command::Comment { id, comment } => {
            to_string_pretty(&service.add_comment(&id, comment.as_deref())?)?
        }
        Command::Delete { id } => {
            service.delete_by_id(&id)?;
            DELETE_SUCCESS_MESSAGE.to_string()
        }
        Command::Clear => service.delete_all()?.to_string(),
    };
    Ok(output)
}
