mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "glossa-cli", about = "Review vocabulary captured while reading", version)]
struct Cli {
    /// Path to config.toml (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory from the config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Capture a new word
    Add {
        /// The word or phrase
        word: String,
        /// Language code, e.g. "de"
        #[arg(long, short)]
        language: String,
        #[arg(long)]
        translation: Option<String>,
        /// Sentence the word appeared in
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// ID of the book the word came from
        #[arg(long)]
        book: Option<String>,
    },

    /// List captured words
    List {
        /// Only words in this language
        #[arg(long)]
        language: Option<String>,
        /// Only words from this book ID
        #[arg(long)]
        book: Option<String>,
    },

    /// Show words due for review, most overdue first
    Due {
        /// Maximum number of words to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Record how well you recalled a word (1 = don't know, 5 = know perfectly)
    Review {
        /// Entry ID
        id: String,
        /// Familiarity score, 1-5
        #[arg(allow_negative_numbers = true)]
        score: i64,
    },

    /// Show retention and review statistics
    Stats,

    /// Delete a word
    Delete {
        /// Entry ID
        id: String,
    },

    /// Run the REST API server
    Serve {
        /// Address to listen on (overrides the config)
        #[arg(long)]
        bind: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Command::Add { word, language, translation, context, notes, book } => {
            commands::add::run(
                &app,
                word,
                language,
                translation,
                context,
                notes,
                book.as_deref(),
                &cli.format,
            )?;
        }
        Command::List { language, book } => {
            commands::list::run(&app, language, book.as_deref(), &cli.format, use_color)?;
        }
        Command::Due { limit } => {
            commands::due::run(&app, limit, &cli.format, use_color)?;
        }
        Command::Review { id, score } => {
            commands::review::run(&app, &id, score, &cli.format, use_color)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
        Command::Delete { id } => {
            commands::delete::run(&app, &id, &cli.format)?;
        }
        Command::Serve { bind } => {
            commands::serve::run(app, bind)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
