//! CLI frontend for the Mystic Ball oracle.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::SessionOptions;

#[derive(Parser)]
#[command(
    name = "mb",
    about = "Mystic Ball: ask a question, shake the ball, receive some wisdom",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory for persisted state (default: platform data directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// RNG seed for reproducible answers
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Short reveal, no flourish
    #[arg(long, global = true)]
    reduced_motion: bool,

    /// JSON file with custom answer pools
    #[arg(long, global = true)]
    answers: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shake the ball and reveal an answer
    Shake {
        /// Category: random, motivational, word, poetic
        #[arg(short, long, default_value = "random")]
        category: String,

        /// Optional question to ask
        question: Vec<String>,
    },

    /// Show remaining draws and when the quota resets
    Status,

    /// List, export, or clear past answers
    History {
        /// Filter: all, motivational, word, poetic
        #[arg(short, long, default_value = "all")]
        filter: String,

        /// Export format: markdown, text
        #[arg(long, conflicts_with = "clear")]
        export: Option<String>,

        /// Output file for --export (default: stdout)
        #[arg(short, long, requires = "export")]
        output: Option<PathBuf>,

        /// Delete all history
        #[arg(long)]
        clear: bool,
    },

    /// Show or set the theme
    Theme {
        /// Theme to select: cosmic, dark-oracle, minimal-zen
        name: Option<String>,
    },

    /// Interactive session
    Play,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mb=warn,mb_oracle=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let opts = SessionOptions {
        data_dir: cli.data_dir,
        seed: cli.seed,
        reduced_motion: cli.reduced_motion,
        answers: cli.answers,
    };

    let result = match cli.command {
        Commands::Shake { category, question } => {
            commands::shake::run(&opts, &category, &question.join(" "))
        }
        Commands::Status => commands::status::run(&opts),
        Commands::History {
            filter,
            export,
            output,
            clear,
        } => commands::history::run(&opts, &filter, export.as_deref(), output.as_deref(), clear),
        Commands::Theme { name } => commands::theme::run(&opts, name.as_deref()),
        Commands::Play => commands::play::run(&opts),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
