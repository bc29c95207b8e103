pub mod history;
pub mod play;
pub mod shake;
pub mod status;
pub mod theme;

use std::path::PathBuf;
use std::thread;

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use tracing::debug;

use mb_oracle::{
    AnswerBook, Category, Clock, DrawResult, FileStorage, OracleConfig, OracleSession,
    SessionEvent,
};

/// Session as used by every command.
pub type Session = OracleSession<FileStorage>;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Options shared by all commands.
pub struct SessionOptions {
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub reduced_motion: bool,
    pub answers: Option<PathBuf>,
}

fn default_data_dir() -> Result<PathBuf, String> {
    dirs::data_dir()
        .map(|dir| dir.join("mystic-ball"))
        .ok_or_else(|| "could not determine data directory; pass --data-dir".to_string())
}

/// Open a session over the data directory.
pub fn open_session(opts: &SessionOptions) -> Result<Session, String> {
    let dir = match &opts.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };
    let storage = FileStorage::open(&dir)
        .map_err(|e| format!("cannot open data directory {}: {e}", dir.display()))?;

    let mut config = OracleConfig::default().with_reduced_motion(opts.reduced_motion);
    if let Some(seed) = opts.seed {
        config = config.with_seed(seed);
    }
    if let Some(path) = &opts.answers {
        let book = AnswerBook::from_path(path)
            .map_err(|e| format!("cannot load answers from {}: {e}", path.display()))?;
        config = config.with_answers(book);
    }

    OracleSession::new(storage, config).map_err(|e| format!("failed to start session: {e}"))
}

/// Block until the pending draw reveals.
///
/// Returns `None` if no draw was pending.
pub fn wait_for_reveal(session: &mut Session) -> Option<(DrawResult, u32)> {
    while let Some(due) = session.next_deadline() {
        if let Ok(wait) = (due - session.clock().now()).to_std() {
            thread::sleep(wait);
        }
        for event in session.poll() {
            match event {
                SessionEvent::Revealed { result, remaining } => return Some((result, remaining)),
                SessionEvent::FlourishEnded => debug!("flourish ended"),
            }
        }
    }
    None
}

pub fn category_label(category: Category) -> ColoredString {
    let label = category.label();
    match category {
        Category::Motivational => label.yellow().bold(),
        Category::WordOfTheDay => label.cyan().bold(),
        Category::Poetic => label.magenta().bold(),
    }
}

pub fn format_time(at: DateTime<Utc>) -> String {
    at.format(TIME_FORMAT).to_string()
}

pub fn print_draw(draw: &DrawResult) {
    println!();
    if !draw.question.is_empty() {
        println!("  {} {}", "Q:".dimmed(), draw.question.italic());
    }
    println!("  {}", category_label(draw.category));
    println!("  {}", draw.answer.bold());
    println!();
}
