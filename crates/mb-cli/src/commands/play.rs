//! Line-oriented interactive session.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use mb_oracle::{CategorySelection, HistoryFilter};

use super::{Session, SessionOptions};

const HELP: &str = "  Commands:
    shake [question]     shake the ball (alias: ask)
    category [name]      show or set the category: random, motivational, word, poetic
    history [filter]     list past answers
    status               remaining draws and reset time
    theme [name]         show or set the theme
    motion [on|off]      reduced motion on or off
    help                 this help
    quit                 leave";

pub fn run(opts: &SessionOptions) -> Result<(), String> {
    let mut session = super::open_session(opts)?;
    let mut selection = CategorySelection::Random;

    println!("  {} Mystic Ball", "Welcome to".bold());
    println!(
        "  {} draws left | Category: {selection}",
        session.remaining_draws()
    );
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_ascii_lowercase().as_str(), "quit" | "q" | "exit") {
            break;
        }

        if let Err(e) = process(&mut session, &mut selection, input) {
            println!("  {}", e.yellow());
        }
        println!();
    }

    Ok(())
}

fn process(
    session: &mut Session,
    selection: &mut CategorySelection,
    input: &str,
) -> Result<(), String> {
    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "shake" | "ask" => super::shake::shake(session, rest, *selection),
        "category" | "cat" => {
            if !rest.is_empty() {
                *selection = rest
                    .parse::<CategorySelection>()
                    .map_err(|e| e.to_string())?;
            }
            println!("  Category: {}", selection.to_string().bold());
        }
        "history" => {
            let filter = if rest.is_empty() {
                HistoryFilter::All
            } else {
                rest.parse::<HistoryFilter>().map_err(|e| e.to_string())?
            };
            super::history::print_table(session, filter);
        }
        "status" => super::status::print_status(session),
        "theme" => {
            if rest.is_empty() {
                super::theme::list_themes(session);
            } else {
                super::theme::set_theme(session, rest)?;
            }
        }
        "motion" => {
            match rest.to_ascii_lowercase().as_str() {
                "" => {}
                "on" | "reduced" => session.set_reduced_motion(true),
                "off" | "normal" => session.set_reduced_motion(false),
                other => return Err(format!("unknown motion setting: {other}. Use: on, off")),
            }
            let mode = if session.reduced_motion() {
                "reduced"
            } else {
                "normal"
            };
            println!("  Motion: {}", mode.bold());
        }
        "help" | "?" => println!("{HELP}"),
        other => return Err(format!("unknown command: {other}. Type 'help'.")),
    }

    Ok(())
}
