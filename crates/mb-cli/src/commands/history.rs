use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use mb_oracle::HistoryFilter;
use mb_oracle::history::{export_markdown, export_text};

use super::{Session, SessionOptions};

pub fn run(
    opts: &SessionOptions,
    filter: &str,
    export: Option<&str>,
    output: Option<&Path>,
    clear: bool,
) -> Result<(), String> {
    let filter = filter
        .parse::<HistoryFilter>()
        .map_err(|e| e.to_string())?;
    let mut session = super::open_session(opts)?;

    if clear {
        session.clear_history();
        println!("  History cleared.");
        return Ok(());
    }

    match export {
        Some(format) => export_history(&session, filter, format, output),
        None => {
            print_table(&session, filter);
            Ok(())
        }
    }
}

fn export_history(
    session: &Session,
    filter: HistoryFilter,
    format: &str,
    output: Option<&Path>,
) -> Result<(), String> {
    let entries = session.history_entries(filter);
    let content = match format {
        "markdown" | "md" => export_markdown(&entries),
        "text" | "txt" => export_text(&entries),
        _ => {
            return Err(format!(
                "unsupported format: \"{format}\". Use: markdown, text"
            ));
        }
    };

    if let Some(path) = output {
        std::fs::write(path, &content)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!("  Exported to {}", path.display());
    } else {
        print!("{content}");
    }

    Ok(())
}

pub fn print_table(session: &Session, filter: HistoryFilter) {
    let entries = session.history_entries(filter);
    if entries.is_empty() {
        println!("  No wisdom yet.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["When", "Category", "Answer", "Question"]);

    for entry in &entries {
        let question = entry.question().unwrap_or("-");
        table.add_row(vec![
            super::format_time(entry.timestamp).as_str(),
            entry.category.label(),
            entry.text.as_str(),
            question,
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} {}",
        entries.len(),
        if entries.len() == 1 { "entry" } else { "entries" }
    );
}
