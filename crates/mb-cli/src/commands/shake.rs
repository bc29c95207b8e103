use colored::Colorize;

use mb_oracle::{CategorySelection, DrawAck};

use super::{Session, SessionOptions};

pub fn run(opts: &SessionOptions, category: &str, question: &str) -> Result<(), String> {
    let selection = category
        .parse::<CategorySelection>()
        .map_err(|e| e.to_string())?;
    let mut session = super::open_session(opts)?;
    shake(&mut session, question, selection);
    Ok(())
}

/// Request a draw and print the outcome once it reveals.
pub fn shake(session: &mut Session, question: &str, selection: CategorySelection) {
    match session.request_draw(question, selection) {
        DrawAck::Accepted => {}
        DrawAck::AlreadyShaking => {
            println!("  {}", "The ball is already shaking.".yellow());
            return;
        }
        DrawAck::Limited => {
            let usage = session.usage();
            println!(
                "  {} The oracle rests until {}.",
                "No draws left.".yellow().bold(),
                super::format_time(usage.resets_at)
            );
            return;
        }
    }

    println!("  {}", "The ball is shaking...".dimmed());
    if let Some((draw, remaining)) = super::wait_for_reveal(session) {
        super::print_draw(&draw);
        let quota = session.config().quota;
        println!("  {}", format!("{remaining}/{quota} draws left").dimmed());
    }
}
