use colored::Colorize;

use super::{Session, SessionOptions};

pub fn run(opts: &SessionOptions) -> Result<(), String> {
    let session = super::open_session(opts)?;
    print_status(&session);
    Ok(())
}

pub fn print_status(session: &Session) {
    let usage = session.usage();
    let quota = session.config().quota;

    let left = format!("{}/{quota}", usage.remaining);
    let left = if usage.limited { left.red() } else { left.green() };
    println!("  {} {left}", "Draws left:".bold());
    if usage.limited {
        println!(
            "  {} until {}",
            "Limited".red().bold(),
            super::format_time(usage.resets_at)
        );
    } else {
        println!(
            "  {} {}",
            "Window resets:".bold(),
            super::format_time(usage.resets_at)
        );
    }
    println!("  {} {}", "Theme:".bold(), session.theme());
    if session.reduced_motion() {
        println!("  {} reduced", "Motion:".bold());
    }
}
