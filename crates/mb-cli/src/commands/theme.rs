use colored::Colorize;

use mb_oracle::Theme;

use super::{Session, SessionOptions};

pub fn run(opts: &SessionOptions, name: Option<&str>) -> Result<(), String> {
    let mut session = super::open_session(opts)?;
    match name {
        Some(name) => set_theme(&mut session, name),
        None => {
            list_themes(&session);
            Ok(())
        }
    }
}

pub fn set_theme(session: &mut Session, name: &str) -> Result<(), String> {
    let theme = name.parse::<Theme>().map_err(|e| e.to_string())?;
    session.set_theme(theme);
    println!("  Theme set to {}", theme.to_string().bold());
    Ok(())
}

pub fn list_themes(session: &Session) {
    let current = session.theme();
    for theme in Theme::ALL {
        if theme == current {
            println!("  {} {}", "*".green(), theme.to_string().bold());
        } else {
            println!("    {theme}");
        }
    }
}
