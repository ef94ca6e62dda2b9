use std::io::{self, Write};

use crate::config::Settings;
use crate::error::AppResult;

pub fn run(settings: &Settings) -> AppResult<()> {
    let mut stdout = io::stdout().lock();
    render(settings, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn render(settings: &Settings, out: &mut impl Write) -> AppResult<()> {
    writeln!(out, "Configuration (from environment):")?;
    for (name, value) in settings.describe() {
        writeln!(out, "  {name}: {}", display_value(&value))?;
    }
    Ok(())
}

fn display_value(value: &str) -> &str {
    if value.is_empty() { "<not set>" } else { value }
}
