//! Category-coded console output (owo-colors).

use std::io::{self, Write};

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Error,
    Success,
    Warning,
    Saved,
    Plain,
}

pub struct Printer {
    pub color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self { color: io::stdout().is_terminal() }
    }
}

impl Printer {
    pub fn print(&self, tone: Tone, text: &str) {
        println!("{}", self.paint(tone, text));
    }

    pub fn write_line(&self, out: &mut dyn Write, tone: Tone, text: &str) -> io::Result<()> {
        writeln!(out, "{}", self.paint(tone, text))
    }

    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            Tone::Info | Tone::Saved => text.cyan().to_string(),
            Tone::Error => text.red().to_string(),
            Tone::Success => text.green().to_string(),
            Tone::Warning => text.yellow().to_string(),
            Tone::Plain => text.to_string(),
        }
    }
}
