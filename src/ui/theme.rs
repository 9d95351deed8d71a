use owo_colors::Style;
use std::sync::OnceLock;

use crate::item::Status;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Terminal styles. Every style is plain when stdout is not a terminal.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub label: Style,
    pub dim: Style,
    pub muted: Style,
    pub overdue: Style,
    pub today: Style,
    pub done: Style,
    pub active: Style,
}

impl Theme {
    pub fn new(colored: bool) -> Self {
        let pick = |style: Style| if colored { style } else { Style::new() };
        Self {
            header: pick(Style::new().cyan().bold()),
            success: pick(Style::new().green().bold()),
            error: pick(Style::new().red().bold()),
            label: pick(Style::new().magenta()),
            dim: pick(Style::new().white().dimmed()),
            muted: pick(Style::new().bright_black()),
            overdue: pick(Style::new().red()),
            today: pick(Style::new().yellow()),
            done: pick(Style::new().green().strikethrough()),
            active: pick(Style::new().blue()),
        }
    }

    pub fn for_status(&self, status: Status) -> Style {
        match status {
            Status::Done => self.done,
            Status::Active => self.active,
            _ => self.muted,
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(|| Theme::new(console::Term::stdout().is_term()))
}
