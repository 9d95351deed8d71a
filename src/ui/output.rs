use owo_colors::OwoColorize;

use crate::ui::{theme, Icons};

/// Bold title line
pub fn header(text: &str) {
    println!("{}", text.style(theme().header));
}

pub fn success(message: &str) {
    println!("{} {}", Icons::CHECK, message.style(theme().success));
}

/// Error line on stderr
pub fn error(message: &str) {
    eprintln!("{} {}", Icons::CROSS, message.style(theme().error));
}

/// `label: value` detail line
pub fn field(label: &str, value: &str) {
    println!("  {:<10} {}", format!("{}:", label).style(theme().label), value);
}

pub fn section(title: &str) {
    println!();
    println!("{}", format!("── {} ──", title).style(theme().header));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim).to_string()
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted).to_string()
}
