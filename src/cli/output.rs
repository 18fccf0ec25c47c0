use colored::Colorize;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Section,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Info => text,
        MessageKind::Success => format!("[ok] {text}").green().to_string(),
        MessageKind::Warning => format!("WARNING: {text}").yellow().to_string(),
    }
}

pub fn section(message: impl fmt::Display) {
    println!("{}", apply_style(MessageKind::Section, message));
}

pub fn info(message: impl fmt::Display) {
    println!("{}", apply_style(MessageKind::Info, message));
}

pub fn success(message: impl fmt::Display) {
    println!("{}", apply_style(MessageKind::Success, message));
}

pub fn warning(message: impl fmt::Display) {
    eprintln!("{}", apply_style(MessageKind::Warning, message));
}

/// Two-decimal amount with thousands separators.
pub fn format_amount(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}{grouped}.{:02}", cents % 100)
}

/// Amount coloured by sign: green when non-negative, red otherwise.
pub fn signed_amount(value: f64) -> String {
    let text = format_amount(value);
    if value < 0.0 {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}
