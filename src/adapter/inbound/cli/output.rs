//! Console transcript formatting.
//!
//! Lessons print through these helpers so the same run can be read by a
//! person or, with `--json`, consumed as one JSON object per line. Quiet
//! mode drops everything except warnings and errors.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use serde_json::{json, Value};
use tabled::{Table, Tabled};

use super::command::ColorChoice;

/// Width of the `=` rule around a lesson banner.
const RULE_WIDTH: usize = 60;

/// Output settings taken from the global flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// One JSON object per line instead of text.
    pub json: bool,
    /// Drop the transcript, keeping warnings and errors.
    pub quiet: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static SETTINGS: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn settings() -> OutputConfig {
    let lock = SETTINGS.get_or_init(RwLock::default);
    match lock.read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    let lock = SETTINGS.get_or_init(RwLock::default);
    match lock.write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Force colors on or off, or leave it to terminal detection.
pub fn set_color(choice: &ColorChoice) {
    match choice {
        ColorChoice::Auto => owo_colors::unset_override(),
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }
}

/// Whether `--json` is in effect.
#[must_use]
pub fn is_json() -> bool {
    settings().json
}

/// How a transcript line behaves under `--quiet`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Priority {
    Transcript,
    Alert,
}

fn hidden(config: OutputConfig, priority: Priority) -> bool {
    priority == Priority::Transcript && config.quiet && !config.json
}

/// Write one transcript line: a `{"type", "payload"}` object in JSON mode,
/// otherwise whatever `render` prints.
fn emit(kind: &str, payload: Value, priority: Priority, render: impl FnOnce()) {
    let config = settings();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": payload }));
    } else if !hidden(config, priority) {
        render();
    }
}

fn emit_message(kind: &str, message: &str, render: impl FnOnce()) {
    emit(kind, json!({ "message": message }), Priority::Transcript, render);
}

/// Lesson banner between two rules.
pub fn header(title: &str) {
    let payload = json!({
        "app": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "title": title,
    });
    emit("header", payload, Priority::Transcript, || {
        let rule = "=".repeat(RULE_WIDTH);
        println!("{rule}");
        println!("{}", title.if_supports_color(Stream::Stdout, |t| t.bold()));
        println!("{rule}");
    });
}

/// Numbered or titled step within a lesson.
pub fn section(title: &str) {
    emit("section", json!({ "title": title }), Priority::Transcript, || {
        println!();
        println!("{}", title.if_supports_color(Stream::Stdout, |t| t.bold()));
    });
}

/// `label  value` pair, label dimmed and padded.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    let payload = json!({ "label": label, "value": value });
    emit("field", payload, Priority::Transcript, || {
        println!(
            "  {:<14} {value}",
            label.if_supports_color(Stream::Stdout, |t| t.dimmed())
        );
    });
}

pub fn item(message: impl Display) {
    let message = message.to_string();
    emit_message("item", &message, || println!("  - {message}"));
}

/// Detail line indented under the previous item.
pub fn sub_item(message: impl Display) {
    let message = message.to_string();
    emit_message("sub_item", &message, || println!("      {message}"));
}

pub fn success(message: &str) {
    emit_message("success", message, || {
        println!("  {} {message}", "✓".if_supports_color(Stream::Stdout, |t| t.green()));
    });
}

/// A check that did not pass. Part of the transcript, not a fatal error.
pub fn failure(message: &str) {
    emit_message("failure", message, || {
        println!("  {} {message}", "×".if_supports_color(Stream::Stdout, |t| t.red()));
    });
}

/// Printed even in quiet mode.
pub fn warning(message: &str) {
    emit("warning", json!({ "message": message }), Priority::Alert, || {
        println!("  {} {message}", "⚠".if_supports_color(Stream::Stdout, |t| t.yellow()));
    });
}

/// Fatal error, on stderr in both modes.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {message}", "×".if_supports_color(Stream::Stderr, |t| t.red()));
    }
}

pub fn note(message: &str) {
    emit_message("note", message, || {
        println!("  {}", message.if_supports_color(Stream::Stdout, |t| t.dimmed()));
    });
}

/// Suggested next command.
pub fn hint(message: &str) {
    emit_message("hint", message, || {
        println!(
            "  {}: {}",
            "hint".if_supports_color(Stream::Stdout, |t| t.cyan()),
            message.if_supports_color(Stream::Stdout, |t| t.dimmed())
        );
    });
}

/// Completed maintenance step, e.g. `✓ Applied 2025-01-15-120000`.
pub fn action_done(verb: &str, target: &str) {
    let payload = json!({ "verb": verb, "target": target, "status": "done" });
    emit("action", payload, Priority::Transcript, || {
        println!(
            "  {} {} {target}",
            "✓".if_supports_color(Stream::Stdout, |t| t.green()),
            verb.if_supports_color(Stream::Stdout, |t| t.bold())
        );
    });
}

/// Rows as a table, or as a JSON array in JSON mode.
pub fn table<T>(rows: &[T])
where
    T: Tabled + Serialize,
{
    emit("table", json!({ "rows": rows }), Priority::Transcript, || {
        for line in Table::new(rows).to_string().lines() {
            println!("  {line}");
        }
    });
}

/// Print a complete JSON document for commands with their own shape.
pub fn json_output(value: Value) {
    println!("{value}");
}

/// Cyan, unless output is JSON.
pub fn highlight(value: impl Display) -> String {
    paint(value, |v| v.if_supports_color(Stream::Stdout, |t| t.cyan()).to_string())
}

/// Dimmed, unless output is JSON.
pub fn muted(value: impl Display) -> String {
    paint(value, |v| v.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string())
}

fn paint(value: impl Display, style: impl FnOnce(&str) -> String) -> String {
    let value = value.to_string();
    if is_json() {
        value
    } else {
        style(&value)
    }
}
