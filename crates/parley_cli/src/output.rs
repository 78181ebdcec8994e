//! Terminal output helpers: styled text for humans, JSON lines for machines.
//!
//! Uses:
//! - `console` for colors (respects NO_COLOR, auto-disables when piped)
//! - `comfy-table` for turn and diagnostic listings

use std::sync::atomic::{AtomicBool, Ordering};

use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use console::style;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::cli::OutputFormat;

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(format: OutputFormat) {
    if matches!(format, OutputFormat::Json) {
        JSON_MODE.store(true, Ordering::Relaxed);
    }
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

#[derive(Serialize)]
struct Msg<'a> {
    level: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a JsonValue>,
}

fn emit_json(level: &str, message: &str, data: Option<&JsonValue>) {
    let msg = Msg {
        level,
        message,
        data,
    };
    match serde_json::to_string(&msg) {
        Ok(json) => println!("{json}"),
        Err(_) => println!("{{\"level\":\"{level}\"}}"),
    }
}

pub fn header(text: &str) {
    if is_json() {
        emit_json("info", text, None);
    } else {
        println!("{}", style(text).bold().cyan());
    }
}

pub fn success(text: &str) {
    if is_json() {
        emit_json("success", text, None);
    } else {
        println!("{} {}", style("✓").green(), style(text).bright());
    }
}

pub fn error(text: &str) {
    if is_json() {
        let msg = Msg {
            level: "error",
            message: text,
            data: None,
        };
        eprintln!("{}", serde_json::to_string(&msg).unwrap_or_default());
    } else {
        eprintln!("{} {}", style("✗").red(), style(text).bright());
    }
}

/// Warnings go to stderr so converted output on stdout stays parseable.
pub fn warning(text: &str) {
    if is_json() {
        let msg = Msg {
            level: "warning",
            message: text,
            data: None,
        };
        eprintln!("{}", serde_json::to_string(&msg).unwrap_or_default());
    } else {
        eprintln!("{} {}", style("!").yellow(), style(text).bright());
    }
}

pub fn dim(text: &str) {
    if is_json() {
        emit_json("info", text, None);
    } else {
        println!("{}", style(text).dim());
    }
}

/// Emit a serializable value under `label`.
pub fn data<T: Serialize>(label: &str, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_value(value)?;
    if is_json() {
        emit_json("data", label, Some(&json));
    } else {
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}

pub fn kv(key: &str, value: &str) {
    if is_json() {
        let data = serde_json::json!({ key: value });
        emit_json("info", key, Some(&data));
    } else {
        println!("  {} {}", style(key).cyan().bold(), value);
    }
}

pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| {
            Cell::new(h)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold)
        }));
    table
}

/// Add a row whose first cell is highlighted.
pub fn table_row(table: &mut Table, cells: &[String]) {
    let mut row = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        let cell = Cell::new(cell);
        row.push(if i == 0 { cell.fg(Color::Green) } else { cell });
    }
    table.add_row(row);
}

/// Print a table, or in JSON mode the rows it was built from.
pub fn table_print<T: Serialize>(table: &Table, label: &str, items: &[T]) -> anyhow::Result<()> {
    if is_json() {
        let data = serde_json::json!({ "items": serde_json::to_value(items)? });
        emit_json("list", label, Some(&data));
    } else {
        println!("{table}");
    }
    Ok(())
}
