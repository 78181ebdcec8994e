//! `parley inspect`

use std::path::{Path, PathBuf};

use anyhow::Result;
use parley_aix::ConvertConfig;
use parley_core::{OutputPart, Turn};
use serde::Serialize;

use super::{build_reducer, load_conversation};
use crate::output;

#[derive(Serialize)]
struct TurnRow {
    index: usize,
    role: String,
    parts: Vec<String>,
}

fn describe(part: &OutputPart) -> String {
    match part {
        OutputPart::Text { text } => format!("text ({} chars)", text.chars().count()),
        OutputPart::InlineImage { mime_type, base64 } => {
            format!("inline_image {} ({} KiB)", mime_type, base64.len() * 3 / 4 / 1024)
        }
        OutputPart::MetaInReplyTo { .. } => "meta_in_reply_to".to_string(),
        other => other.tag().to_string(),
    }
}

fn turn_row(index: usize, turn: &Turn) -> TurnRow {
    TurnRow {
        index,
        role: format!("{:?}", turn.role).to_lowercase(),
        parts: turn.parts.iter().map(describe).collect(),
    }
}

pub async fn handle(input: &Path, assets: Option<PathBuf>, config: ConvertConfig) -> Result<()> {
    let conversation = load_conversation(input).await?;
    let reducer = build_reducer(assets, config);
    let converted = reducer.reduce_with_diagnostics(&conversation.messages).await?;
    let request = &converted.request;

    output::header(&format!(
        "{} messages -> {} turns",
        conversation.len(),
        request.chat_sequence.len()
    ));
    match request.system_text() {
        Some(text) => output::kv("system", &text),
        None => output::dim("no system preamble"),
    }

    let rows: Vec<_> = request
        .chat_sequence
        .iter()
        .enumerate()
        .map(|(i, turn)| turn_row(i, turn))
        .collect();
    let mut table = output::table(&["#", "role", "parts"]);
    for row in &rows {
        output::table_row(
            &mut table,
            &[row.index.to_string(), row.role.clone(), row.parts.join("\n")],
        );
    }
    output::table_print(&table, "turns", &rows)?;

    if converted.diagnostics.is_empty() {
        output::success("nothing dropped");
        return Ok(());
    }

    let mut table = output::table(&["location", "issue"]);
    for diagnostic in &converted.diagnostics {
        output::table_row(
            &mut table,
            &[diagnostic.location.to_string(), diagnostic.kind.to_string()],
        );
    }
    output::table_print(&table, "diagnostics", &converted.diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_row_describes_parts() {
        let turn = Turn::model()
            .with_part(OutputPart::text("héllo"))
            .with_part(parley_core::create_inline_image_part("A".repeat(4096), "image/webp"));

        let row = turn_row(2, &turn);

        assert_eq!(row.role, "model");
        assert_eq!(row.parts, vec!["text (5 chars)", "inline_image image/webp (3 KiB)"]);
    }
}
