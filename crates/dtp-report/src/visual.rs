//! The visual comparison block posted on token pull requests.

use dtp_diff::{Change, DiffRecord, FileDiff};

use crate::swatch::swatch;

pub const VISUAL_HEADING: &str = "## Visual Comparison";

const NONE: &str = "none";

/// Inline code whose fence is longer than any backtick run in `text`.
fn code_span(text: &str) -> String {
    let text = text.replace('|', "\\|");
    let longest = text.split(|c| c != '`').map(str::len).max().unwrap_or(0);
    let fence = "`".repeat(longest + 1);
    let pad = if text.starts_with('`') || text.ends_with('`') { " " } else { "" };
    format!("{fence}{pad}{text}{pad}{fence}")
}

fn code_cell(value: &str) -> String {
    if value.is_empty() {
        NONE.to_string()
    } else {
        code_span(value)
    }
}

fn color_cell(token: &str, color: &str, label: &str) -> String {
    if color.is_empty() {
        NONE.to_string()
    } else {
        swatch(token, color, label)
    }
}

/// One table row: token, old value, new value.
pub fn render_row(record: &DiffRecord) -> String {
    let token = &record.token;
    let (old, new) = match &record.change {
        Change::Color(c) => (
            color_cell(token, &c.prev_color, &c.prev_color_label),
            color_cell(token, &c.new_color, &c.new_color_label),
        ),
        Change::Value(v) => (code_cell(&v.prev_value), code_cell(&v.new_value)),
    };
    format!("| {} | {old} | {new} |", code_span(token))
}

/// The table of one file, or nothing when it has no records.
pub fn render_file(diff: &FileDiff) -> Option<String> {
    if diff.is_empty() {
        return None;
    }
    let mut lines = vec![
        format!("### {}", diff.filename),
        String::new(),
        "| Token | Old value | New value |".to_string(),
        "| --- | --- | --- |".to_string(),
    ];
    lines.extend(diff.records.iter().map(render_row));
    Some(lines.join("\n"))
}

/// Render every changed file under one heading. Empty when nothing changed.
pub fn render_visual_report(diffs: &[FileDiff]) -> String {
    let sections: Vec<String> = diffs.iter().filter_map(render_file).collect();
    if sections.is_empty() {
        return String::new();
    }
    tracing::debug!(files = sections.len(), "rendered visual comparison");
    format!("{VISUAL_HEADING}\n\n{}\n", sections.join("\n\n"))
}
