//! Output formatting utilities.

use eventkv_core::{Event, KeyRecord, KeyState};
use serde_json::{json, Value};

const VALUE_WIDTH: usize = 40;

fn state_label(state: KeyState<'_>) -> &'static str {
    match state {
        KeyState::Absent => "absent",
        KeyState::Live(_) => "live",
        KeyState::Deleted => "deleted",
    }
}

/// Summarises a key as a JSON object.
pub fn key_summary(key: &str, record: &KeyRecord, state: KeyState<'_>) -> Value {
    json!({
        "key": key,
        "state": state_label(state),
        "events": record.len(),
        "value": state.value(),
    })
}

/// Formats a key as a simple table row.
pub fn format_table_row(key: &str, record: &KeyRecord, state: KeyState<'_>) -> String {
    format!(
        "{:<32} {:<8} {:>6}  {}",
        truncate(key, 32),
        state_label(state),
        record.len(),
        truncate(state.value().unwrap_or("-"), VALUE_WIDTH)
    )
}

/// Formats one history entry as a table row.
pub fn format_event_row(index: usize, event: &Event) -> String {
    format!(
        "{:>4}  {:<7} {}",
        index,
        event.kind(),
        event.value().unwrap_or("")
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!(
        "{:<32} {:<8} {:>6}  {}",
        "KEY", "STATE", "EVENTS", "VALUE"
    );
    println!("{}", "-".repeat(90));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
