//! UI domain: unit tests for HUD text formatting.

use super::hud_standings::standings_table;
use crate::leaderboard::StandingRow;

fn row(rank: usize, label: &str, score_ms: u64) -> StandingRow {
    StandingRow {
        rank,
        label: label.to_string(),
        score_ms,
        txid: format!("tx{}", rank),
    }
}

#[test]
fn test_empty_standings_placeholder_waits_for_load() {
    assert!(!standings_table(&[], true).contains("No scores yet."));
    assert!(standings_table(&[], false).ends_with("\nNo scores yet."));
}

#[test]
fn test_standings_rows_show_rank_name_and_time() {
    let table = standings_table(&[row(1, "Alice", 45_000), row(2, "02aaaa...", 125_034)], false);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1 "));
    assert!(lines[1].contains("Alice"));
    assert!(lines[1].ends_with("0:45.000"));
    assert!(lines[2].contains("02aaaa..."));
    assert!(lines[2].ends_with("2:05.034"));
}

#[test]
fn test_long_names_are_truncated() {
    let long = "A".repeat(40);
    let table = standings_table(&[row(1, &long, 1000)], false);
    assert!(!table.contains(&long));
    assert!(table.contains('…'));
}

#[test]
fn test_top_entry_labels() {
    use super::hud_finish::top_entry_label;
    use crate::leaderboard::TopEntryDisplay;

    assert_eq!(top_entry_label(&TopEntryDisplay::Hidden), None);
    assert_eq!(
        top_entry_label(&TopEntryDisplay::Loading).as_deref(),
        Some("1st place: Loading…")
    );
    assert_eq!(
        top_entry_label(&TopEntryDisplay::NoData).as_deref(),
        Some("1st place: —")
    );
    assert_eq!(
        top_entry_label(&TopEntryDisplay::Entry {
            label: "Alice".to_string(),
            score_ms: 82_417
        })
        .as_deref(),
        Some("1st place: Alice\nTime: 1:22.417")
    );
}
