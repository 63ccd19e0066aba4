use std::fmt::Write;

use crate::types::{Leaderboard, RankedEntry};

/// Plain console report: `rank. name (id): cgpa` under two headings.
pub fn render_text(board: &Leaderboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nTop {} Students:", board.top_n);
    push_entries(&mut out, &board.top);
    let _ = writeln!(out, "\nOther Students:");
    push_entries(&mut out, &board.others);
    out
}

fn push_entries(out: &mut String, entries: &[RankedEntry]) {
    for entry in entries {
        let _ = writeln!(
            out,
            "{}. {} ({}): {}",
            entry.rank,
            entry.display_name(),
            entry.id,
            entry.cgpa
        );
    }
}
