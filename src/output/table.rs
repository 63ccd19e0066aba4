use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Row, Table};

use crate::semester::Semester;
use crate::types::{Leaderboard, RankedEntry};

pub fn render_leaderboard_table(board: &Leaderboard, semester: &Semester) -> String {
    let mut out = format!("Leaderboard for {}\n", semester.label());
    out.push_str(&format!("\nTop {} Students\n", board.top_n));
    out.push_str(&section_table(&board.top, true));
    if !board.others.is_empty() {
        out.push_str("\n\nOther Students\n");
        out.push_str(&section_table(&board.others, false));
    }
    out
}

fn section_table(entries: &[RankedEntry], highlight: bool) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rank", "Name", "Student ID", "CGPA"]);

    for entry in entries {
        let cgpa = Cell::new(format!("{:.2}", entry.cgpa)).set_alignment(CellAlignment::Right);
        let cgpa = if highlight && entry.rank <= 3 {
            cgpa.fg(Color::Green)
        } else {
            cgpa
        };
        table.add_row(Row::from(vec![
            Cell::new(entry.rank).set_alignment(CellAlignment::Right),
            Cell::new(entry.display_name()),
            Cell::new(&entry.id),
            cgpa,
        ]));
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::render_leaderboard_table;
    use crate::ranking::rank_records;
    use crate::semester::{Season, Semester};
    use crate::types::{StudentInfo, StudentRecord};

    #[test]
    fn lists_every_ranked_student() {
        let records = (0..12u32)
            .map(|i| {
                StudentRecord::new(
                    StudentInfo::new(&format!("ID{i:02}")).with_name(Some(format!("Name{i:02}"))),
                )
                .with_cgpa(Some(2.0 + f64::from(i) / 10.0))
            })
            .collect();
        let rendered =
            render_leaderboard_table(&rank_records(records, 10), &Semester::new(2023, Season::Summer));

        assert!(rendered.starts_with("Leaderboard for Summer 2023\n"));
        assert!(rendered.contains("Top 10 Students"));
        assert!(rendered.contains("Other Students"));
        for i in 0..12 {
            assert!(rendered.contains(&format!("ID{i:02}")), "missing ID{i:02}");
        }
        assert!(rendered.contains("3.10"));
    }

    #[test]
    fn omits_other_section_when_empty() {
        let rendered =
            render_leaderboard_table(&rank_records(Vec::new(), 10), &Semester::new(2023, Season::Fall));
        assert!(!rendered.contains("Other Students"));
    }
}
