use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::semester::Semester;
use crate::types::{Leaderboard, RankedEntry};

#[derive(Debug, Serialize)]
struct LeaderboardDocument<'a> {
    semester_id: &'a str,
    semester: String,
    generated_at: DateTime<Utc>,
    top: &'a [RankedEntry],
    others: &'a [RankedEntry],
}

pub fn render_leaderboard_json(board: &Leaderboard, semester: &Semester) -> Result<String> {
    let document = LeaderboardDocument {
        semester_id: &semester.code,
        semester: semester.label(),
        generated_at: Utc::now(),
        top: &board.top,
        others: &board.others,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::render_leaderboard_json;
    use crate::ranking::rank_records;
    use crate::semester::{Season, Semester};
    use crate::types::{StudentInfo, StudentRecord};

    #[test]
    fn document_carries_semester_and_sections() {
        let records = vec![
            StudentRecord::new(StudentInfo::new("A").with_name(Some("Alice".to_string())))
                .with_cgpa(Some(3.9)),
        ];
        let board = rank_records(records, 10);
        let rendered =
            render_leaderboard_json(&board, &Semester::new(2024, Season::Fall)).expect("render");
        let value: Value = serde_json::from_str(&rendered).expect("valid json");

        assert_eq!(value["semester_id"], "243");
        assert_eq!(value["semester"], "Fall 2024");
        assert_eq!(value["top"][0]["rank"], 1);
        assert_eq!(value["top"][0]["name"], "Alice");
        assert_eq!(value["top"][0]["cgpa"], 3.9);
        assert_eq!(value["others"].as_array().map(Vec::len), Some(0));
        assert!(value["generated_at"].is_string());
    }
}
