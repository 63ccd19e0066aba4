use anyhow::Result;

use crate::types::{Leaderboard, RankedEntry};

pub fn leaderboard_to_csv(board: &Leaderboard) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["rank", "section", "name", "student_id", "cgpa"])?;
    write_section(&mut writer, "top", &board.top)?;
    write_section(&mut writer, "other", &board.others)?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

fn write_section(
    writer: &mut csv::Writer<Vec<u8>>,
    section: &str,
    entries: &[RankedEntry],
) -> Result<()> {
    for entry in entries {
        writer.write_record([
            entry.rank.to_string(),
            section.to_string(),
            entry.name.clone().unwrap_or_default(),
            entry.id.clone(),
            entry.cgpa.to_string(),
        ])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::leaderboard_to_csv;
    use crate::ranking::rank_records;
    use crate::types::{StudentInfo, StudentRecord};

    #[test]
    fn writes_header_and_sections() {
        let records = vec![
            StudentRecord::new(StudentInfo::new("A").with_name(Some("Lee, Ann".to_string())))
                .with_cgpa(Some(3.5)),
            StudentRecord::new(StudentInfo::new("B").with_name(Some("Bo".to_string())))
                .with_cgpa(Some(3.75)),
        ];
        let csv = leaderboard_to_csv(&rank_records(records, 1)).expect("csv");
        assert_eq!(
            csv,
            "rank,section,name,student_id,cgpa\n1,top,Bo,B,3.75\n2,other,\"Lee, Ann\",A,3.5\n"
        );
    }
}
