use crate::types::{Leaderboard, RankedEntry, StudentRecord};

/// Drops records without a CGPA, orders the rest by CGPA descending and
/// splits them after `top_n`. Ties keep their input order; ranks run from 1
/// across both sections.
pub fn rank_records(records: Vec<StudentRecord>, top_n: usize) -> Leaderboard {
    let mut graded = records
        .into_iter()
        .filter_map(|record| match record.cgpa {
            Some(cgpa) if cgpa.is_finite() => Some((record, cgpa)),
            _ => None,
        })
        .collect::<Vec<_>>();
    graded.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    let mut top = graded
        .into_iter()
        .enumerate()
        .map(|(idx, (record, cgpa))| RankedEntry {
            rank: idx + 1,
            name: record.name,
            id: record.id,
            cgpa,
        })
        .collect::<Vec<_>>();
    let others = top.split_off(top_n.min(top.len()));

    Leaderboard { top_n, top, others }
}

#[cfg(test)]
mod tests {
    use super::rank_records;
    use crate::types::{StudentInfo, StudentRecord};

    fn record(id: &str, cgpa: Option<f64>) -> StudentRecord {
        StudentRecord::new(StudentInfo::new(id).with_name(Some(format!("Student {id}"))))
            .with_cgpa(cgpa)
    }

    #[test]
    fn drops_missing_cgpa_and_sorts_descending() {
        let board = rank_records(
            vec![
                record("a", Some(3.1)),
                record("b", None),
                record("c", Some(3.9)),
                record("d", Some(f64::NAN)),
                record("e", Some(3.5)),
            ],
            10,
        );
        let ids: Vec<_> = board.entries().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "e", "a"]);
        assert!(board.others.is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let board = rank_records(
            vec![
                record("first", Some(3.5)),
                record("top", Some(4.0)),
                record("second", Some(3.5)),
                record("third", Some(3.5)),
            ],
            10,
        );
        let ids: Vec<_> = board.entries().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn splits_after_top_n_with_contiguous_ranks() {
        let records = (0..14u32)
            .map(|i| record(&format!("s{i:02}"), Some(2.0 + f64::from(i) * 0.1)))
            .collect();
        let board = rank_records(records, 10);

        assert_eq!(board.top.len(), 10);
        assert_eq!(board.others.len(), 4);
        let ranks: Vec<_> = board.entries().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=14).collect::<Vec<_>>());
        assert_eq!(board.others[0].rank, 11);
        assert_eq!(board.top[0].id, "s13");

        let cgpas: Vec<_> = board.entries().map(|e| e.cgpa).collect();
        assert!(cgpas.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn short_lists_fill_only_the_top_section() {
        let board = rank_records(vec![record("a", Some(3.0)), record("b", Some(2.0))], 10);
        assert_eq!(board.top.len(), 2);
        assert!(board.others.is_empty());

        let empty = rank_records(vec![record("x", None)], 10);
        assert!(empty.is_empty());
    }
}
