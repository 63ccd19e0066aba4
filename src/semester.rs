//! Semester codes understood by the result portal.
//!
//! A code is the last two digits of the year followed by the season digit:
//! `241` is Spring 2024, `242` Summer 2024, `243` Fall 2024.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::SemesterError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 3] = [Season::Spring, Season::Summer, Season::Fall];

    pub fn digit(&self) -> char {
        match self {
            Self::Spring => '1',
            Self::Summer => '2',
            Self::Fall => '3',
        }
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Semester {
    pub code: String,
    pub year: u16,
    pub season: Season,
}

impl Semester {
    pub fn new(year: u16, season: Season) -> Self {
        Self {
            code: format!("{:02}{}", year % 100, season.digit()),
            year,
            season,
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.season, self.year)
    }
}

impl Display for Semester {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.code, self.label())
    }
}

/// Every semester from `start_year` through `end_year`, in calendar order.
pub fn generate_semesters(start_year: u16, end_year: u16) -> Result<Vec<Semester>, SemesterError> {
    if start_year > end_year || start_year < 2000 || end_year > 2099 {
        return Err(SemesterError::InvalidRange {
            start_year,
            end_year,
        });
    }
    Ok((start_year..=end_year)
        .flat_map(|year| Season::ALL.into_iter().map(move |season| Semester::new(year, season)))
        .collect())
}

pub fn is_valid_semester_code(code: &str, catalogue: &[Semester]) -> bool {
    catalogue.iter().any(|semester| semester.code == code)
}

pub fn lookup_semester(code: &str, catalogue: &[Semester]) -> Result<Semester, SemesterError> {
    catalogue
        .iter()
        .find(|semester| semester.code == code)
        .cloned()
        .ok_or_else(|| SemesterError::Unknown {
            code: code.to_string(),
            start_year: catalogue.first().map(|s| s.year).unwrap_or_default(),
            end_year: catalogue.last().map(|s| s.year).unwrap_or_default(),
        })
}
