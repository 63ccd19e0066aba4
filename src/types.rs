use serde::{Deserialize, Serialize};

/// Outcome of resolving a student id to a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub id: String,
    pub name: Option<String>,
}

impl StudentInfo {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
}

/// One student's outcome after both resolution stages. `cgpa` is absent when
/// the result lookup failed or returned nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: Option<String>,
    pub id: String,
    pub cgpa: Option<f64>,
}

impl StudentRecord {
    pub fn new(info: StudentInfo) -> Self {
        Self {
            name: info.name,
            id: info.id,
            cgpa: None,
        }
    }

    pub fn with_cgpa(mut self, cgpa: Option<f64>) -> Self {
        self.cgpa = cgpa;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub name: Option<String>,
    pub id: String,
    pub cgpa: f64,
}

impl RankedEntry {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("-")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub top_n: usize,
    pub top: Vec<RankedEntry>,
    pub others: Vec<RankedEntry>,
}

impl Leaderboard {
    pub fn entries(&self) -> impl Iterator<Item = &RankedEntry> {
        self.top.iter().chain(self.others.iter())
    }

    pub fn len(&self) -> usize {
        self.top.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.others.is_empty()
    }
}
