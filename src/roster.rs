use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Reads the section roster: one student id per line.
pub fn load_student_ids(path: &Path) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading student id list: {}", path.display()))?;
    let ids = parse_student_ids(&data);
    info!(path = %path.display(), count = ids.len(), "loaded student ids");
    Ok(ids)
}

/// Strips trailing whitespace, skips blank lines and keeps the first
/// occurrence of a repeated id.
pub fn parse_student_ids(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for line in text.lines() {
        let id = line.trim_end();
        if id.is_empty() {
            continue;
        }
        if !seen.insert(id.to_string()) {
            debug!(id, "skipping duplicate student id");
            continue;
        }
        out.push(id.to_string());
    }
    out
}
