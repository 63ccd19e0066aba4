use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::semester::{is_valid_semester_code, lookup_semester, Semester};

/// Lists the catalogue and reads lines until one names a known semester.
pub fn prompt_semester<R: BufRead, W: Write>(
    catalogue: &[Semester],
    mut input: R,
    mut output: W,
) -> Result<Semester> {
    writeln!(output, "Select a semester ID:")?;
    for semester in catalogue {
        writeln!(output, "{semester}")?;
    }

    let mut line = String::new();
    loop {
        write!(output, "Enter the semester ID: ")?;
        output.flush()?;

        line.clear();
        let read = input
            .read_line(&mut line)
            .context("failed reading semester id")?;
        if read == 0 {
            bail!("input closed before a semester id was chosen");
        }

        let code = line.trim_end_matches(['\r', '\n']);
        if is_valid_semester_code(code, catalogue) {
            let semester = lookup_semester(code, catalogue)?;
            debug!(code, label = %semester.label(), "semester selected");
            return Ok(semester);
        }
        writeln!(output, "Invalid semester ID. Please try again.")?;
    }
}
