// src/jobfile/loader.rs

use std::fs;
use std::time::Duration;

use tracing::debug;

use crate::errors::{JobflowError, Result};
use crate::jobfile::model::{IoSpec, JobSpec};

/// Read every jobfile in order and return the combined job list.
///
/// Jobs keep jobfile order across files; diagnostics address them by their
/// 1-based position in this combined list.
pub fn load_jobfiles(paths: &[String]) -> Result<Vec<JobSpec>> {
    let mut specs = Vec::new();

    for path in paths {
        let contents =
            fs::read_to_string(path).map_err(|_| JobflowError::JobfileOpen(path.clone()))?;
        parse_jobfile(path, &contents, &mut specs)?;
    }

    debug!(jobs = specs.len(), files = paths.len(), "jobfiles parsed");
    Ok(specs)
}

/// Parse one jobfile's contents, appending to `specs`.
///
/// Comment (`#`) and blank lines are skipped but still counted for the line
/// numbers used in syntax diagnostics.
fn parse_jobfile(path: &str, contents: &str, specs: &mut Vec<JobSpec>) -> Result<()> {
    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let spec = parse_line(line).ok_or_else(|| JobflowError::JobfileSyntax {
            line: idx + 1,
            file: path.to_string(),
        })?;
        specs.push(spec);
    }
    Ok(())
}

/// Parse a single `program,input,output[,timeout[,arg...]]` line.
///
/// Returns `None` on any syntax violation: fewer than three fields, an empty
/// mandatory field, or a timeout that is not a plain run of digits.
fn parse_line(line: &str) -> Option<JobSpec> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 3 {
        return None;
    }
    let (program, input, output) = (fields[0], fields[1], fields[2]);
    if program.is_empty() || input.is_empty() || output.is_empty() {
        return None;
    }

    let timeout = match fields.get(3) {
        Some(field) => parse_timeout(field)?,
        None => None,
    };

    Some(JobSpec {
        program: program.to_string(),
        input: IoSpec::parse(input),
        output: IoSpec::parse(output),
        timeout,
        args: fields[4..].iter().map(|s| s.to_string()).collect(),
    })
}

/// Timeouts are whole non-negative seconds: digits only, no sign, no decimal
/// point. An empty field and `0` both mean "no timeout".
fn parse_timeout(field: &str) -> Option<Option<Duration>> {
    if !field.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if field.is_empty() {
        return Some(None);
    }
    let secs: u64 = field.parse().ok()?;
    Some((secs > 0).then(|| Duration::from_secs(secs)))
}
