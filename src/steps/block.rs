//! Managed text blocks inside operator-owned files
//!
//! nova owns only the lines between its markers; everything else in the
//! file is left untouched.

use anyhow::Result;
use declarative::{Applied, Probe};
use std::path::Path;

use crate::machine::Machine;

pub const BEGIN: &str = "# >>> nova >>>";
pub const END: &str = "# <<< nova <<<";

/// What [`upsert`] did to the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
    Unchanged,
}

/// Render a block with its markers and a trailing newline
pub fn render(body: &[String]) -> String {
    let mut block = String::from(BEGIN);
    block.push('\n');
    for line in body {
        block.push_str(line);
        block.push('\n');
    }
    block.push_str(END);
    block.push('\n');
    block
}

/// Byte range of the managed block, markers and trailing newline included
fn locate(content: &str) -> Option<(usize, usize)> {
    let start = content.find(BEGIN)?;
    let end_marker = start + content[start..].find(END)?;
    let mut end = end_marker + END.len();
    if content[end..].starts_with('\n') {
        end += 1;
    }
    Some((start, end))
}

/// The managed block currently in `content`, if any
pub fn extract(content: &str) -> Option<&str> {
    locate(content).map(|(start, end)| &content[start..end])
}

/// Insert or replace the managed block
pub fn upsert(content: &str, block: &str) -> (String, Upsert) {
    match locate(content) {
        Some((start, end)) if content[start..end] == *block => {
            (content.to_string(), Upsert::Unchanged)
        }
        Some((start, end)) => {
            let mut updated = String::with_capacity(content.len() + block.len());
            updated.push_str(&content[..start]);
            updated.push_str(block);
            updated.push_str(&content[end..]);
            (updated, Upsert::Replaced)
        }
        None => {
            let mut updated = content.to_string();
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            if !updated.is_empty() {
                updated.push('\n');
            }
            updated.push_str(block);
            (updated, Upsert::Inserted)
        }
    }
}

/// Probe a file for the canonical managed block
pub fn probe_file(machine: &dyn Machine, path: &Path, block: &str) -> Result<Probe> {
    let content = machine.read_file(path)?;
    let shown = path.display();
    Ok(match content.as_deref().and_then(extract) {
        None if content.is_none() => Probe::needed(format!("{shown} does not exist")),
        None => Probe::needed(format!("managed block missing from {shown}")),
        Some(current) if current == block => Probe::satisfied(format!("{shown} is up to date")),
        Some(_) => Probe::needed(format!("managed block in {shown} is out of date")),
    })
}

/// Write the canonical managed block into a file
pub fn apply_file(machine: &mut dyn Machine, path: &Path, block: &str) -> Result<Applied> {
    let content = machine.read_file(path)?.unwrap_or_default();
    let (updated, action) = upsert(&content, block);
    let shown = path.display();

    match action {
        Upsert::Unchanged => Ok(Applied::unchanged(format!("{shown} already up to date"))),
        Upsert::Inserted => {
            machine.write_file(path, &updated)?;
            Ok(Applied::installed(format!("Added managed block to {shown}")))
        }
        Upsert::Replaced => {
            machine.write_file(path, &updated)?;
            Ok(Applied::changed(format!("Updated managed block in {shown}")))
        }
    }
}
