//! CSV input (account list) and output (access key report).

use std::io::{Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{KeyListerError, Result};
use crate::types::{AccountRoleEntry, Report};

const FIELDS_PER_ENTRY: usize = 2;

/// Read and validate the account list at `path`.
pub fn read_account_roles(path: &Path) -> Result<Vec<AccountRoleEntry>> {
    let file = std::fs::File::open(path)?;
    parse_account_roles(file)
}

/// Parse `account_id,role_name` records with no header row.
///
/// The first invalid record fails the whole list.
pub fn parse_account_roles<R: Read>(input: R) -> Result<Vec<AccountRoleEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let account_id = record.get(0).unwrap_or_default();
        if record.len() != FIELDS_PER_ENTRY {
            return Err(KeyListerError::InvalidAccountRole {
                line,
                account_id: account_id.to_string(),
                reason: format!(
                    "the number of data for this account is not {FIELDS_PER_ENTRY} columns"
                ),
            });
        }
        entries.push(AccountRoleEntry::new(line, account_id, &record[1])?);
    }
    Ok(entries)
}

/// Render the report as CSV: one row per user, rows of varying length.
pub fn render_report(report: &Report) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(Vec::new());
    for row in report.rows() {
        writer.write_record(row.to_record())?;
    }
    writer.into_inner().map_err(|e| KeyListerError::Io(e.into_error()))
}

/// Write the report to `path`, replacing it atomically.
///
/// The CSV goes to a temp file beside `path` first, so a failed write never
/// leaves a partial report behind.
pub fn write_report(path: &Path, report: &Report) -> Result<()> {
    let data = render_report(report)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
