use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::models::{AddressRecord, RiskCategory};

/// Split one delimited line into trimmed, unquoted fields.
///
/// Commas inside double quotes do not split. Quote characters are dropped
/// entirely, which matches how the block-explorer exports are consumed.
pub fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Read every data row of an export file. The first line is a header and
/// is skipped, as are blank lines.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::Dataset {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(split_row)
        .collect())
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load candidate wallets for blind evaluation.
///
/// Rows carrying a name tag in column 1 are known entities (exchanges,
/// contracts) and are excluded. At most `limit` records are returned across
/// all sources, filled in source order then row order. Unreadable sources
/// are logged and skipped.
pub fn load_unlabeled(
    paths: &[PathBuf],
    expected: RiskCategory,
    limit: usize,
) -> Vec<AddressRecord> {
    let mut records = Vec::new();

    for path in paths {
        if records.len() >= limit {
            break;
        }

        let rows = match read_rows(path) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable dataset source");
                continue;
            }
        };

        let source = source_name(path);
        let before = records.len();

        for row in rows {
            if records.len() >= limit {
                break;
            }

            let address = row.first().map(String::as_str).unwrap_or_default();
            if address.is_empty() {
                continue;
            }

            let tag = row.get(1).map(String::as_str).unwrap_or_default();
            if !tag.is_empty() {
                tracing::debug!(address = %address, tag = %tag, "Skipping tagged entity");
                continue;
            }

            let n = records.len() + 1;
            records.push(
                AddressRecord::new(address, expected, source.clone()).with_name(format!("CSV {n}")),
            );
        }

        tracing::info!(
            source = %source,
            loaded = records.len() - before,
            "Loaded unlabeled wallets"
        );
    }

    records
}

/// Load every wallet in an export with the same expected category. The tag
/// column, when present, becomes the display name.
pub fn load_labeled(path: &Path, expected: RiskCategory) -> Result<Vec<AddressRecord>, AppError> {
    let source = source_name(path);

    let records: Vec<AddressRecord> = read_rows(path)?
        .into_iter()
        .filter(|row| row.first().is_some_and(|a| !a.is_empty()))
        .enumerate()
        .map(|(i, row)| {
            let name = row
                .get(1)
                .filter(|tag| !tag.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("CSV Wallet {}", i + 1));
            AddressRecord::new(row[0].clone(), expected, source.clone()).with_name(name)
        })
        .collect();

    tracing::info!(
        source = %source,
        expected = %expected,
        loaded = records.len(),
        "Loaded labeled wallets"
    );

    Ok(records)
}

/// `load_labeled` over several sources; unreadable ones are logged and skipped.
pub fn load_labeled_many(paths: &[PathBuf], expected: RiskCategory) -> Vec<AddressRecord> {
    paths
        .iter()
        .filter_map(|path| match load_labeled(path, expected) {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable dataset source");
                None
            }
        })
        .flatten()
        .collect()
}
