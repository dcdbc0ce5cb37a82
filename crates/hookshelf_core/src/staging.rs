//! Import staging: turn raw file text into a validated list of candidates.
//!
//! Staging performs no persistence writes. It decodes the text with the CSV
//! codec, drops rows that lack a name or URL and reports why each dropped row
//! was rejected. URL format and secret policy checks are left to the
//! committer so they run exactly once, right before a record is persisted.

use tracing::{info, warn};

use crate::csv_codec;
use crate::errors::ImportError;
use crate::record::ImportCandidate;

#[cfg(test)]
#[path = "staging_tests.rs"]
mod tests;

/// Why a row was excluded from a staged import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    /// The row had fewer than two fields.
    MalformedRow { field_count: usize },

    /// The name column was empty after trimming.
    MissingName,

    /// The URL column was empty after trimming.
    MissingUrl,
}

impl std::fmt::Display for RowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRow { field_count } => {
                write!(f, "expected at least 2 columns, found {field_count}")
            }
            Self::MissingName => write!(f, "name is empty"),
            Self::MissingUrl => write!(f, "url is empty"),
        }
    }
}

/// A row excluded from a staged import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    /// 1-based line within the import text.
    pub line: usize,

    pub rejection: RowRejection,
}

/// Candidates ready to be committed, with the diagnostics of dropped rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedImport {
    /// Structurally valid candidates in file order.
    pub candidates: Vec<ImportCandidate>,

    /// Number of rows the CSV codec rejected as malformed.
    pub rejected_row_count: usize,

    /// One entry per dropped row, in file order.
    pub diagnostics: Vec<RowDiagnostic>,
}

impl StagedImport {
    /// Number of candidates that will be offered to the committer.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of rows dropped for a missing name or URL.
    pub fn invalid_candidate_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| !matches!(diagnostic.rejection, RowRejection::MalformedRow { .. }))
            .count()
    }
}

/// Stage an import from raw CSV text.
///
/// # Errors
///
/// - [`ImportError::EmptyFile`] if the text is blank (a lone byte-order mark
///   counts as blank)
/// - [`ImportError::NoValidRows`] if no candidate survives decoding and the
///   name/URL checks
///
/// # Behavior
///
/// Candidates keep their decoded values except that `name` and `url` are
/// trimmed; the secret is kept verbatim.
pub fn stage_import(raw_text: &str) -> Result<StagedImport, ImportError> {
    if raw_text.trim_start_matches('\u{FEFF}').trim().is_empty() {
        warn!("Import rejected: file is empty");
        return Err(ImportError::EmptyFile);
    }

    let parsed = csv_codec::parse(raw_text);
    if parsed.candidates.is_empty() {
        warn!(
            rejected = parsed.rejected_row_count,
            "Import rejected: no rows could be decoded"
        );
        return Err(ImportError::NoValidRows);
    }

    let mut staged = StagedImport {
        candidates: Vec::with_capacity(parsed.candidates.len()),
        rejected_row_count: parsed.rejected_row_count,
        diagnostics: parsed
            .rejected_lines
            .iter()
            .map(|rejected| RowDiagnostic {
                line: rejected.line,
                rejection: RowRejection::MalformedRow {
                    field_count: rejected.field_count,
                },
            })
            .collect(),
    };

    for (candidate, line) in parsed.candidates.into_iter().zip(parsed.candidate_lines) {
        match check_candidate(candidate) {
            Ok(candidate) => staged.candidates.push(candidate),
            Err(rejection) => {
                warn!(line = line, reason = %rejection, "Dropping import row");
                staged.diagnostics.push(RowDiagnostic { line, rejection });
            }
        }
    }
    staged.diagnostics.sort_by_key(|diagnostic| diagnostic.line);

    if staged.candidates.is_empty() {
        warn!("Import rejected: every decoded row lacks a name or url");
        return Err(ImportError::NoValidRows);
    }

    info!(
        candidates = staged.candidates.len(),
        rejected = staged.rejected_row_count,
        invalid = staged.invalid_candidate_count(),
        "Import staged"
    );

    Ok(staged)
}

/// Stage an import from raw file bytes, decoding them as UTF-8.
///
/// Invalid byte sequences are replaced rather than rejected, mirroring how
/// browsers read a text file.
pub fn stage_import_bytes(raw: &[u8]) -> Result<StagedImport, ImportError> {
    stage_import(&String::from_utf8_lossy(raw))
}

fn check_candidate(candidate: ImportCandidate) -> Result<ImportCandidate, RowRejection> {
    let name = candidate.name.trim();
    if name.is_empty() {
        return Err(RowRejection::MissingName);
    }

    let url = candidate.url.trim();
    if url.is_empty() {
        return Err(RowRejection::MissingUrl);
    }

    Ok(ImportCandidate {
        name: name.to_string(),
        url: url.to_string(),
        secret: candidate.secret,
    })
}
