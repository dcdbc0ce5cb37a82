//! CSV codec for webhook lists.
//!
//! Pure conversion between `{name, url, secret}` tuples and CSV text. The
//! format is fixed: comma separated, every field wrapped in double quotes,
//! embedded quotes escaped by doubling, one record per line.
//!
//! Decoding is row oriented (text is split on line breaks before fields are
//! scanned), so a newline inside a quoted field is not supported.

use tracing::{debug, warn};

use crate::record::{ImportCandidate, WebhookFields};

#[cfg(test)]
#[path = "csv_codec_tests.rs"]
mod tests;

/// Column names of the header row, in order.
pub const CSV_COLUMNS: [&str; 3] = ["name", "url", "secret"];

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Outcome of decoding CSV text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// Rows with at least a name and a URL column, in file order.
    pub candidates: Vec<ImportCandidate>,

    /// 1-based source line of each entry in `candidates`, index for index.
    pub candidate_lines: Vec<usize>,

    /// Number of data rows dropped for having fewer than two fields.
    pub rejected_row_count: usize,

    /// 1-based line numbers of the dropped rows, in file order.
    pub rejected_lines: Vec<RejectedLine>,
}

/// A data row dropped by the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number within the input text.
    pub line: usize,

    /// Number of fields the row yielded.
    pub field_count: usize,
}

/// Render webhook fields as CSV text.
///
/// The output always starts with the `"name","url","secret"` header and
/// quotes every field unconditionally. Rows are joined with `\n` without a
/// trailing newline. An empty slice yields the header row alone.
pub fn serialize(records: &[WebhookFields]) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(encode_row(&CSV_COLUMNS));

    for record in records {
        rows.push(encode_row(&[
            record.name.as_str(),
            record.url.as_str(),
            record.secret.as_str(),
        ]));
    }

    rows.join("\n")
}

fn encode_row(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| quote_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Decode CSV text into import candidates.
///
/// Never fails: blank or unusable input produces an empty result.
///
/// # Behavior
///
/// 1. Strips a leading byte-order mark
/// 2. Splits on `\n` or `\r\n` and discards blank rows, keeping the
///    original line numbers
/// 3. Skips the first row when it mentions both `name` and `url`
///    (case-insensitive), otherwise treats it as data
/// 4. Scans each row with [`parse_row`]; rows with fewer than two fields are
///    rejected and counted, a missing third field yields an empty secret
pub fn parse(text: &str) -> ParseResult {
    let mut result = ParseResult::default();

    let cleaned = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    if cleaned.trim().is_empty() {
        debug!("CSV input is empty after cleaning");
        return result;
    }

    let rows: Vec<(usize, &str)> = cleaned
        .split('\n')
        .map(|row| row.strip_suffix('\r').unwrap_or(row))
        .enumerate()
        .map(|(index, row)| (index + 1, row))
        .filter(|(_, row)| !row.trim().is_empty())
        .collect();

    let Some((_, first_row)) = rows.first() else {
        return result;
    };

    let data_start = if is_header_row(first_row) {
        debug!("Skipping CSV header row");
        1
    } else {
        0
    };

    for (line, row) in &rows[data_start..] {
        let fields = parse_row(row.trim());

        if fields.len() < 2 {
            warn!(
                line = line,
                field_count = fields.len(),
                "CSV row has insufficient columns"
            );
            result.rejected_row_count += 1;
            result.rejected_lines.push(RejectedLine {
                line: *line,
                field_count: fields.len(),
            });
            continue;
        }

        let mut fields = fields.into_iter();
        let name = fields.next().unwrap_or_default();
        let url = fields.next().unwrap_or_default();
        let secret = fields.next().unwrap_or_default();
        result.candidates.push(ImportCandidate { name, url, secret });
        result.candidate_lines.push(*line);
    }

    debug!(
        candidates = result.candidates.len(),
        rejected = result.rejected_row_count,
        "CSV parsing complete"
    );

    result
}

fn is_header_row(row: &str) -> bool {
    let lowered = row.to_lowercase();
    lowered.contains("name") && lowered.contains("url")
}

/// Split a single CSV row into its fields.
///
/// Scans character by character with an "inside quotes" flag:
/// - `"` toggles the flag, except that `""` inside quotes emits one literal `"`
/// - `,` outside quotes ends the current field
/// - everything else, including `,` inside quotes, is kept verbatim
///
/// The last field is always emitted, so an empty row yields one empty field.
pub fn parse_row(row: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = row.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }

    fields.push(current);
    fields
}
