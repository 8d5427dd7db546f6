//! Rename records and their CSV file format.
//!
//! A record file holds one `declaring type, old member, new member` triple per
//! line. Fields may be double-quoted; a doubled quote inside a quoted field is
//! a literal quote. Blank lines are skipped. Quoted fields cannot span lines.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use winnow::combinator::{alt, cut_err, opt, separated};
use winnow::prelude::*;
use winnow::token::take_till;
use winnow::ModalResult;

/// One planned member rename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenameEntry {
    /// Fully qualified name of the declaring type.
    pub declaring_type: String,
    pub old_member: String,
    pub new_member: String,
}

impl RenameEntry {
    pub fn new(
        declaring_type: impl Into<String>,
        old_member: impl Into<String>,
        new_member: impl Into<String>,
    ) -> Self {
        RenameEntry {
            declaring_type: declaring_type.into(),
            old_member: old_member.into(),
            new_member: new_member.into(),
        }
    }
}

/// A malformed line in a record file.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("record file line {line}: {message}")]
pub struct RecordError {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl RecordError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        RecordError {
            line,
            message: message.into(),
        }
    }
}

/// Parse a whole record file.
///
/// Entries come back in file order. A line with anything other than three
/// fields is an error.
pub fn parse_records(text: &str) -> Result<Vec<RenameEntry>, RecordError> {
    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = parse_line(line).map_err(|message| RecordError::new(line_no, message))?;
        if fields.len() != 3 {
            return Err(RecordError::new(
                line_no,
                format!("expected 3 fields, found {}", fields.len()),
            ));
        }
        let new_member = fields.pop().unwrap_or_default();
        let old_member = fields.pop().unwrap_or_default();
        let declaring_type = fields.pop().unwrap_or_default();
        entries.push(RenameEntry {
            declaring_type,
            old_member,
            new_member,
        });
    }
    Ok(entries)
}

/// Render one entry as a record-file line (without the trailing newline).
pub fn format_record(entry: &RenameEntry) -> String {
    [
        entry.declaring_type.as_str(),
        entry.old_member.as_str(),
        entry.new_member.as_str(),
    ]
    .iter()
    .map(|field| quote_field(field))
    .collect::<Vec<_>>()
    .join(",")
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn parse_line(line: &str) -> Result<Vec<String>, String> {
    parse_fields
        .parse(line)
        .map_err(|e| format!("malformed field near column {}", e.offset() + 1))
}

// ============================================================================
// Parser implementation using winnow
// ============================================================================

fn parse_fields(input: &mut &str) -> ModalResult<Vec<String>> {
    separated(1.., parse_field, ',').parse_next(input)
}

fn parse_field(input: &mut &str) -> ModalResult<String> {
    alt((parse_quoted, parse_bare)).parse_next(input)
}

/// `"..."` with `""` standing for one quote.
fn parse_quoted(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut value = String::new();
    loop {
        let chunk: &str = take_till(0.., |c| c == '"').parse_next(input)?;
        value.push_str(chunk);
        cut_err('"').parse_next(input)?;
        if opt('"').parse_next(input)?.is_some() {
            value.push('"');
        } else {
            return Ok(value);
        }
    }
}

fn parse_bare(input: &mut &str) -> ModalResult<String> {
    take_till(0.., |c| c == ',')
        .map(|s: &str| s.to_string())
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_records() {
        let entries = parse_records("App\\MyShop,_getParent,getParent\nApp\\Cart,_total,total\n").unwrap();
        assert_eq!(
            entries,
            vec![
                RenameEntry::new("App\\MyShop", "_getParent", "getParent"),
                RenameEntry::new("App\\Cart", "_total", "total"),
            ]
        );
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let entries = parse_records("\r\nApp\\A,_a,a\r\n\n   \nApp\\B,_b,b").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].new_member, "b");
    }

    #[test]
    fn test_quoted_fields() {
        let entries = parse_records("\"App\\Odd\",\"_say\"\"hi\"\"\",\"a,b\"").unwrap();
        assert_eq!(entries[0].declaring_type, "App\\Odd");
        assert_eq!(entries[0].old_member, "_say\"hi\"");
        assert_eq!(entries[0].new_member, "a,b");
    }

    #[test]
    fn test_wrong_field_count_reports_line() {
        let err = parse_records("App\\A,_a,a\nApp\\B,_b\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("expected 3 fields, found 2"));
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        let err = parse_records("\"App\\A,_a,a").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_format_quotes_only_when_needed() {
        assert_eq!(
            format_record(&RenameEntry::new("App\\MyShop", "_getParent", "getParent")),
            "App\\MyShop,_getParent,getParent"
        );
        assert_eq!(
            format_record(&RenameEntry::new("App\\A", "a,b", "say \"x\"")),
            "App\\A,\"a,b\",\"say \"\"x\"\"\""
        );
    }

    #[test]
    fn test_formatted_record_parses_back() {
        let entry = RenameEntry::new("App\\A", "we,ird", "q\"uote");
        let parsed = parse_records(&format_record(&entry)).unwrap();
        assert_eq!(parsed, vec![entry]);
    }
}
