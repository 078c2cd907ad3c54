//! Minimal CSV tables.
//!
//! Records are one per line. Fields are separated by commas and may be
//! double-quoted, with `""` standing for a literal quote inside a quoted
//! field. Quoted fields cannot span lines.

use crate::error::{IoError, Result};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while},
    character::complete::{char, space0},
    combinator::{all_consuming, cut, map, value},
    multi::{fold_many0, separated_list1},
    sequence::{preceded, terminated},
    IResult,
};
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

/// Parse a double-quoted field.
fn quoted(input: &str) -> IResult<&str, String> {
    preceded(
        char('"'),
        cut(terminated(
            fold_many0(
                alt((is_not("\""), value("\"", tag("\"\"")))),
                String::new,
                |mut acc, part| {
                    acc.push_str(part);
                    acc
                },
            ),
            char('"'),
        )),
    )(input)
}

/// Parse an unquoted field, trimming surrounding whitespace.
fn bare(input: &str) -> IResult<&str, String> {
    map(take_while(|c: char| c != ','), |s: &str| s.trim().to_string())(input)
}

fn field(input: &str) -> IResult<&str, String> {
    alt((preceded(space0, terminated(quoted, space0)), bare))(input)
}

/// Parse one record.
fn record(input: &str) -> IResult<&str, Vec<String>> {
    separated_list1(char(','), field)(input)
}

/// Split one line into fields.
pub fn parse_record(line: &str, line_no: usize) -> Result<Vec<String>> {
    all_consuming(record)(line)
        .map(|(_, fields)| fields)
        .map_err(|e| IoError::parse(format!("malformed record: {e}"), line_no))
}

/// A header row and the records beneath it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse text whose first non-blank line is the header.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((header_line, header)) = lines.next() else {
            return Ok(Self::default());
        };
        let headers = parse_record(header, header_line)?;

        let mut rows = Vec::new();
        for (line_no, line) in lines {
            let mut fields = parse_record(line, line_no)?;
            if fields.len() > headers.len() {
                return Err(IoError::parse(
                    format!(
                        "record has {} fields but the header has {}",
                        fields.len(),
                        headers.len()
                    ),
                    line_no,
                ));
            }
            fields.resize(headers.len(), String::new());
            rows.push(fields);
        }
        Ok(Self { headers, rows })
    }

    /// Read and parse a file.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IoError::MissingFile(path.to_path_buf()));
        }
        Self::parse(&std::fs::read_to_string(path)?)
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Fail unless every named column is present.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| self.column(name).is_none()) {
            Some(missing) => Err(IoError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Field at `row` in column `name`, if the column exists and is non-empty.
    pub fn get(&self, row: usize, name: &str) -> Option<&str> {
        let column = self.column(name)?;
        self.rows
            .get(row)
            .map(|r| r[column].as_str())
            .filter(|v| !v.is_empty())
    }

    /// Parse the field at `row` in column `name`.
    ///
    /// Returns `Ok(None)` when the field is empty or the column is absent.
    pub fn parse_field<T: FromStr>(&self, row: usize, name: &str) -> Result<Option<T>> {
        match self.get(row, name) {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
                // Header is line 1; records follow without blank lines.
                IoError::parse(format!("invalid value '{raw}' for {name}"), row + 2)
            }),
        }
    }

    /// Like [`Self::parse_field`] but the field must be present.
    pub fn require_field<T: FromStr>(&self, row: usize, name: &str) -> Result<T> {
        self.parse_field(row, name)?
            .ok_or_else(|| IoError::parse(format!("missing value for {name}"), row + 2))
    }
}

/// Accumulates CSV text.
#[derive(Debug, Default)]
pub struct CsvWriter {
    output: String,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record with every field quoted.
    pub fn quoted_record<S: AsRef<str>>(&mut self, fields: &[S]) {
        let line = fields
            .iter()
            .map(|f| format!("\"{}\"", f.as_ref().replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(self.output, "{line}");
    }

    /// Append a record, quoting only fields that need it.
    pub fn record<S: AsRef<str>>(&mut self, fields: &[S]) {
        let line = fields
            .iter()
            .map(|f| escape(f.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(self.output, "{line}");
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// Parse a headerless grid of numbers, one grid row per line.
pub fn parse_matrix<T: FromStr>(text: &str) -> Result<Vec<Vec<T>>> {
    let mut rows = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let row = parse_record(line, index + 1)?
            .iter()
            .map(|cell| {
                cell.parse::<T>()
                    .map_err(|_| IoError::parse(format!("invalid cell '{cell}'"), index + 1))
            })
            .collect::<Result<Vec<T>>>()?;
        if rows.first().is_some_and(|first: &Vec<T>| first.len() != row.len()) {
            return Err(IoError::parse("ragged grid row", index + 1));
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Render rows of displayable cells as headerless CSV.
pub fn format_matrix<'a, T, R>(rows: R) -> String
where
    T: std::fmt::Display + 'a,
    R: IntoIterator<Item = &'a [T]>,
{
    let mut output = String::new();
    for row in rows {
        let line = row.iter().map(T::to_string).collect::<Vec<_>>().join(",");
        let _ = writeln!(output, "{line}");
    }
    output
}

fn escape(field: &str) -> String {
    let needs_quotes = field.contains(&[',', '"'][..])
        || field.starts_with(char::is_whitespace)
        || field.ends_with(char::is_whitespace);
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
