//! # Record Codec
//!
//! Converts single records to and from their on-disk text form:
//!
//! ```text
//! {bob}|                          user record
//! {apple/52.0/0.3/14.0/0.2/2.4/100}|   food record: name, 5 macros, portion
//! {1830.5}|                       day record: one macro total
//! ```
//!
//! A record is `{` + fields joined by `/` + `}`. Records in a file are each
//! followed by `|`. Nothing is trimmed: a stray newline makes a record invalid.
//!
//! Decoding never panics and never touches the filesystem. A failed decode
//! returns a [`SchemaError`] saying exactly what was wrong; the file validator
//! treats every such record as droppable.

use crate::model::{DayRecord, FoodRecord, Record, RecordKind, UserRecord, MACRO_COUNT};
use crate::names::{validate_name, NameError};

/// Terminates every record in a file.
pub const SEPARATOR: char = '|';
/// Separates the fields inside one record.
pub const FIELD_SEPARATOR: char = '/';

const OPEN: char = '{';
const CLOSE: char = '}';

/// Decodes one record (without its trailing `|`) as the given kind.
pub fn decode(line: &str, kind: RecordKind) -> Result<Record, SchemaError> {
    if line.is_empty() {
        return Err(SchemaError::Empty);
    }
    let inner = line
        .strip_prefix(OPEN)
        .and_then(|rest| rest.strip_suffix(CLOSE))
        .ok_or(SchemaError::MissingBraces)?;
    if inner.contains(OPEN) || inner.contains(CLOSE) {
        return Err(SchemaError::BraceInData);
    }

    let fields: Vec<&str> = inner.split(FIELD_SEPARATOR).collect();
    if fields.len() != kind.arity() {
        return Err(SchemaError::Arity {
            expected: kind.arity(),
            found: fields.len(),
        });
    }

    match kind {
        RecordKind::User => {
            let name = parse_name(fields[0])?;
            Ok(Record::User(UserRecord { name }))
        }
        RecordKind::Food => {
            let name = parse_name(fields[0])?;
            let mut macros = [0.0; MACRO_COUNT];
            for (slot, field) in macros.iter_mut().zip(&fields[1..=MACRO_COUNT]) {
                *slot = parse_decimal(field)?;
            }
            let portion = parse_integer(fields[MACRO_COUNT + 1])?;
            Ok(Record::Food(FoodRecord {
                name,
                macros,
                portion,
            }))
        }
        RecordKind::Day => {
            let value = parse_decimal(fields[0])?;
            Ok(Record::Day(DayRecord { value }))
        }
    }
}

/// Encodes one record as `{...}`, without the trailing `|`.
pub fn encode(record: &Record) -> String {
    let fields: Vec<String> = match record {
        Record::User(user) => vec![user.name.clone()],
        Record::Food(food) => {
            let mut fields = Vec::with_capacity(MACRO_COUNT + 2);
            fields.push(food.name.clone());
            fields.extend(food.macros.iter().map(|m| format_decimal(*m)));
            fields.push(food.portion.to_string());
            fields
        }
        Record::Day(day) => vec![format_decimal(day.value)],
    };
    format!("{}{}{}", OPEN, fields.join(&FIELD_SEPARATOR.to_string()), CLOSE)
}

/// Checks a record built in memory against its schema by running it through
/// the codec, so writers and readers share one definition of "valid".
pub fn validate(record: &Record) -> Result<(), SchemaError> {
    let decoded = decode(&encode(record), record.kind())?;
    if &decoded != record {
        // Only reachable for values the text form cannot carry exactly.
        return Err(SchemaError::BadDecimal(encode(record)));
    }
    Ok(())
}

/// Splits a file body into record chunks, the way reading up to each `|`
/// does: the empty tail after a final `|` is not a record, but an empty chunk
/// between two separators is (and fails to decode).
pub fn split_records(content: &str) -> impl Iterator<Item = &str> {
    let body = if content.is_empty() {
        None
    } else {
        Some(content.strip_suffix(SEPARATOR).unwrap_or(content))
    };
    body.into_iter().flat_map(|b| b.split(SEPARATOR))
}

/// Serializes records into a file body, each one terminated by `|`.
pub fn render_records(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&encode(record));
        out.push(SEPARATOR);
    }
    out
}

/// Shortest round-trip form, always with a fractional part (`0` → `0.0`).
pub fn format_decimal(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

fn parse_name(field: &str) -> Result<String, SchemaError> {
    validate_name(field).map_err(SchemaError::BadName)?;
    Ok(field.to_string())
}

fn parse_decimal(field: &str) -> Result<f64, SchemaError> {
    let bad = || SchemaError::BadDecimal(field.to_string());
    let mut digits = 0;
    let mut dots = 0;
    for ch in field.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return Err(bad()),
        }
    }
    if digits == 0 || dots > 1 {
        return Err(bad());
    }
    let value: f64 = field.parse().map_err(|_| bad())?;
    if !value.is_finite() {
        return Err(bad());
    }
    Ok(value)
}

fn parse_integer(field: &str) -> Result<u64, SchemaError> {
    let bad = || SchemaError::BadInteger(field.to_string());
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad());
    }
    field.parse().map_err(|_| bad())
}

/// Why a record failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Nothing between two separators
    Empty,
    /// Record does not start with `{` and end with `}`
    MissingBraces,
    /// A brace appears inside the field data
    BraceInData,
    /// Wrong number of `/`-separated fields
    Arity { expected: usize, found: usize },
    /// Name field fails the name grammar
    BadName(NameError),
    /// Field is not a non-negative decimal
    BadDecimal(String),
    /// Field is not a non-negative integer
    BadInteger(String),
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::Empty => write!(f, "record is empty"),
            SchemaError::MissingBraces => {
                write!(f, "record must start with '{{' and end with '}}'")
            }
            SchemaError::BraceInData => write!(f, "record data contains a brace"),
            SchemaError::Arity { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            SchemaError::BadName(reason) => write!(f, "invalid name: {}", reason),
            SchemaError::BadDecimal(field) => {
                write!(f, "'{}' is not a non-negative decimal", field)
            }
            SchemaError::BadInteger(field) => {
                write!(f, "'{}' is not a non-negative integer", field)
            }
        }
    }
}

impl std::error::Error for SchemaError {}
