use crate::error::{FieldWarning, InvalidInputError, MetarError};
use crate::parser::{FieldParser, DEFAULT_SOURCE_NAME};
use crate::report::ParsedReport;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::path::Path;

/// The result of decoding one report.
///
/// Keeps the raw text next to the structured record so callers can show both,
/// along with every field-level warning and the trailing fields that were not
/// decoded.
#[derive(Debug, Clone)]
pub struct DecodedReport {
    pub raw: String,
    pub report: ParsedReport,
    pub warnings: Vec<FieldWarning>,
    pub unparsed: Vec<String>,
}

impl Serialize for DecodedReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("raw", &self.raw)?;
        map.serialize_entry("report", &self.report)?;
        map.end()
    }
}

impl DecodedReport {
    /// Serializes the raw text and the record into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes only the decoded record into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn report_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.report)
    }

    /// Serializes the raw text and the record into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }

    /// `true` when every decoded position matched its pattern.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Decodes a raw METAR report.
///
/// This is the primary entry point. Only structurally unusable input fails;
/// a field that does not match its pattern is left out of the record and
/// reported in [`DecodedReport::warnings`].
///
/// # Errors
///
/// Returns `InvalidInputError::NoFields` if the report is empty or contains
/// only whitespace.
pub fn parse(report: &str) -> Result<DecodedReport, MetarError> {
    parse_with_name(report, DEFAULT_SOURCE_NAME)
}

/// Like [`parse`], naming the report source in diagnostics.
///
/// # Errors
///
/// Returns `InvalidInputError::NoFields` if the report is empty or contains
/// only whitespace.
pub fn parse_with_name(report: &str, name: &str) -> Result<DecodedReport, MetarError> {
    let mut parser = FieldParser::new_with_name(report, name.to_string())?;
    let parsed = parser.parse_report();
    let unparsed = parser
        .remaining()
        .iter()
        .map(|token| token.text.clone())
        .collect();

    Ok(DecodedReport {
        raw: report.to_string(),
        report: parsed,
        warnings: parser.into_warnings(),
        unparsed,
    })
}

/// Decodes a report received as raw bytes.
///
/// # Errors
///
/// Returns `InvalidInputError::NotUtf8` if the bytes are not text, otherwise
/// whatever [`parse`] returns.
pub fn parse_bytes(report: &[u8]) -> Result<DecodedReport, MetarError> {
    let text = std::str::from_utf8(report).map_err(|e| InvalidInputError::NotUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    parse(text)
}

/// Decodes a report taken out of a JSON payload.
///
/// # Errors
///
/// Returns `InvalidInputError::NotAString` if `value` is not a JSON string,
/// otherwise whatever [`parse`] returns.
pub fn parse_value(value: &serde_json::Value) -> Result<DecodedReport, MetarError> {
    match value {
        serde_json::Value::String(report) => parse(report),
        other => Err(InvalidInputError::NotAString {
            found: json_kind(other).to_string(),
        }
        .into()),
    }
}

/// Decodes every non-blank line of `text` as its own report.
///
/// Lines are independent: one malformed line does not affect the others.
#[must_use]
pub fn parse_lines(text: &str) -> Vec<Result<DecodedReport, MetarError>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse)
        .collect()
}

/// Reads a file holding one report per line and decodes each of them.
///
/// # Errors
///
/// Returns `MetarError::Io` if the file cannot be read. Per-report failures
/// are returned inside the vector.
pub fn parse_file(
    path: impl AsRef<Path>,
) -> Result<Vec<Result<DecodedReport, MetarError>>, MetarError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| MetarError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_lines(&text))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
