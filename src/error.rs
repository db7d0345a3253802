use crate::report::FieldName;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum MetarError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error("Failed to read reports from {path}")]
    #[diagnostic(
        code(metar::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The whole input was unusable. Raised before any field is looked at.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum InvalidInputError {
    #[error("Expected a report string, found {found}")]
    #[diagnostic(
        code(input::not_a_string),
        help("Pass the raw report text, e.g. \"CYTZ 051900Z AUTO 17011KT\".")
    )]
    NotAString { found: String },

    #[error("Report is not valid UTF-8")]
    #[diagnostic(
        code(input::not_utf8),
        help("The first {valid_up_to} bytes decoded; METAR text is plain ASCII.")
    )]
    NotUtf8 { valid_up_to: usize },

    #[error("Report contains no fields")]
    #[diagnostic(
        code(input::no_fields),
        help("The report is empty or contains only whitespace.")
    )]
    NoFields {
        #[source_code]
        src: NamedSource<String>,
        #[label("nothing to decode here")]
        span: SourceSpan,
    },
}

/// A field-level mismatch. Never fails the parse; the affected key is simply
/// left out of the record.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum FieldWarning {
    #[error("Discarded `{token}` at the {field} position")]
    #[diagnostic(
        severity(Warning),
        code(parser::discarded_token),
        help("The token was consumed without being decoded, so `{field}` is absent from the record.")
    )]
    DiscardedToken {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected {expected}")]
        span: SourceSpan,
        field: FieldName,
        token: String,
        expected: &'static str,
    },

    #[error("Report ended before the {field} position")]
    #[diagnostic(
        severity(Warning),
        code(parser::missing_field),
        help("`{field}` is a mandatory group but no tokens were left.")
    )]
    MissingField {
        #[source_code]
        src: NamedSource<String>,
        #[label("report ends here")]
        span: SourceSpan,
        field: FieldName,
    },
}

impl FieldWarning {
    /// The record key this warning is about.
    #[must_use]
    pub fn field(&self) -> FieldName {
        match self {
            FieldWarning::DiscardedToken { field, .. } | FieldWarning::MissingField { field, .. } => {
                *field
            }
        }
    }
}
