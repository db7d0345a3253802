use crate::error::{FieldWarning, InvalidInputError, MetarError};
use crate::lexer::{Lexer, Token};
use crate::report::*;
use log::{debug, warn};
use miette::NamedSource;
use regex::Regex;
use std::sync::{Arc, LazyLock};

pub const DEFAULT_SOURCE_NAME: &str = "report.metar";

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<dayOfMonth>[0-9]{2})(?P<hours>[0-9]{2})(?P<mins>[0-9]{2})(?P<timezone>Z)$")
        .expect("timestamp pattern is valid")
});

static WIND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<direction>VRB|[0-9]{3})(?P<speed>[0-9]{2})(?:G(?P<gustingSpeed>[0-9]{2}))?(?P<speedUnits>[A-Z]{2})$",
    )
    .expect("wind pattern is valid")
});

/// The outcome of trying one field group at a cursor position.
///
/// `consumed` says whether the front token was taken, `cursor` is the position
/// after the attempt and `value` is the decoded group, if the token matched.
/// A mandatory position that does not match is `consumed` with no `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<T> {
    pub consumed: bool,
    pub cursor: usize,
    pub value: Option<T>,
}

impl<T> Step<T> {
    fn skipped(cursor: usize) -> Self {
        Self {
            consumed: false,
            cursor,
            value: None,
        }
    }

    fn matched(cursor: usize, value: T) -> Self {
        Self {
            consumed: true,
            cursor: cursor + 1,
            value: Some(value),
        }
    }

    fn discarded(cursor: usize) -> Self {
        Self {
            consumed: true,
            cursor: cursor + 1,
            value: None,
        }
    }
}

/// A sequential field decoder for METAR reports.
///
/// The report is split into an immutable token array once; decoding walks a
/// cursor over it, one field group at a time:
///
/// ```text
/// Report ::= [ "METAR" | "SPECI" ] Station Time [ "AUTO" | "COR" ] Wind { Unparsed }
/// ```
#[derive(Debug)]
pub struct FieldParser<'a> {
    source: Arc<NamedSource<String>>,
    tokens: Vec<Token>,
    position: usize,
    source_text: &'a str,
    warnings: Vec<FieldWarning>,
}

impl<'a> FieldParser<'a> {
    pub fn new(source_text: &'a str) -> Result<Self, MetarError> {
        Self::new_with_name(source_text, DEFAULT_SOURCE_NAME.to_string())
    }

    /// Tokenizes `source_text`. Fails if there is nothing to decode.
    pub fn new_with_name(source_text: &'a str, name: String) -> Result<Self, MetarError> {
        let source = Arc::new(NamedSource::new(name, source_text.to_string()));
        let tokens = Lexer::new(source_text).lex();

        if tokens.is_empty() {
            return Err(InvalidInputError::NoFields {
                src: (*source).clone(),
                span: (0, source_text.len()).into(),
            }
            .into());
        }

        Ok(Self {
            source,
            tokens,
            position: 0,
            source_text,
            warnings: Vec::new(),
        })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Index of the first token not yet consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Tokens left after the last decoding step.
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.position.min(self.tokens.len())..]
    }

    pub fn warnings(&self) -> &[FieldWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<FieldWarning> {
        self.warnings
    }

    // === Main Parsing Method ===

    /// Decodes the leading field groups. Never fails: a group that does not
    /// match is left out of the record. Calling it again starts over from the
    /// first token.
    pub fn parse_report(&mut self) -> ParsedReport {
        self.position = 0;
        self.warnings.clear();
        let mut report = ParsedReport::default();

        let step = self.report_type_at(self.position);
        if let Some(report_type) = self.optional(FieldName::ReportType, step) {
            report.insert(ParsedField::ReportType(report_type));
        }

        let step = self.station_at(self.position);
        if let Some(icao) = self.mandatory(FieldName::Icao, "a station identifier", step) {
            report.insert(ParsedField::Icao(icao));
        }

        let step = self.timestamp_at(self.position);
        if let Some(timestamp) = self.mandatory(FieldName::Timestamp, "DDHHMMZ", step) {
            report.insert(ParsedField::Timestamp(timestamp));
        }

        let step = self.modifier_at(self.position);
        if let Some(modifier) = self.optional(FieldName::Modifier, step) {
            report.insert(ParsedField::Modifier(modifier));
        }

        let step = self.wind_at(self.position);
        if let Some(wind) = self.mandatory(FieldName::Wind, "dddff[Gff]UU", step) {
            report.insert(ParsedField::Wind(wind));
        }

        if !self.remaining().is_empty() {
            debug!(
                "{}: leaving {} trailing field(s) undecoded",
                self.source.name(),
                self.remaining().len()
            );
        }

        report
    }

    // === Field Steps ===

    /// ReportType ::= "METAR" | "SPECI"
    pub fn report_type_at(&self, cursor: usize) -> Step<ReportType> {
        match self.token_at(cursor).and_then(|t| ReportType::from_token(&t.text)) {
            Some(report_type) => Step::matched(cursor, report_type),
            None => Step::skipped(cursor),
        }
    }

    /// Station ::= any token
    pub fn station_at(&self, cursor: usize) -> Step<String> {
        match self.token_at(cursor) {
            Some(token) => Step::matched(cursor, token.text.clone()),
            None => Step::skipped(cursor),
        }
    }

    /// Time ::= DD HH MM "Z"
    pub fn timestamp_at(&self, cursor: usize) -> Step<Timestamp> {
        let Some(token) = self.token_at(cursor) else {
            return Step::skipped(cursor);
        };

        match TIMESTAMP_RE.captures(&token.text) {
            Some(caps) => Step::matched(
                cursor,
                Timestamp {
                    day_of_month: caps["dayOfMonth"].to_string(),
                    hours: caps["hours"].to_string(),
                    mins: caps["mins"].to_string(),
                    timezone: caps["timezone"].to_string(),
                },
            ),
            None => Step::discarded(cursor),
        }
    }

    /// Modifier ::= "AUTO" | "COR"
    pub fn modifier_at(&self, cursor: usize) -> Step<Modifier> {
        match self.token_at(cursor).and_then(|t| Modifier::from_token(&t.text)) {
            Some(modifier) => Step::matched(cursor, modifier),
            None => Step::skipped(cursor),
        }
    }

    /// Wind ::= ( "VRB" | ddd ) ff [ "G" ff ] UU
    pub fn wind_at(&self, cursor: usize) -> Step<Wind> {
        let Some(token) = self.token_at(cursor) else {
            return Step::skipped(cursor);
        };

        match WIND_RE.captures(&token.text) {
            Some(caps) => Step::matched(
                cursor,
                Wind {
                    direction: WindDirection::from_token(&caps["direction"]),
                    speed: caps["speed"].to_string(),
                    gusting_speed: caps.name("gustingSpeed").map(|m| m.as_str().to_string()),
                    speed_units: caps["speedUnits"].to_string(),
                },
            ),
            None => Step::discarded(cursor),
        }
    }

    // === Cursor Helper Methods ===

    fn token_at(&self, cursor: usize) -> Option<&Token> {
        self.tokens.get(cursor)
    }

    fn optional<T>(&mut self, field: FieldName, step: Step<T>) -> Option<T> {
        if step.value.is_some() {
            debug!("{}: decoded {field}", self.source.name());
        }
        self.position = step.cursor;
        step.value
    }

    /// Applies a step at a mandatory position, recording a warning when the
    /// position was discarded or the report had already ended.
    fn mandatory<T>(&mut self, field: FieldName, expected: &'static str, step: Step<T>) -> Option<T> {
        let start = self.position;
        self.position = step.cursor;

        if step.value.is_some() {
            debug!("{}: decoded {field}", self.source.name());
            return step.value;
        }

        let warning = match self.tokens.get(start).filter(|_| step.consumed) {
            Some(token) => FieldWarning::DiscardedToken {
                src: (*self.source).clone(),
                span: (token.pos_start, token.len()).into(),
                field,
                token: token.text.clone(),
                expected,
            },
            None => FieldWarning::MissingField {
                src: (*self.source).clone(),
                span: (self.source_text.len(), 0).into(),
                field,
            },
        };
        warn!("{}: {warning}", self.source.name());
        self.warnings.push(warning);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(source: &str) -> FieldParser<'_> {
        FieldParser::new_with_name(source, "test.metar".to_string()).unwrap()
    }

    fn parse_ok(source: &str) -> (ParsedReport, Vec<FieldWarning>) {
        let mut parser = parser(source);
        let report = parser.parse_report();
        (report, parser.into_warnings())
    }

    #[test]
    fn test_full_report_without_type() {
        let (report, warnings) = parse_ok("CYTZ 051900Z AUTO 17011KT");
        assert!(warnings.is_empty());
        assert_eq!(report.report_type, None);
        assert_eq!(report.icao.as_deref(), Some("CYTZ"));
        assert_eq!(
            report.timestamp,
            Some(Timestamp {
                day_of_month: "05".to_string(),
                hours: "19".to_string(),
                mins: "00".to_string(),
                timezone: "Z".to_string(),
            })
        );
        assert_eq!(report.modifier, Some(Modifier::Auto));
        assert_eq!(
            report.wind,
            Some(Wind {
                direction: WindDirection::Heading("170".to_string()),
                speed: "11".to_string(),
                gusting_speed: None,
                speed_units: "KT".to_string(),
            })
        );
    }

    #[test]
    fn test_report_type_and_gust() {
        let (report, _) = parse_ok("METAR CYTZ 051900Z 17011G20KT");
        assert_eq!(report.report_type, Some(ReportType::Metar));
        assert_eq!(report.modifier, None);
        let wind = report.wind.unwrap();
        assert_eq!(wind.gusting_speed.as_deref(), Some("20"));
        assert_eq!(wind.speed_units, "KT");
    }

    #[test]
    fn test_variable_wind_in_speci() {
        let (report, _) = parse_ok("SPECI EGLL 312350Z COR VRB03KT");
        assert_eq!(report.report_type, Some(ReportType::Speci));
        assert_eq!(report.modifier, Some(Modifier::Cor));
        assert_eq!(report.wind.unwrap().direction, WindDirection::Variable);
    }

    #[test]
    fn test_bad_time_is_discarded_and_parsing_resumes() {
        let (report, warnings) = parse_ok("CYTZ BADTIME AUTO 17011KT");
        assert!(report.timestamp.is_none());
        assert_eq!(report.modifier, Some(Modifier::Auto));
        assert!(report.wind.is_some());

        assert_eq!(warnings.len(), 1);
        match &warnings[0] {
            FieldWarning::DiscardedToken {
                field, token, span, ..
            } => {
                assert_eq!(*field, FieldName::Timestamp);
                assert_eq!(token, "BADTIME");
                assert_eq!(span.offset(), 5);
                assert_eq!(span.len(), 7);
            }
            other => panic!("unexpected warning: {other:?}"),
        }
    }

    #[test]
    fn test_bad_wind_is_discarded() {
        let (report, warnings) = parse_ok("CYTZ 051900Z 170KT 10SM");
        assert!(report.wind.is_none());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field(), FieldName::Wind);
    }

    #[test]
    fn test_missing_type_shifts_station_into_icao() {
        // Without a report type the first token is always the station.
        let (report, _) = parse_ok("METARX CYTZ 051900Z 17011KT");
        assert_eq!(report.icao.as_deref(), Some("METARX"));
        assert!(report.timestamp.is_none());
        assert!(report.wind.is_none());
    }

    #[test]
    fn test_short_report_reports_missing_positions() {
        let (report, warnings) = parse_ok("METAR");
        assert_eq!(report.report_type, Some(ReportType::Metar));
        assert!(report.icao.is_none());

        let missing: Vec<FieldName> = warnings.iter().map(FieldWarning::field).collect();
        assert_eq!(
            missing,
            vec![FieldName::Icao, FieldName::Timestamp, FieldName::Wind]
        );
        assert!(warnings
            .iter()
            .all(|w| matches!(w, FieldWarning::MissingField { .. })));
    }

    #[test]
    fn test_timestamp_requires_full_anchored_match() {
        for bad in ["051900", "0519000Z", "51900Z", "051900z", "05190AZ", "X051900Z"] {
            let source = format!("CYTZ {bad} 17011KT");
            let (report, _) = parse_ok(&source);
            assert!(report.timestamp.is_none(), "{bad} should not match");
            assert!(report.wind.is_some());
        }
    }

    #[test]
    fn test_wind_requires_full_anchored_match() {
        for bad in ["1701KT", "17011G2KT", "17011K", "17011KTS", "VRBX11KT", "17011kt"] {
            let source = format!("CYTZ 051900Z {bad}");
            let (report, _) = parse_ok(&source);
            assert!(report.wind.is_none(), "{bad} should not match");
        }
    }

    #[test]
    fn test_steps_are_pure_functions_of_the_cursor() {
        let parser = parser("METAR CYTZ 051900Z AUTO 17011KT");

        let step = parser.report_type_at(0);
        assert_eq!(step, Step::matched(0, ReportType::Metar));
        assert_eq!(step.cursor, 1);

        assert_eq!(parser.report_type_at(1), Step::skipped(1));
        assert_eq!(parser.modifier_at(2), Step::skipped(2));
        assert_eq!(parser.modifier_at(3).value, Some(Modifier::Auto));
        assert_eq!(parser.timestamp_at(1), Step::discarded(1));
        assert_eq!(parser.wind_at(9), Step::skipped(9));

        // Nothing was applied.
        assert_eq!(parser.position(), 0);
    }

    #[test]
    fn test_remaining_tokens_after_wind() {
        let mut parser = parser("CYTZ 051900Z AUTO 17011KT 15SM FEW040 22/12 A2992");
        parser.parse_report();
        assert_eq!(parser.position(), 4);
        let rest: Vec<&str> = parser.remaining().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rest, vec!["15SM", "FEW040", "22/12", "A2992"]);
    }

    #[test]
    fn test_parse_report_is_repeatable() {
        let mut parser = parser("CYTZ BADTIME 17011KT");
        let first = parser.parse_report();
        let first_warnings = parser.warnings().len();
        let second = parser.parse_report();
        assert_eq!(first, second);
        assert_eq!(parser.warnings().len(), first_warnings);
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let err = FieldParser::new(" \t ").unwrap_err();
        assert!(matches!(
            err,
            MetarError::InvalidInput(InvalidInputError::NoFields { .. })
        ));
    }
}
