use serde::Serialize;
use std::fmt::{self, Display};

/// The keys of a decoded record, in the order the groups appear in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    ReportType,
    Icao,
    Timestamp,
    Modifier,
    Wind,
}

impl FieldName {
    /// The key used for this field when the record is serialized.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::ReportType => "reportType",
            FieldName::Icao => "ICAO",
            FieldName::Timestamp => "timestamp",
            FieldName::Modifier => "modifier",
            FieldName::Wind => "wind",
        }
    }
}

impl Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportType {
    #[serde(rename = "METAR")]
    Metar,
    #[serde(rename = "SPECI")]
    Speci,
}

impl ReportType {
    /// Exact, case-sensitive match against a report token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "METAR" => Some(ReportType::Metar),
            "SPECI" => Some(ReportType::Speci),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::Metar => "METAR",
            ReportType::Speci => "SPECI",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modifier {
    #[serde(rename = "AUTO")]
    Auto,
    #[serde(rename = "COR")]
    Cor,
}

impl Modifier {
    /// Exact, case-sensitive match against a report token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "AUTO" => Some(Modifier::Auto),
            "COR" => Some(Modifier::Cor),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Auto => "AUTO",
            Modifier::Cor => "COR",
        }
    }
}

/// Observation time, `DDHHMMZ`. All parts are kept as the two-digit text
/// found in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timestamp {
    pub day_of_month: String,
    pub hours: String,
    pub mins: String,
    pub timezone: String,
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.day_of_month, self.hours, self.mins, self.timezone
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindDirection {
    /// Three-digit true heading, e.g. `170`.
    Heading(String),
    /// `VRB`
    Variable,
}

impl WindDirection {
    #[must_use]
    pub fn from_token(text: &str) -> Self {
        if text == "VRB" {
            WindDirection::Variable
        } else {
            WindDirection::Heading(text.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            WindDirection::Heading(heading) => heading,
            WindDirection::Variable => "VRB",
        }
    }
}

impl Serialize for WindDirection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wind {
    pub direction: WindDirection,
    pub speed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gusting_speed: Option<String>,
    pub speed_units: String,
}

impl Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.direction.as_str(), self.speed)?;
        if let Some(gust) = &self.gusting_speed {
            write!(f, "G{gust}")?;
        }
        f.write_str(&self.speed_units)
    }
}

/// One decoded field group. A `ParsedReport` is the ordered collection of
/// these, keyed by [`FieldName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedField {
    ReportType(ReportType),
    Icao(String),
    Timestamp(Timestamp),
    Modifier(Modifier),
    Wind(Wind),
}

impl ParsedField {
    #[must_use]
    pub fn name(&self) -> FieldName {
        match self {
            ParsedField::ReportType(_) => FieldName::ReportType,
            ParsedField::Icao(_) => FieldName::Icao,
            ParsedField::Timestamp(_) => FieldName::Timestamp,
            ParsedField::Modifier(_) => FieldName::Modifier,
            ParsedField::Wind(_) => FieldName::Wind,
        }
    }
}

impl Display for ParsedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedField::ReportType(t) => f.write_str(t.as_str()),
            ParsedField::Icao(icao) => f.write_str(icao),
            ParsedField::Timestamp(ts) => write!(f, "{ts}"),
            ParsedField::Modifier(m) => f.write_str(m.as_str()),
            ParsedField::Wind(w) => write!(f, "{w}"),
        }
    }
}

/// The structured decode of a report. Every field is optional: a group only
/// appears when its token matched. `icao` is only `None` when the report ran
/// out of tokens before the station position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReport {
    pub report_type: Option<ReportType>,
    pub icao: Option<String>,
    pub timestamp: Option<Timestamp>,
    pub modifier: Option<Modifier>,
    pub wind: Option<Wind>,
}

impl ParsedReport {
    /// Records a decoded field, replacing any previous value for the same key.
    pub fn insert(&mut self, field: ParsedField) {
        match field {
            ParsedField::ReportType(t) => self.report_type = Some(t),
            ParsedField::Icao(icao) => self.icao = Some(icao),
            ParsedField::Timestamp(ts) => self.timestamp = Some(ts),
            ParsedField::Modifier(m) => self.modifier = Some(m),
            ParsedField::Wind(w) => self.wind = Some(w),
        }
    }

    /// The populated fields, in report order.
    #[must_use]
    pub fn fields(&self) -> Vec<ParsedField> {
        let mut fields = Vec::with_capacity(5);
        if let Some(t) = self.report_type {
            fields.push(ParsedField::ReportType(t));
        }
        if let Some(icao) = &self.icao {
            fields.push(ParsedField::Icao(icao.clone()));
        }
        if let Some(ts) = &self.timestamp {
            fields.push(ParsedField::Timestamp(ts.clone()));
        }
        if let Some(m) = self.modifier {
            fields.push(ParsedField::Modifier(m));
        }
        if let Some(w) = &self.wind {
            fields.push(ParsedField::Wind(w.clone()));
        }
        fields
    }

    #[must_use]
    pub fn contains(&self, name: FieldName) -> bool {
        match name {
            FieldName::ReportType => self.report_type.is_some(),
            FieldName::Icao => self.icao.is_some(),
            FieldName::Timestamp => self.timestamp.is_some(),
            FieldName::Modifier => self.modifier.is_some(),
            FieldName::Wind => self.wind.is_some(),
        }
    }
}

/// Re-encodes the recognized groups as report text, e.g. `METAR CYTZ 051900Z 17011KT`.
impl Display for ParsedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}
