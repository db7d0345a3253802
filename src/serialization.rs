use crate::report::{ParsedField, ParsedReport};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// A field serializes as its bare value; the key comes from the enclosing record.
impl Serialize for ParsedField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ParsedField::ReportType(t) => t.serialize(serializer),
            ParsedField::Icao(icao) => serializer.serialize_str(icao),
            ParsedField::Timestamp(ts) => ts.serialize(serializer),
            ParsedField::Modifier(m) => m.serialize(serializer),
            ParsedField::Wind(w) => w.serialize(serializer),
        }
    }
}

/// Absent groups are left out of the mapping entirely rather than written as `null`.
impl Serialize for ParsedReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in &fields {
            map.serialize_entry(field.name().as_str(), field)?;
        }
        map.end()
    }
}
