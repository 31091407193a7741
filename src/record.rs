use std::fmt;

use serde::Serialize;

/// Number of fields in a geofeed record: prefix, country, region,
/// city, postal code.
pub const FIELD_COUNT: usize = 5;

/// A single geofeed record as specified by RFC 8025.
///
/// Fields hold the raw text as it appeared in the input, with CSV
/// quoting already stripped. Created per input line and discarded
/// after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeofeedRecord {
    pub prefix: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub zip: String,
}

impl GeofeedRecord {
    /// Build a record from a parsed CSV row.
    ///
    /// Returns `None` for rows that do not have exactly five fields;
    /// the caller reports those as malformed rather than aborting.
    pub fn from_row(row: &csv::ByteRecord) -> Option<Self> {
        if row.len() != FIELD_COUNT {
            return None;
        }

        let field = |idx: usize| String::from_utf8_lossy(&row[idx]).into_owned();

        Some(Self {
            prefix: field(0),
            country: field(1),
            region: field(2),
            city: field(3),
            zip: field(4),
        })
    }
}

impl fmt::Display for GeofeedRecord {
    /// Rejoin the raw field values with commas. Quoting is not
    /// reinstated; diagnostics echo the field content as parsed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.prefix, self.country, self.region, self.city, self.zip
        )
    }
}

/// Rejoin an arbitrary-width CSV row with commas, for echoing rows
/// that failed the field-count check.
pub fn join_row(row: &csv::ByteRecord) -> String {
    let mut out = String::new();
    for (i, field) in row.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&String::from_utf8_lossy(field));
    }
    out
}
