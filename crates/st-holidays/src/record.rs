//! Holiday records as produced by the remote holiday source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use st_core::errors::{Error, Result};

/// Classification of a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayKind {
    /// Public holiday.
    #[default]
    #[serde(alias = "Public")]
    Public,
    /// Bank holiday; banks and offices are closed.
    #[serde(alias = "Bank")]
    Bank,
    /// School holiday.
    #[serde(alias = "School")]
    School,
    /// Authorities are closed.
    #[serde(alias = "Authorities")]
    Authorities,
    /// Majority of people take a day off.
    #[serde(alias = "Optional")]
    Optional,
    /// Observed but not a day off.
    #[serde(alias = "Observance")]
    Observance,
}

/// One holiday in one country.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayRecord {
    /// Calendar date (no time component).
    pub date: NaiveDate,
    /// Display name.
    pub name: String,
    /// Name in the country's own language, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    /// Classification.
    #[serde(default, alias = "type")]
    pub kind: HolidayKind,
    /// Upper-case ISO 3166-1 alpha-2 code.
    #[serde(alias = "countryCode")]
    pub country: String,
}

impl HolidayRecord {
    /// Create a public holiday.
    pub fn new(date: NaiveDate, name: impl Into<String>, country: &str) -> Self {
        Self {
            date,
            name: name.into(),
            local_name: None,
            kind: HolidayKind::Public,
            country: country.to_ascii_uppercase(),
        }
    }

    /// Set the classification.
    pub fn with_kind(mut self, kind: HolidayKind) -> Self {
        self.kind = kind;
        self
    }

    /// Decode a raw payload from the remote source.
    ///
    /// # Errors
    /// [`Error::InvalidPayload`] unless `payload` is a JSON array whose
    /// elements all decode as records.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Vec<HolidayRecord>> {
        if !payload.is_array() {
            return Err(Error::InvalidPayload("expected a JSON array".into()));
        }
        serde_json::from_value(payload.clone())
            .map_err(|err| Error::InvalidPayload(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_remote_payload() {
        let json = r#"{
            "date": "2024-12-26",
            "localName": "Zweiter Weihnachtsfeiertag",
            "name": "St. Stephen's Day",
            "countryCode": "DE",
            "fixed": true,
            "type": "Bank"
        }"#;
        let record: HolidayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 12, 26).unwrap());
        assert_eq!(record.name, "St. Stephen's Day");
        assert_eq!(record.local_name.as_deref(), Some("Zweiter Weihnachtsfeiertag"));
        assert_eq!(record.kind, HolidayKind::Bank);
        assert_eq!(record.country, "DE");
    }

    #[test]
    fn kind_defaults_to_public() {
        let json = r#"{ "date": "2024-01-01", "name": "New Year", "country": "FR" }"#;
        let record: HolidayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, HolidayKind::Public);
    }

    #[test]
    fn rejects_dates_with_time() {
        let json = r#"{ "date": "2024-01-01T00:00:00Z", "name": "x", "country": "FR" }"#;
        assert!(serde_json::from_str::<HolidayRecord>(json).is_err());
    }

    #[test]
    fn payload_must_be_an_array_of_records() {
        let ok = serde_json::json!([{ "date": "2024-05-01", "name": "Labour Day", "countryCode": "FR" }]);
        assert_eq!(HolidayRecord::from_payload(&ok).unwrap().len(), 1);

        let single = serde_json::json!({ "date": "2024-05-01", "name": "Labour Day" });
        assert!(matches!(
            HolidayRecord::from_payload(&single),
            Err(Error::InvalidPayload(_))
        ));
        let malformed = serde_json::json!([{ "date": "May 1st" }]);
        assert!(HolidayRecord::from_payload(&malformed).is_err());
    }
}
