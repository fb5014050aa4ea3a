//! Per-entry summaries extracted from API responses.

use crate::entry::EntryKind;
use chrono::{DateTime, Local, TimeZone};
use serde_json::Value;
use std::fmt;

const NOT_AVAILABLE: &str = "N/A";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static NULL: Value = Value::Null;

/// Detection counts from the provider's analysis engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detections {
    /// Malicious plus suspicious verdicts.
    pub mal_sus: u64,
    /// All four verdict categories.
    pub total: u64,
}

impl Detections {
    /// Read `last_analysis_stats`. Missing counters count as 0; a missing
    /// stats object yields `None`.
    pub fn from_stats(stats: Option<&Value>) -> Option<Self> {
        let stats = stats?.as_object()?;
        let count = |key: &str| stats.get(key).and_then(Value::as_u64).unwrap_or(0);

        let malicious = count("malicious");
        let suspicious = count("suspicious");
        let undetected = count("undetected");
        let harmless = count("harmless");

        Some(Self {
            mal_sus: malicious + suspicious,
            total: malicious + suspicious + undetected + harmless,
        })
    }
}

/// Kind-specific field shown under each summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// Domain registration date.
    Registered(String),
    /// IP geolocation country code.
    Location(String),
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detail::Registered(date) => write!(f, "  Registered: {}", date),
            Detail::Location(country) => write!(f, "  Location: {}", country),
        }
    }
}

impl EntryKind {
    /// Extract this kind's detail field from `data.attributes`.
    pub fn detail(&self, attributes: &Value) -> Detail {
        match self {
            EntryKind::Domain => Detail::Registered(
                attributes
                    .get("creation_date")
                    .map(format_epoch)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
            EntryKind::Ip => Detail::Location(
                attributes
                    .get("country")
                    .and_then(Value::as_str)
                    .unwrap_or(NOT_AVAILABLE)
                    .to_string(),
            ),
        }
    }
}

/// Human-readable summary for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub entry: String,
    pub detections: Option<Detections>,
    pub reputation: Option<i64>,
    pub detail: Detail,
}

impl Summary {
    /// Build a summary from a successful response body.
    pub fn from_response(entry: &str, kind: EntryKind, body: &Value) -> Self {
        let attributes = body
            .get("data")
            .and_then(|d| d.get("attributes"))
            .unwrap_or(&NULL);

        Self {
            entry: entry.to_string(),
            detections: Detections::from_stats(attributes.get("last_analysis_stats")),
            reputation: attributes.get("reputation").and_then(Value::as_i64),
            detail: kind.detail(attributes),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ratio = self
            .detections
            .map(|d| format!("{}/{}", d.mal_sus, d.total))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let reputation = self
            .reputation
            .map(|r| r.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        writeln!(f)?;
        writeln!(f, " OSINT on {}: {} malicious hits", self.entry, ratio)?;
        writeln!(f, "  Community Score: {}", reputation)?;
        write!(f, "{}", self.detail)
    }
}

/// Format epoch seconds as a local timestamp, or "N/A" if not a valid epoch.
pub fn format_epoch(value: &Value) -> String {
    format_epoch_in(value, &Local)
}

/// Format epoch seconds in the given time zone.
pub fn format_epoch_in<Tz>(value: &Value, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let seconds = value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
            .map(|f| f.trunc() as i64)
    });

    seconds
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|utc| utc.with_timezone(tz).format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_summary_counts() {
        let body = json!({
            "data": {"attributes": {
                "last_analysis_stats": {"malicious": 2, "suspicious": 0, "undetected": 5, "harmless": 10},
                "reputation": -3
            }}
        });

        let summary = Summary::from_response("8.8.8.8", EntryKind::Ip, &body);
        assert_eq!(
            summary.detections,
            Some(Detections {
                mal_sus: 2,
                total: 17
            })
        );
        assert_eq!(summary.reputation, Some(-3));
        assert_eq!(summary.detail, Detail::Location("N/A".to_string()));
    }

    #[test]
    fn test_missing_counters_default_to_zero() {
        let stats = json!({"malicious": 3, "harmless": 4});
        assert_eq!(
            Detections::from_stats(Some(&stats)),
            Some(Detections {
                mal_sus: 3,
                total: 7
            })
        );
    }

    #[test]
    fn test_missing_stats_is_unknown() {
        assert_eq!(Detections::from_stats(None), None);
        assert_eq!(Detections::from_stats(Some(&json!("oops"))), None);

        let summary = Summary::from_response("example.com", EntryKind::Domain, &json!({}));
        assert!(summary.detections.is_none());
        assert!(summary.reputation.is_none());
        assert_eq!(summary.detail, Detail::Registered("N/A".to_string()));
    }

    #[test]
    fn test_ip_location() {
        let body = json!({"data": {"attributes": {"country": "US"}}});
        let summary = Summary::from_response("8.8.8.8", EntryKind::Ip, &body);
        assert_eq!(summary.detail, Detail::Location("US".to_string()));
    }

    #[test]
    fn test_domain_registration() {
        let body = json!({"data": {"attributes": {"creation_date": "yesterday"}}});
        let summary = Summary::from_response("example.com", EntryKind::Domain, &body);
        assert_eq!(summary.detail, Detail::Registered("N/A".to_string()));

        let body = json!({"data": {"attributes": {"creation_date": 0}}});
        let summary = Summary::from_response("example.com", EntryKind::Domain, &body);
        assert_eq!(summary.detail, Detail::Registered(format_epoch(&json!(0))));
    }

    #[test]
    fn test_format_epoch_utc() {
        assert_eq!(format_epoch_in(&json!(0), &Utc), "1970-01-01 00:00:00");
        assert_eq!(
            format_epoch_in(&json!(811_296_000), &Utc),
            "1995-09-17 00:00:00"
        );
        assert_eq!(format_epoch_in(&json!(1.5), &Utc), "1970-01-01 00:00:01");
    }

    #[test]
    fn test_format_epoch_invalid() {
        assert_eq!(format_epoch(&json!("not a number")), "N/A");
        assert_eq!(format_epoch(&json!(null)), "N/A");
        assert_eq!(format_epoch(&json!(true)), "N/A");
        assert_eq!(format_epoch(&json!(i64::MAX)), "N/A");
    }

    #[test]
    fn test_format_epoch_local_shape() {
        let formatted = format_epoch(&json!(0));
        assert_eq!(formatted.len(), "1970-01-01 00:00:00".len());
        assert!(formatted.starts_with("19"));
    }

    #[test]
    fn test_display_ip() {
        let summary = Summary {
            entry: "8.8.8.8".to_string(),
            detections: Some(Detections {
                mal_sus: 2,
                total: 17,
            }),
            reputation: Some(-3),
            detail: Detail::Location("US".to_string()),
        };

        assert_eq!(
            summary.to_string(),
            "\n OSINT on 8.8.8.8: 2/17 malicious hits\n  Community Score: -3\n  Location: US"
        );
    }

    #[test]
    fn test_display_unknown_fields() {
        let summary = Summary {
            entry: "example.com".to_string(),
            detections: None,
            reputation: None,
            detail: Detail::Registered("N/A".to_string()),
        };

        assert_eq!(
            summary.to_string(),
            "\n OSINT on example.com: N/A malicious hits\n  Community Score: N/A\n  Registered: N/A"
        );
    }
}
