use super::accessor::{day_key, parse_timestamp};
use super::types::FieldPath;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Sentinel that disables a categorical filter.
pub const ALL: &str = "all";

/// The full set of active filter parameters for one screen. Everything
/// defaults to "match everything"; enabled criteria AND together.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Criteria {
    #[serde(default)]
    pub text_query: String,
    #[serde(default)]
    pub categorical: Vec<CategoricalFilter>,
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub numeric_range: Option<NumericRange>,
    #[serde(default)]
    pub boolean_toggle: Option<BooleanToggle>,
}

impl Criteria {
    /// Set (or add) the selection of one categorical filter box.
    pub fn select(&mut self, field: &str, selected: &str) {
        let path = FieldPath::new(field);
        if let Some(entry) = self.categorical.iter_mut().find(|c| c.field == path) {
            entry.selected = SmolStr::new(selected);
        } else {
            self.categorical.push(CategoricalFilter {
                field: path,
                selected: SmolStr::new(selected),
            });
        }
    }
}

/// Equality filter against one record field; `selected == "all"` disables it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CategoricalFilter {
    pub field: FieldPath,
    pub selected: SmolStr,
}

impl CategoricalFilter {
    pub fn is_enabled(&self) -> bool {
        self.selected != ALL
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DateRange {
    #[default]
    All,
    Today,
    Yesterday,
    ThisWeek,
}

impl DateRange {
    /// Evaluate a timestamp string against this range at the given instant.
    /// Today/Yesterday compare UTC calendar-day keys; ThisWeek is an
    /// inclusive `now - 7d` lower bound with no upper bound. Unparseable or
    /// missing timestamps never match an enabled range.
    pub fn matches(&self, timestamp: Option<&str>, now: DateTime<Utc>) -> bool {
        match self {
            DateRange::All => true,
            DateRange::Today => {
                let today = now.format("%Y-%m-%d").to_string();
                timestamp.and_then(day_key).map(|d| d == today).unwrap_or(false)
            }
            DateRange::Yesterday => {
                let yesterday = (now - Duration::hours(24)).format("%Y-%m-%d").to_string();
                timestamp
                    .and_then(day_key)
                    .map(|d| d == yesterday)
                    .unwrap_or(false)
            }
            DateRange::ThisWeek => {
                let cutoff = now - Duration::days(7);
                timestamp
                    .and_then(parse_timestamp)
                    .map(|ts| ts >= cutoff)
                    .unwrap_or(false)
            }
        }
    }
}

/// Bucketed range over a leniently parsed numeric field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NumericRange {
    pub field: FieldPath,
    pub bucket: NumericBucket,
}

/// Half-open multiplier buckets: low [0, 2), medium [2, 4), high [4, ∞).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NumericBucket {
    Low,
    Medium,
    High,
}

impl NumericBucket {
    pub fn contains(&self, value: f64) -> bool {
        match self {
            NumericBucket::Low => value < 2.0,
            NumericBucket::Medium => (2.0..4.0).contains(&value),
            NumericBucket::High => value >= 4.0,
        }
    }
}

/// Exact match against a boolean field when enabled.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BooleanToggle {
    pub field: FieldPath,
    pub expected: bool,
}

#[cfg(test)]
mod date_range_tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_all_matches_anything() {
        let now = at("2025-06-21T12:00:00Z");
        assert!(DateRange::All.matches(Some("1999-01-01"), now));
        assert!(DateRange::All.matches(None, now));
    }

    #[test]
    fn test_today_compares_day_keys() {
        let now = at("2025-06-21T12:00:00Z");
        assert!(DateRange::Today.matches(Some("2025-06-21T23:59:59Z"), now));
        assert!(DateRange::Today.matches(Some("2025-06-21 08:00:00"), now));
        assert!(!DateRange::Today.matches(Some("2025-06-20T23:59:59Z"), now));
    }

    #[test]
    fn test_yesterday() {
        let now = at("2025-06-21T12:00:00Z");
        assert!(DateRange::Yesterday.matches(Some("2025-06-20T01:00:00Z"), now));
        assert!(!DateRange::Yesterday.matches(Some("2025-06-21T01:00:00Z"), now));
    }

    #[test]
    fn test_this_week_inclusive_lower_bound() {
        let now = at("2025-06-21T12:00:00Z");
        // Exactly seven days back is still inside the window.
        assert!(DateRange::ThisWeek.matches(Some("2025-06-14T12:00:00Z"), now));
        assert!(!DateRange::ThisWeek.matches(Some("2025-06-14T11:59:59Z"), now));
        // No upper bound: future timestamps pass.
        assert!(DateRange::ThisWeek.matches(Some("2025-07-01T00:00:00Z"), now));
    }

    #[test]
    fn test_unparseable_never_matches_enabled_range() {
        let now = at("2025-06-21T12:00:00Z");
        assert!(!DateRange::Today.matches(Some("not a date"), now));
        assert!(!DateRange::ThisWeek.matches(None, now));
    }
}

#[cfg(test)]
mod numeric_bucket_tests {
    use super::*;

    #[test]
    fn test_half_open_boundaries() {
        assert!(NumericBucket::Low.contains(1.99));
        assert!(!NumericBucket::Low.contains(2.0));
        assert!(NumericBucket::Medium.contains(2.0));
        assert!(NumericBucket::Medium.contains(3.99));
        assert!(!NumericBucket::Medium.contains(4.0));
        assert!(NumericBucket::High.contains(4.0));
        assert!(NumericBucket::High.contains(54.0));
    }
}
