use super::accessor::{field_of, number_of, text_of};
use super::criteria::Criteria;
use super::types::{FieldPath, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-record-kind wiring the composer needs: which fields substring search
/// scans, and which field carries the timestamp for date-range filtering.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct KindDescriptor {
    pub search_fields: Vec<FieldPath>,
    pub date_field: Option<FieldPath>,
}

impl KindDescriptor {
    pub fn new(search_fields: &[&str], date_field: Option<&str>) -> Self {
        Self {
            search_fields: search_fields.iter().map(|f| FieldPath::new(f)).collect(),
            date_field: date_field.map(FieldPath::new),
        }
    }
}

/// Build the composed predicate for one evaluation pass. All enabled
/// criteria AND together; sub-conditions inside one criterion (search across
/// several fields) OR together. `now` is pinned by the caller so repeated
/// evaluation over a snapshot is a pure function.
pub fn compose<'a>(
    criteria: &'a Criteria,
    descriptor: &'a KindDescriptor,
    now: DateTime<Utc>,
) -> impl Fn(&Record) -> bool + 'a {
    let query = criteria.text_query.trim().to_lowercase();
    move |record| matches_record(record, criteria, descriptor, &query, now)
}

// Cheapest checks first: equality before bucket math before calendar math
// before substring scans.
fn matches_record(
    record: &Record,
    criteria: &Criteria,
    descriptor: &KindDescriptor,
    query_lower: &str,
    now: DateTime<Utc>,
) -> bool {
    for filter in &criteria.categorical {
        if !filter.is_enabled() {
            continue;
        }
        let matches = field_of(record, &filter.field)
            .and_then(|f| f.as_str().map(|s| s == filter.selected.as_str()))
            .unwrap_or(false);
        if !matches {
            return false;
        }
    }

    if let Some(toggle) = &criteria.boolean_toggle {
        let matches = field_of(record, &toggle.field)
            .and_then(|f| f.as_bool())
            .map(|b| b == toggle.expected)
            .unwrap_or(false);
        if !matches {
            return false;
        }
    }

    if let Some(range) = &criteria.numeric_range {
        let (value, _) = number_of(record, &range.field);
        if !range.bucket.contains(value) {
            return false;
        }
    }

    if criteria.date_range != super::criteria::DateRange::All {
        let Some(date_field) = &descriptor.date_field else {
            return false;
        };
        let timestamp = field_of(record, date_field).and_then(|f| f.as_str());
        if !criteria.date_range.matches(timestamp, now) {
            return false;
        }
    }

    if !query_lower.is_empty() {
        let hit = descriptor
            .search_fields
            .iter()
            .any(|f| text_of(record, f).to_lowercase().contains(query_lower));
        if !hit {
            return false;
        }
    }

    true
}
