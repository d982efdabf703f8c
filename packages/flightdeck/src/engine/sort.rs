use super::accessor::{field_of, parse_timestamp, FieldRef};
use super::types::{FieldPath, FieldValue, Record};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SortConfig {
    pub key: SmolStr,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: &str, direction: SortDirection) -> Self {
        Self {
            key: SmolStr::new(key),
            direction,
        }
    }
}

/// Pure toggle: re-requesting the active key flips direction, any other key
/// starts ascending.
pub fn next_sort_config(current: Option<&SortConfig>, requested: &str) -> SortConfig {
    match current {
        Some(cfg) if cfg.key == requested => SortConfig {
            key: cfg.key.clone(),
            direction: cfg.direction.flip(),
        },
        _ => SortConfig::new(requested, SortDirection::Asc),
    }
}

/// Natural ordering over resolved fields: numeric when both sides are
/// numbers, chronological when both strings parse as timestamps, otherwise
/// lexicographic; a missing field ranks below everything.
pub fn compare_fields(a: Option<FieldRef<'_>>, b: Option<FieldRef<'_>>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(FieldRef::Id(ia)), Some(FieldRef::Id(ib))) => ia.cmp(&ib),
        (Some(FieldRef::Id(ia)), Some(FieldRef::Value(vb))) => {
            compare_values(&FieldValue::Number(ia as f64), vb)
        }
        (Some(FieldRef::Value(va)), Some(FieldRef::Id(ib))) => {
            compare_values(va, &FieldValue::Number(ib as f64))
        }
        (Some(FieldRef::Value(va)), Some(FieldRef::Value(vb))) => compare_values(va, vb),
    }
}

fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
        (FieldValue::Bool(ba), FieldValue::Bool(bb)) => ba.cmp(bb),
        (FieldValue::Number(na), FieldValue::Number(nb)) => {
            na.partial_cmp(nb).unwrap_or(Ordering::Equal)
        }
        (FieldValue::Str(sa), FieldValue::Str(sb)) => {
            match (parse_timestamp(sa), parse_timestamp(sb)) {
                (Some(ta), Some(tb)) => ta.cmp(&tb),
                _ => sa.cmp(sb),
            }
        }
        (FieldValue::Object(oa), FieldValue::Object(ob)) => oa.len().cmp(&ob.len()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(v: &FieldValue) -> u8 {
    match v {
        FieldValue::Null => 0,
        FieldValue::Bool(_) => 1,
        FieldValue::Number(_) => 2,
        FieldValue::Str(_) => 3,
        FieldValue::Object(_) => 4,
    }
}

/// Stable sort of a filtered snapshot. Ties on the sort key keep their input
/// order so re-renders over equal keys stay deterministic.
pub fn sort_records(mut records: Vec<Record>, config: &SortConfig) -> Vec<Record> {
    let path = FieldPath::new(config.key.as_str());
    records.sort_by(|a, b| {
        let ord = compare_fields(field_of(a, &path), field_of(b, &path));
        match config.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    records
}


#[cfg(test)]
mod sort_records_tests {
    use super::*;
    use serde_json::json;

    fn rec(id: u64, v: serde_json::Value) -> Record {
        let mut obj = v;
        obj["id"] = json!(id);
        Record::from_value(obj)
    }

    #[test]
    fn test_numeric_sort() {
        let records = vec![
            rec(1, json!({"amount": 1000})),
            rec(2, json!({"amount": 200})),
            rec(3, json!({"amount": 500})),
        ];
        let sorted = sort_records(records, &SortConfig::new("amount", SortDirection::Asc));
        let ids: Vec<_> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_descending() {
        let records = vec![rec(1, json!({"amount": 200})), rec(2, json!({"amount": 500}))];
        let sorted = sort_records(records, &SortConfig::new("amount", SortDirection::Desc));
        let ids: Vec<_> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_chronological_across_formats() {
        // RFC 3339 and space-separated timestamps order by instant, not text.
        let records = vec![
            rec(1, json!({"date": "2025-06-21T10:15:00Z"})),
            rec(2, json!({"date": "2025-06-18 14:45:00"})),
            rec(3, json!({"date": "2025-06-20T11:00:00Z"})),
        ];
        let sorted = sort_records(records, &SortConfig::new("date", SortDirection::Asc));
        let ids: Vec<_> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_stability_on_equal_keys() {
        let records = vec![
            rec(10, json!({"date": "2025-06-21", "tag": "a"})),
            rec(11, json!({"date": "2025-06-21", "tag": "b"})),
            rec(12, json!({"date": "2025-06-20", "tag": "c"})),
            rec(13, json!({"date": "2025-06-21", "tag": "d"})),
        ];
        let sorted = sort_records(records, &SortConfig::new("date", SortDirection::Asc));
        let ids: Vec<_> = sorted.iter().map(|r| r.id).collect();
        // The three ties keep their input order behind the earlier date.
        assert_eq!(ids, vec![12, 10, 11, 13]);
    }

    #[test]
    fn test_missing_field_ranks_lowest() {
        let records = vec![
            rec(1, json!({"amount": 100})),
            rec(2, json!({})),
            rec(3, json!({"amount": 50})),
        ];
        let sorted = sort_records(records, &SortConfig::new("amount", SortDirection::Asc));
        let ids: Vec<_> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_player_sort_uses_username_fallback() {
        let records = vec![
            rec(1, json!({"player": {"username": "Zed"}})),
            rec(2, json!({"player": "Amy"})),
        ];
        let sorted = sort_records(records, &SortConfig::new("player", SortDirection::Asc));
        let ids: Vec<_> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
