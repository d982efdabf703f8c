use super::types::{FieldPath, FieldValue, Record};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Field lookup with the indirection every predicate and comparator routes
/// through: the virtual "id" field, then the direct field, then the nested
/// `username` member when the value is object-shaped (the heterogeneous
/// `player` representation).
pub fn field_of<'a>(record: &'a Record, path: &FieldPath) -> Option<FieldRef<'a>> {
    if path.segments().len() == 1 && path.segments()[0] == "id" {
        return Some(FieldRef::Id(record.id));
    }
    let (head, rest) = path.segments().split_first()?;
    let mut current = record.get(head)?;
    for part in rest {
        current = current.get(part)?;
    }
    match current {
        FieldValue::Object(map) => map.get("username").map(FieldRef::Value),
        other => Some(FieldRef::Value(other)),
    }
}

/// A resolved field: either a borrowed value or the synthesized id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Id(u64),
    Value(&'a FieldValue),
}

impl<'a> FieldRef<'a> {
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            FieldRef::Value(v) => v.as_str(),
            FieldRef::Id(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldRef::Value(v) => v.as_bool(),
            FieldRef::Id(_) => None,
        }
    }

    pub fn to_number_lenient(&self) -> (f64, bool) {
        match self {
            FieldRef::Value(v) => v.to_number_lenient(),
            FieldRef::Id(id) => (*id as f64, false),
        }
    }
}

/// Text view of a field for substring search. Missing fields read as "".
pub fn text_of(record: &Record, path: &FieldPath) -> String {
    match field_of(record, path) {
        Some(FieldRef::Id(id)) => id.to_string(),
        Some(FieldRef::Value(v)) => match v {
            FieldValue::Str(s) => s.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            _ => String::new(),
        },
        None => String::new(),
    }
}

/// Lenient numeric view, surfacing the parse-failure flag.
pub fn number_of(record: &Record, path: &FieldPath) -> (f64, bool) {
    match field_of(record, path) {
        Some(field) => field.to_number_lenient(),
        None => (0.0, false),
    }
}

/// Parse the timestamp shapes the feeds actually produce: RFC 3339
/// ("2025-06-21T10:15:00Z"), space-separated local ("2025-06-21 10:15:00"),
/// and bare dates. Anything else is not a timestamp.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    None
}

/// UTC calendar-day key ("YYYY-MM-DD") of a timestamp string, if it parses.
pub fn day_key(s: &str) -> Option<String> {
    parse_timestamp(s).map(|dt| dt.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod field_of_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_virtual_id() {
        let r = Record::from_value(json!({"id": 9, "player": "A"}));
        assert_eq!(field_of(&r, &FieldPath::new("id")), Some(FieldRef::Id(9)));
    }

    #[test]
    fn test_direct_field() {
        let r = Record::from_value(json!({"id": 1, "status": "won"}));
        let f = field_of(&r, &FieldPath::new("status"));
        assert_eq!(f.and_then(|f| f.as_str()), Some("won"));
    }

    #[test]
    fn test_username_fallback() {
        let plain = Record::from_value(json!({"id": 1, "player": "JohnDoe"}));
        let nested = Record::from_value(json!({"id": 2, "player": {"username": "JohnDoe"}}));
        let path = FieldPath::new("player");
        assert_eq!(
            field_of(&plain, &path).and_then(|f| f.as_str()),
            Some("JohnDoe")
        );
        assert_eq!(
            field_of(&nested, &path).and_then(|f| f.as_str()),
            Some("JohnDoe")
        );
    }

    #[test]
    fn test_missing_field() {
        let r = Record::from_value(json!({"id": 1}));
        assert!(field_of(&r, &FieldPath::new("player")).is_none());
        assert_eq!(text_of(&r, &FieldPath::new("player")), "");
        assert_eq!(number_of(&r, &FieldPath::new("amount")), (0.0, false));
    }

    #[test]
    fn test_explicit_nested_path() {
        let r = Record::from_value(json!({"id": 1, "player": {"username": "Jane"}}));
        let f = field_of(&r, &FieldPath::new("player.username"));
        assert_eq!(f.and_then(|f| f.as_str()), Some("Jane"));
    }
}
