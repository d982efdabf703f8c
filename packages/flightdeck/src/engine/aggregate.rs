use super::accessor::{field_of, number_of};
use super::types::{FieldPath, Record};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::BTreeSet;

/// One named statistic over a record set.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reducer {
    Count,
    /// Count of records whose field equals the value.
    CountWhere { field: FieldPath, equals: SmolStr },
    Sum { field: FieldPath },
    Average { field: FieldPath },
    Max { field: FieldPath },
    Distinct { field: FieldPath },
    /// Share of records whose field equals the value, as a percentage
    /// rounded to two decimals. Display formatting is the caller's concern.
    Rate { field: FieldPath, equals: SmolStr },
}

/// Named reducers evaluated together in one pass over the set.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AggregateSpec {
    pub entries: Vec<(SmolStr, Reducer)>,
}

impl AggregateSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, reducer: Reducer) -> Self {
        self.entries.push((SmolStr::new(name), reducer));
        self
    }
}

/// Aggregation result: computed values by reducer name, plus the count of
/// numeral strings that failed the lenient parse (substituted with 0, never
/// fatal; the counter exists so degraded input stays observable).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub values: IndexMap<SmolStr, f64>,
    pub parse_warnings: usize,
}

impl Summary {
    /// Value by name; absent reducers read as 0.
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Evaluate a spec over a snapshot. Pure and deterministic: the input is
/// never mutated and identical input yields identical output. Empty input
/// yields count 0, sum 0, average 0, and max 0 (0 is the documented
/// empty-set value for `Max`).
pub fn aggregate(records: &[Record], spec: &AggregateSpec) -> Summary {
    let mut summary = Summary::default();
    let count = records.len();

    for (name, reducer) in &spec.entries {
        let value = match reducer {
            Reducer::Count => count as f64,
            Reducer::CountWhere { field, equals } => {
                count_matching(records, field, equals) as f64
            }
            Reducer::Sum { field } => sum_field(records, field, &mut summary.parse_warnings),
            Reducer::Average { field } => {
                if count == 0 {
                    0.0
                } else {
                    sum_field(records, field, &mut summary.parse_warnings) / count as f64
                }
            }
            Reducer::Max { field } => records
                .iter()
                .map(|r| {
                    let (n, warned) = number_of(r, field);
                    if warned {
                        summary.parse_warnings += 1;
                    }
                    n
                })
                .fold(0.0_f64, f64::max),
            Reducer::Distinct { field } => {
                let seen: BTreeSet<String> = records
                    .iter()
                    .filter_map(|r| field_of(r, field).and_then(|f| f.as_str()))
                    .map(str::to_string)
                    .collect();
                seen.len() as f64
            }
            Reducer::Rate { field, equals } => {
                if count == 0 {
                    0.0
                } else {
                    let matched = count_matching(records, field, equals);
                    round2(matched as f64 / count as f64 * 100.0)
                }
            }
        };
        summary.values.insert(name.clone(), value);
    }

    summary
}

fn count_matching(records: &[Record], field: &FieldPath, equals: &SmolStr) -> usize {
    records
        .iter()
        .filter(|r| {
            field_of(r, field)
                .and_then(|f| f.as_str().map(|s| s == equals.as_str()))
                .unwrap_or(false)
        })
        .count()
}

fn sum_field(records: &[Record], field: &FieldPath, warnings: &mut usize) -> f64 {
    let mut total = 0.0;
    for record in records {
        let (n, warned) = number_of(record, field);
        if warned {
            *warnings += 1;
        }
        total += n;
    }
    total
}

#[cfg(test)]
mod aggregate_tests {
    use super::*;
    use serde_json::json;

    fn flights() -> Vec<Record> {
        [
            json!({"id": 1, "multiplier": "1.8", "players": 12, "status": "won"}),
            json!({"id": 2, "multiplier": "2.5", "players": 18, "status": "lost"}),
            json!({"id": 3, "multiplier": "4.3", "players": 24, "status": "won"}),
        ]
        .into_iter()
        .map(Record::from_value)
        .collect()
    }

    fn spec() -> AggregateSpec {
        AggregateSpec::new()
            .with("total", Reducer::Count)
            .with("avgMultiplier", Reducer::Average { field: FieldPath::new("multiplier") })
            .with("maxMultiplier", Reducer::Max { field: FieldPath::new("multiplier") })
            .with("totalPlayers", Reducer::Sum { field: FieldPath::new("players") })
            .with(
                "winRate",
                Reducer::Rate { field: FieldPath::new("status"), equals: SmolStr::new("won") },
            )
    }

    #[test]
    fn test_reducers_over_sample() {
        let summary = aggregate(&flights(), &spec());
        assert_eq!(summary.get("total"), 3.0);
        assert!((summary.get("avgMultiplier") - 8.6 / 3.0).abs() < 1e-9);
        assert_eq!(summary.get("maxMultiplier"), 4.3);
        assert_eq!(summary.get("totalPlayers"), 54.0);
        assert_eq!(summary.get("winRate"), 66.67);
        assert_eq!(summary.parse_warnings, 0);
    }

    #[test]
    fn test_empty_input_is_all_zeroes() {
        let summary = aggregate(&[], &spec());
        assert_eq!(summary.get("total"), 0.0);
        assert_eq!(summary.get("avgMultiplier"), 0.0);
        assert_eq!(summary.get("maxMultiplier"), 0.0);
        assert_eq!(summary.get("totalPlayers"), 0.0);
        assert_eq!(summary.get("winRate"), 0.0);
    }

    #[test]
    fn test_deterministic_and_pure() {
        let records = flights();
        let before = records.clone();
        let a = aggregate(&records, &spec());
        let b = aggregate(&records, &spec());
        assert_eq!(a, b);
        assert_eq!(records, before);
    }

    #[test]
    fn test_parse_warnings_counted_not_fatal() {
        let records: Vec<Record> = [
            json!({"id": 1, "multiplier": "2.0"}),
            json!({"id": 2, "multiplier": "boom"}),
        ]
        .into_iter()
        .map(Record::from_value)
        .collect();
        let spec = AggregateSpec::new()
            .with("sum", Reducer::Sum { field: FieldPath::new("multiplier") });
        let summary = aggregate(&records, &spec);
        assert_eq!(summary.get("sum"), 2.0);
        assert_eq!(summary.parse_warnings, 1);
    }

    #[test]
    fn test_distinct_counts_usernames_across_shapes() {
        let records: Vec<Record> = [
            json!({"id": 1, "player": "JohnDoe"}),
            json!({"id": 2, "player": {"username": "JohnDoe"}}),
            json!({"id": 3, "player": "JaneSmith"}),
        ]
        .into_iter()
        .map(Record::from_value)
        .collect();
        let spec = AggregateSpec::new()
            .with("players", Reducer::Distinct { field: FieldPath::new("player") });
        assert_eq!(aggregate(&records, &spec).get("players"), 2.0);
    }

    #[test]
    fn test_filtered_sum_scenario() {
        let records: Vec<Record> = [
            json!({"id": 1, "status": "won", "amount": 500}),
            json!({"id": 2, "status": "lost", "amount": 1000}),
        ]
        .into_iter()
        .map(Record::from_value)
        .collect();
        let won: Vec<Record> = records
            .iter()
            .filter(|r| r.get("status").and_then(|v| v.as_str()) == Some("won"))
            .cloned()
            .collect();
        let spec =
            AggregateSpec::new().with("sum", Reducer::Sum { field: FieldPath::new("amount") });
        assert_eq!(aggregate(&won, &spec).get("sum"), 500.0);
    }
}
