use super::aggregate::{aggregate, AggregateSpec, Summary};
use super::criteria::Criteria;
use super::predicate::{compose, KindDescriptor};
use super::sort::{sort_records, SortConfig};
use super::types::Record;
use chrono::{DateTime, Utc};
use tracing::instrument;

/// What a screen renders: the filtered, sorted records and their summary.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub records: Vec<Record>,
    pub summary: Summary,
}

/// The single recomputation point: filter the snapshot, stable-sort the
/// survivors, aggregate over them. Runs in full on every input change; the
/// snapshot itself is never touched.
#[instrument(skip_all, fields(records = snapshot.len()))]
pub fn run(
    snapshot: &[Record],
    criteria: &Criteria,
    descriptor: &KindDescriptor,
    sort: Option<&SortConfig>,
    spec: &AggregateSpec,
    now: DateTime<Utc>,
) -> PipelineOutput {
    let filtered = filter(snapshot, criteria, descriptor, now);

    let records = match sort {
        Some(config) => sort_records(filtered, config),
        None => filtered,
    };

    let summary = aggregate(&records, spec);

    PipelineOutput { records, summary }
}

/// Filter stage on its own, for callers that aggregate elsewhere (the
/// dashboard) or summarize the unfiltered store (the payouts screen).
pub fn filter(
    snapshot: &[Record],
    criteria: &Criteria,
    descriptor: &KindDescriptor,
    now: DateTime<Utc>,
) -> Vec<Record> {
    let pred = compose(criteria, descriptor, now);

    #[cfg(feature = "parallel")]
    let out: Vec<Record> = {
        use rayon::prelude::*;
        // Rayon's collect keeps source order, so the stable-sort contract
        // downstream still holds.
        snapshot.par_iter().filter(|r| pred(r)).cloned().collect()
    };

    #[cfg(not(feature = "parallel"))]
    let out: Vec<Record> = snapshot.iter().filter(|r| pred(r)).cloned().collect();

    out
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;
    use crate::engine::accessor::parse_timestamp;
    use crate::engine::aggregate::Reducer;
    use crate::engine::sort::SortDirection;
    use crate::engine::types::FieldPath;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2025-06-21T12:00:00Z").unwrap()
    }

    fn bets() -> Vec<Record> {
        [
            json!({"id": 1, "player": "JohnDoe", "flightNumber": "AV101",
                   "amount": 500, "payout": 1250, "status": "won",
                   "date": "2025-06-21T10:15:00Z"}),
            json!({"id": 2, "player": "JaneSmith", "flightNumber": "AV102",
                   "amount": 1000, "payout": 0, "status": "lost",
                   "date": "2025-06-20T11:00:00Z"}),
            json!({"id": 3, "player": "LuckyPlayer", "flightNumber": "AV103",
                   "amount": 200, "payout": 1000, "status": "won",
                   "date": "2025-06-18T14:45:00Z"}),
        ]
        .into_iter()
        .map(Record::from_value)
        .collect()
    }

    fn descriptor() -> KindDescriptor {
        KindDescriptor::new(&["player", "flightNumber"], Some("date"))
    }

    #[test]
    fn test_filter_does_not_mutate_snapshot() {
        let snapshot = bets();
        let before = snapshot.clone();
        let mut criteria = Criteria::default();
        criteria.select("status", "won");
        let first = filter(&snapshot, &criteria, &descriptor(), now());
        let second = filter(&snapshot, &criteria, &descriptor(), now());
        assert_eq!(snapshot, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_disabled_criteria_return_full_set_in_order() {
        let snapshot = bets();
        let out = run(
            &snapshot,
            &Criteria::default(),
            &descriptor(),
            None,
            &AggregateSpec::new(),
            now(),
        );
        assert_eq!(out.records, snapshot);
    }

    #[test]
    fn test_won_filter_plus_sum() {
        let snapshot = bets();
        let mut criteria = Criteria::default();
        criteria.select("status", "won");
        let spec =
            AggregateSpec::new().with("wagered", Reducer::Sum { field: FieldPath::new("amount") });
        let out = run(&snapshot, &criteria, &descriptor(), None, &spec, now());
        let ids: Vec<_> = out.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(out.summary.get("wagered"), 700.0);
    }

    #[test]
    fn test_empty_store_never_fails() {
        let spec = AggregateSpec::new()
            .with("count", Reducer::Count)
            .with("sum", Reducer::Sum { field: FieldPath::new("amount") });
        let sort = SortConfig::new("date", SortDirection::Desc);
        let out = run(
            &[],
            &Criteria::default(),
            &descriptor(),
            Some(&sort),
            &spec,
            now(),
        );
        assert!(out.records.is_empty());
        assert_eq!(out.summary.get("count"), 0.0);
        assert_eq!(out.summary.get("sum"), 0.0);
    }

    #[test]
    fn test_sort_applies_after_filter() {
        let snapshot = bets();
        let mut criteria = Criteria::default();
        criteria.select("status", "won");
        let sort = SortConfig::new("amount", SortDirection::Asc);
        let out = run(
            &snapshot,
            &criteria,
            &descriptor(),
            Some(&sort),
            &AggregateSpec::new(),
            now(),
        );
        let ids: Vec<_> = out.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
