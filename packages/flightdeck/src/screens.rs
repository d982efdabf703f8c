//! Per-kind wiring for the four list views. One generic `Screen` replaces
//! the four hand-rolled filter/sort copies of the original UI; each kind
//! contributes only its descriptor, default sort, and summary spec.

use crate::engine::aggregate::{aggregate, AggregateSpec, Reducer};
use crate::engine::criteria::{BooleanToggle, Criteria, DateRange, NumericBucket, NumericRange};
use crate::engine::pipeline::{self, PipelineOutput};
use crate::engine::predicate::KindDescriptor;
use crate::engine::sort::{next_sort_config, SortConfig, SortDirection};
use crate::engine::types::{FieldPath, Record};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};

#[derive(Clone, Debug)]
pub struct ScreenConfig {
    pub descriptor: KindDescriptor,
    pub default_sort: Option<SortConfig>,
    pub aggregates: AggregateSpec,
    /// Categorical filter boxes the screen offers, seeded to "all" so later
    /// selections edit the box instead of stacking new entries.
    pub filter_boxes: Vec<&'static str>,
    /// Payout-style screens summarize the whole store; the others summarize
    /// the filtered set.
    pub store_wide_summary: bool,
}

/// Bet history: search player/flight, status and date filters, date-desc
/// default sort, stats over the filtered set.
pub fn bet_history() -> ScreenConfig {
    ScreenConfig {
        descriptor: KindDescriptor::new(&["player", "flightNumber"], Some("date")),
        default_sort: Some(SortConfig::new("date", SortDirection::Desc)),
        aggregates: AggregateSpec::new()
            .with("totalBets", Reducer::Count)
            .with("totalWagered", Reducer::Sum { field: FieldPath::new("amount") })
            .with("totalPayout", Reducer::Sum { field: FieldPath::new("payout") })
            .with(
                "winRate",
                Reducer::Rate { field: FieldPath::new("status"), equals: "won".into() },
            ),
        filter_boxes: vec!["status"],
        store_wide_summary: false,
    }
}

/// Payouts: search player/method, status + method filters, date range on
/// createdAt, store-wide stats.
pub fn payouts() -> ScreenConfig {
    ScreenConfig {
        descriptor: KindDescriptor::new(&["player", "method"], Some("createdAt")),
        default_sort: None,
        aggregates: AggregateSpec::new()
            .with("totalPayouts", Reducer::Count)
            .with("totalAmount", Reducer::Sum { field: FieldPath::new("amount") })
            .with(
                "completed",
                Reducer::CountWhere { field: FieldPath::new("status"), equals: "completed".into() },
            )
            .with(
                "pending",
                Reducer::CountWhere { field: FieldPath::new("status"), equals: "pending".into() },
            ),
        filter_boxes: vec!["status", "method"],
        store_wide_summary: true,
    }
}

/// Flight history: search flight number, date range on startTime, multiplier
/// buckets, stats over the filtered set.
pub fn flight_history() -> ScreenConfig {
    ScreenConfig {
        descriptor: KindDescriptor::new(&["flightNumber"], Some("startTime")),
        default_sort: None,
        aggregates: AggregateSpec::new()
            .with("totalFlights", Reducer::Count)
            .with("averageMultiplier", Reducer::Average { field: FieldPath::new("multiplier") })
            .with("highestMultiplier", Reducer::Max { field: FieldPath::new("multiplier") })
            .with("totalPlayers", Reducer::Sum { field: FieldPath::new("players") }),
        filter_boxes: vec![],
        store_wide_summary: false,
    }
}

/// Flight plans: a plain list; the pipeline still runs, with empty criteria.
pub fn flight_plans() -> ScreenConfig {
    ScreenConfig {
        descriptor: KindDescriptor::new(&["name", "description"], None),
        default_sort: None,
        aggregates: AggregateSpec::new().with("totalPlans", Reducer::Count),
        filter_boxes: vec![],
        store_wide_summary: false,
    }
}

/// "Mark as Completed" on a payout row. Only pending payouts carry the
/// action; returns false when the id is absent or not pending, leaving the
/// store untouched.
pub fn process_payout(store: &mut RecordStore, id: u64) -> bool {
    let is_pending = store
        .get(id)
        .and_then(|r| r.get("status"))
        .and_then(|v| v.as_str())
        == Some("pending");
    if !is_pending {
        return false;
    }
    let next = store
        .snapshot()
        .iter()
        .map(|r| {
            if r.id == id {
                let mut updated = r.clone();
                updated.set("status", crate::FieldValue::Str("completed".into()));
                updated
            } else {
                r.clone()
            }
        })
        .collect();
    store.replace(next);
    true
}

/// Mount-time gate for the flight history store: only rounds that had a
/// flight plan are listed.
pub fn planned_flights_only(records: Vec<Record>) -> Vec<Record> {
    let criteria = Criteria {
        boolean_toggle: Some(BooleanToggle {
            field: FieldPath::new("flightPlan"),
            expected: true,
        }),
        ..Criteria::default()
    };
    let descriptor = KindDescriptor::default();
    pipeline::filter(&records, &criteria, &descriptor, Utc::now())
}

/// One mounted list view: a store, the active criteria, and the sort state.
/// Every setter is a discrete user action; `render` re-runs the whole
/// pipeline against the current snapshot.
pub struct Screen {
    store: RecordStore,
    config: ScreenConfig,
    criteria: Criteria,
    sort: Option<SortConfig>,
}

impl Screen {
    pub fn new(config: ScreenConfig, store: RecordStore) -> Self {
        let sort = config.default_sort.clone();
        let mut criteria = Criteria::default();
        for field in &config.filter_boxes {
            criteria.select(field, crate::engine::criteria::ALL);
        }
        Self {
            store,
            config,
            criteria,
            sort,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn sort(&self) -> Option<&SortConfig> {
        self.sort.as_ref()
    }

    pub fn set_text_query(&mut self, query: &str) {
        self.criteria.text_query = query.to_string();
    }

    pub fn select(&mut self, field: &str, value: &str) {
        self.criteria.select(field, value);
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.criteria.date_range = range;
    }

    pub fn set_numeric_bucket(&mut self, field: &str, bucket: Option<NumericBucket>) {
        self.criteria.numeric_range = bucket.map(|bucket| NumericRange {
            field: FieldPath::new(field),
            bucket,
        });
    }

    /// The payouts "only pending" switch: pins a second status equality on
    /// top of whatever the status box selects.
    pub fn set_only_pending(&mut self, on: bool) {
        let pin = FieldPath::new("status");
        if on {
            let already = self
                .criteria
                .categorical
                .iter()
                .any(|c| c.field == pin && c.selected == "pending");
            if !already {
                self.criteria.categorical.push(crate::engine::criteria::CategoricalFilter {
                    field: pin,
                    selected: "pending".into(),
                });
            }
        } else {
            // Drop the pinned entry only (the last matching one).
            if let Some(pos) = self
                .criteria
                .categorical
                .iter()
                .rposition(|c| c.field == pin && c.selected == "pending")
            {
                self.criteria.categorical.remove(pos);
            }
        }
    }

    /// Column-header click: flip on the active key, ascend on a new one.
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = Some(next_sort_config(self.sort.as_ref(), key));
    }

    pub fn render(&self, now: DateTime<Utc>) -> PipelineOutput {
        let mut out = pipeline::run(
            self.store.snapshot(),
            &self.criteria,
            &self.config.descriptor,
            self.sort.as_ref(),
            &self.config.aggregates,
            now,
        );
        if self.config.store_wide_summary {
            out.summary = aggregate(self.store.snapshot(), &self.config.aggregates);
        }
        out
    }
}
