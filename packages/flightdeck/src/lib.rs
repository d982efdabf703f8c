pub mod auth;
pub mod dashboard;
pub mod engine;
pub mod fixtures;
pub mod gateway;
pub mod screens;
pub mod store;

pub use engine::aggregate::{aggregate, AggregateSpec, Reducer, Summary};
pub use engine::criteria::{
    BooleanToggle, CategoricalFilter, Criteria, DateRange, NumericBucket, NumericRange, ALL,
};
pub use engine::pipeline::{run, PipelineOutput};
pub use engine::predicate::{compose, KindDescriptor};
pub use engine::sort::{next_sort_config, SortConfig, SortDirection};
pub use engine::types::{FastMap, FieldPath, FieldValue, Record};
pub use gateway::{GatewayError, PlanDraft, PlanGateway};
pub use store::RecordStore;
