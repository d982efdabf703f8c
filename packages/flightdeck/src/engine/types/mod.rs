mod field_value;
mod path;
mod record;

pub use field_value::FieldValue;
pub use path::FieldPath;
pub use record::Record;

use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

pub type FastMap<K, V> = std::collections::HashMap<K, V, BuildHasherDefault<FxHasher>>;
