use super::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;

/// One row of a record store. `id` lives outside the field map and is
/// addressable as the virtual field "id".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub fields: IndexMap<SmolStr, FieldValue>,
}

impl Record {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            fields: IndexMap::new(),
        }
    }

    /// Build a record from a JSON object. A numeric "id" member becomes the
    /// record id; everything else lands in the field map in source order.
    pub fn from_value(value: Value) -> Self {
        let mut record = Record::new(0);
        if let Value::Object(obj) = value {
            for (k, v) in obj {
                if k == "id" {
                    if let Some(id) = v.as_u64() {
                        record.id = id;
                        continue;
                    }
                }
                record.fields.insert(SmolStr::from(k), FieldValue::from(v));
            }
        }
        record
    }

    pub fn set(&mut self, name: &str, value: FieldValue) -> &mut Self {
        self.fields.insert(SmolStr::new(name), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn to_value(&self) -> Value {
        let mut obj = serde_json::Map::new();
        obj.insert("id".to_string(), Value::from(self.id));
        for (k, v) in &self.fields {
            obj.insert(k.to_string(), v.clone().into());
        }
        Value::Object(obj)
    }
}
