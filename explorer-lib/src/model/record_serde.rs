//! Serde support for DynRecord
//!
//! A record serializes as a flat JSON object of its fields. The `"id"` key is
//! required when deserializing and may be a string or an integer.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as _;

use super::DynRecord;
use super::ID_FIELD;
use super::Value;

impl Serialize for DynRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DynRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = HashMap::<String, Value>::deserialize(deserializer)?;
        let id = match fields.remove(ID_FIELD) {
            Some(Value::String(s)) => s,
            Some(Value::Int(n)) => n.to_string(),
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "record id must be a string or an integer, got {}",
                    other.type_name()
                )));
            }
            None => return Err(D::Error::missing_field(ID_FIELD)),
        };

        let mut record = DynRecord::new(id);
        for (key, value) in fields {
            record.insert(key, value);
        }
        Ok(record)
    }
}
