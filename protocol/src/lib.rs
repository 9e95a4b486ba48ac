//! Versioned records kept in the key-value store between sessions.
//!
//! Every record type owns a storage key with the schema version baked in, carries the same
//! version in its body, and is validated after decoding. Anything that fails to decode or
//! validate is read back as "no record".

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use error::*;
pub use records::*;

mod error;
mod records;

pub trait StorageKey {
    const KEY: &'static str;
}

pub trait Record: StorageKey + Serialize + DeserializeOwned {
    const SCHEMA: u32;

    fn schema(&self) -> u32;

    /// Checks invariants serde cannot express.
    fn validate_fields(&self) -> Result<()>;

    fn validate(&self) -> Result<()> {
        if self.schema() != Self::SCHEMA {
            return Err(RecordError::UnsupportedSchema {
                found: self.schema(),
                expected: Self::SCHEMA,
            });
        }
        self.validate_fields()
    }

    fn to_json(&self) -> Result<Value> {
        self.validate()?;
        Ok(serde_json::to_value(self)?)
    }

    fn from_json(value: Value) -> Result<Self> {
        let record: Self = serde_json::from_value(value)?;
        record.validate()?;
        Ok(record)
    }

    /// Decodes a value read from the store, treating malformed data as absent.
    fn from_stored(value: Option<Value>) -> Option<Self> {
        match Self::from_json(value?) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("Ignoring malformed record at {}: {}", Self::KEY, err);
                None
            }
        }
    }
}
