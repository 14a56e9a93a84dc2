//! Wire-format helpers shared by the domain records.
//!
//! Rows coming back from the hosted backend can carry `null` where the
//! local database always has a value, and saved filters persist the literal
//! string `"all"` for "any".

use serde::{Deserialize, Deserializer, Serializer};

/// Deserialize `null` as `T::default()`
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub const ALL: &str = "all";

/// `Option<String>` stored as the value or the `"all"` sentinel
pub mod all_or {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(ALL))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|v| !v.is_empty() && v != ALL))
    }
}

/// `Option<Priority>` stored as a decimal string or `"all"`; numbers are accepted too
pub mod all_or_priority {
    use super::*;
    use crate::domain::Priority;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u8),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<Priority>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(p) => serializer.serialize_str(&p.as_u8().to_string()),
            None => serializer.serialize_str(ALL),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Priority>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(n)) => Priority::try_from(n).map(Some).map_err(serde::de::Error::custom),
            Some(Raw::Text(s)) if s.is_empty() || s == ALL => Ok(None),
            Some(Raw::Text(s)) => s.parse::<Priority>().map(Some).map_err(serde::de::Error::custom),
        }
    }
}
