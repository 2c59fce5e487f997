//! Durations as integer nanoseconds, the JSON encoding of Go's
//! `time.Duration`.

use std::time::Duration;

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let nanos = i64::try_from(value.as_nanos())
        .map_err(|_| S::Error::custom("duration does not fit in i64 nanoseconds"))?;
    serializer.serialize_i64(nanos)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let nanos = i64::deserialize(deserializer)?;
    let nanos = u64::try_from(nanos)
        .map_err(|_| D::Error::custom(format!("negative duration: {nanos}ns")))?;
    Ok(Duration::from_nanos(nanos))
}
