//! Snowflake ID - 64-bit time-ordered identifier used for inventories, logs and materials
//!
//! Layout:
//! - Bits 63-22: Milliseconds since [`Snowflake::EPOCH`]
//! - Bits 21-12: Worker ID (0-1023)
//! - Bits 11-0:  Per-millisecond sequence (0-4095)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

const WORKER_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;
const MAX_WORKER_ID: u16 = (1 << WORKER_BITS) - 1;

/// Time-ordered 64-bit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Custom epoch: 2024-01-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1_704_067_200_000;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Milliseconds since the Unix epoch encoded in the ID
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> (WORKER_BITS + SEQUENCE_BITS)) + Self::EPOCH
    }

    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> SEQUENCE_BITS) & i64::from(MAX_WORKER_ID)) as u16
    }

    /// Creation time encoded in the ID
    pub fn created_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp())
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        match s.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(Snowflake(id)),
            _ => Err(SnowflakeParseError::InvalidFormat),
        }
    }
}

/// Error when parsing a Snowflake from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Serialized as a string so browser clients do not lose precision
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

// Accepts either a string or a JSON number
impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer snowflake ID")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Snowflake, E>
            where
                E: de::Error,
            {
                Ok(Snowflake(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Snowflake, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(Snowflake)
                    .map_err(|_| de::Error::custom("snowflake out of range"))
            }

            fn visit_str<E>(self, value: &str) -> Result<Snowflake, E>
            where
                E: de::Error,
            {
                Snowflake::parse(value).map_err(|_| de::Error::custom("invalid snowflake string"))
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

/// Lock-free Snowflake generator
///
/// The last issued `(millis, sequence)` pair is packed into one atomic so a
/// single compare-and-swap both reserves the sequence and advances time.
/// When a millisecond's 4096 sequences are exhausted, or the wall clock moves
/// backwards, the generator borrows the next millisecond instead of sleeping,
/// so IDs stay unique and strictly increasing per generator.
pub struct SnowflakeGenerator {
    worker_id: u16,
    state: AtomicI64,
}

impl SnowflakeGenerator {
    /// # Panics
    /// Panics if `worker_id` does not fit in 10 bits.
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id <= MAX_WORKER_ID, "Worker ID must be < 1024");
        Self {
            worker_id,
            state: AtomicI64::new(0),
        }
    }

    pub fn generate(&self) -> Snowflake {
        loop {
            let now = Self::elapsed_millis();
            let prev = self.state.load(Ordering::Acquire);
            let prev_millis = prev >> SEQUENCE_BITS;
            let prev_sequence = prev & SEQUENCE_MASK;

            let next = if now > prev_millis {
                now << SEQUENCE_BITS
            } else if prev_sequence < SEQUENCE_MASK {
                prev + 1
            } else {
                (prev_millis + 1) << SEQUENCE_BITS
            };

            if self
                .state
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                let millis = next >> SEQUENCE_BITS;
                let sequence = next & SEQUENCE_MASK;
                return Snowflake::new(
                    (millis << (WORKER_BITS + SEQUENCE_BITS))
                        | (i64::from(self.worker_id) << SEQUENCE_BITS)
                        | sequence,
                );
            }
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    #[inline]
    fn elapsed_millis() -> i64 {
        (Utc::now().timestamp_millis() - Snowflake::EPOCH).max(0)
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn test_parse_rejects_garbage_and_non_positive() {
        assert_eq!(Snowflake::parse("42").unwrap(), Snowflake::new(42));
        assert!(Snowflake::parse("abc").is_err());
        assert!(Snowflake::parse("0").is_err());
        assert!(Snowflake::parse("-7").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Snowflake::new(123_456_789_012_345_678)).unwrap();
        assert_eq!(json, "\"123456789012345678\"");
    }

    #[test]
    fn test_deserializes_from_string_or_number() {
        let from_str: Snowflake = serde_json::from_str("\"9001\"").unwrap();
        let from_num: Snowflake = serde_json::from_str("9001").unwrap();
        assert_eq!(from_str, from_num);
    }

    #[test]
    fn test_generator_is_strictly_increasing() {
        let generator = SnowflakeGenerator::new(3);
        let mut last = Snowflake::default();
        for _ in 0..10_000 {
            let id = generator.generate();
            assert!(id > last);
            assert_eq!(id.worker_id(), 3);
            last = id;
        }
    }

    #[test]
    fn test_generator_unique_across_threads() {
        let generator = Arc::new(SnowflakeGenerator::new(1));
        let ids = Arc::new(Mutex::new(HashSet::new()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                let ids = Arc::clone(&ids);
                thread::spawn(move || {
                    let local: Vec<_> = (0..2000).map(|_| generator.generate()).collect();
                    ids.lock().unwrap().extend(local);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ids.lock().unwrap().len(), 8000);
    }

    #[test]
    fn test_timestamp_roundtrips_to_creation_time() {
        let before = Utc::now().timestamp_millis();
        let id = SnowflakeGenerator::default().generate();
        let after = Utc::now().timestamp_millis();
        assert!(id.timestamp() >= before && id.timestamp() <= after + 1);
    }

    #[test]
    #[should_panic(expected = "Worker ID must be < 1024")]
    fn test_worker_id_out_of_range() {
        SnowflakeGenerator::new(1024);
    }
}
