//! Placeholder values for sample documents.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use rand::distr::{Alphanumeric, SampleString};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::domain::value_objects::LogicalType;

/// Length of generated string values.
pub const SAMPLE_STRING_LEN: usize = 15;

/// Produces a placeholder value for a logical column type.
pub trait SampleValueProvider {
    fn sample(&mut self, ty: LogicalType) -> Value;
}

/// Random sample values.
///
/// Strings are alphanumeric, integers fall in `0..254`, identifiers are v4
/// UUIDs and timestamps are RFC 3339. A seeded provider also pins the clock
/// so the whole document is reproducible.
pub struct RandomSamples {
    rng: StdRng,
    now: DateTime<Utc>,
}

impl RandomSamples {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            now: Utc::now(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            now: Utc
                .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or(DateTime::UNIX_EPOCH),
        }
    }

    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    fn string(&mut self, len: usize) -> String {
        Alphanumeric.sample_string(&mut self.rng, len)
    }
}

impl Default for RandomSamples {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleValueProvider for RandomSamples {
    fn sample(&mut self, ty: LogicalType) -> Value {
        match ty {
            LogicalType::String => Value::from(self.string(SAMPLE_STRING_LEN)),
            LogicalType::Byte | LogicalType::Rune => Value::from(self.string(1)),
            LogicalType::Boolean => Value::from(self.rng.random_bool(0.5)),
            LogicalType::Number | LogicalType::Int | LogicalType::Integer => {
                Value::from(self.rng.random_range(0..254_i64))
            }
            LogicalType::Uint => Value::from(self.rng.random_range(0..254_u64)),
            LogicalType::Float | LogicalType::Float32 | LogicalType::Float64 => {
                let cents = self.rng.random_range(0..100_000_i64);
                Value::from(cents as f64 / 100.0)
            }
            LogicalType::Uuid => {
                let bytes: [u8; 16] = self.rng.random();
                Value::from(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
            }
            LogicalType::Time | LogicalType::Timestamp => {
                Value::from(self.now.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_match_their_type() {
        let mut samples = RandomSamples::seeded(7);
        for ty in LogicalType::ALL {
            let value = samples.sample(*ty);
            assert_eq!(value.is_string(), ty.is_quoted(), "{ty}");
        }
    }

    #[test]
    fn string_length_and_charset() {
        let mut samples = RandomSamples::seeded(1);
        let value = samples.sample(LogicalType::String);
        let s = value.as_str().unwrap();
        assert_eq!(s.len(), SAMPLE_STRING_LEN);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn integers_are_bounded() {
        let mut samples = RandomSamples::seeded(3);
        for _ in 0..200 {
            let n = samples.sample(LogicalType::Integer).as_i64().unwrap();
            assert!((0..254).contains(&n));
        }
    }

    #[test]
    fn uuids_parse() {
        let mut samples = RandomSamples::seeded(9);
        let value = samples.sample(LogicalType::Uuid);
        let parsed = uuid::Uuid::parse_str(value.as_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn seeded_providers_agree() {
        let mut a = RandomSamples::seeded(42);
        let mut b = RandomSamples::seeded(42);
        for ty in LogicalType::ALL {
            assert_eq!(a.sample(*ty), b.sample(*ty));
        }
    }

    #[test]
    fn timestamps_use_the_clock() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let mut samples = RandomSamples::seeded(0).with_clock(now);
        assert_eq!(
            samples.sample(LogicalType::Timestamp),
            Value::from("2024-05-06T07:08:09Z")
        );
    }
}
