//! Seeds for reproducible variants.
//!
//! A seed is the only thing persisted for a generated variant. It is stored
//! as a base-36 string and reduced to the 32 bits MT19937 is seeded from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SamplingError};

const RADIX: u32 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed(u32);

impl Seed {
    /// Seed from an integer, reduced modulo 2^32.
    pub fn new(value: u64) -> Self {
        Seed(value as u32)
    }

    /// Parse a base-36 seed string such as `"2x7k"` (case-insensitive).
    pub fn from_base36(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        // from_str_radix would also take a leading sign
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SamplingError::InvalidSeed(text.to_string()));
        }
        u64::from_str_radix(trimmed, RADIX)
            .map(Seed::new)
            .map_err(|_| SamplingError::InvalidSeed(text.to_string()))
    }

    /// Seed from the wall clock (milliseconds since the epoch). Not reproducible.
    pub fn from_clock() -> Self {
        Seed::new(chrono::Utc::now().timestamp_millis() as u64)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn to_base36(self) -> String {
        let mut n = self.0;
        if n == 0 {
            return "0".to_string();
        }
        let mut digits = Vec::new();
        while n > 0 {
            // `n % 36` is always a valid digit
            digits.push(std::char::from_digit(n % RADIX, RADIX).unwrap_or('0'));
            n /= RADIX;
        }
        digits.iter().rev().collect()
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed(value)
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Seed::new(value)
    }
}

impl FromStr for Seed {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self> {
        Seed::from_base36(s)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base36())
    }
}

impl Serialize for Seed {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base36())
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Seed::from_base36(&text).map_err(serde::de::Error::custom)
    }
}
