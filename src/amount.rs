//! Arbitrary-precision payout amounts.
//!
//! Amounts are persisted as decimal strings so that values beyond `u64`
//! survive a round trip through JSON.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
use std::str::FromStr;

pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_str_radix(10))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    BigUint::from_str(&raw).map_err(D::Error::custom)
}

/// `minuend - subtrahend`, clamped at zero
pub fn saturating_sub(minuend: &BigUint, subtrahend: &BigUint) -> BigUint {
    if minuend > subtrahend {
        minuend - subtrahend
    } else {
        BigUint::zero()
    }
}
