use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use primitive_types::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{WalletError, WalletResult};

/// Exact, non-negative cell capacity in shannons.
///
/// Backed by a 256-bit unsigned integer so that no sum of realistic cell sets
/// can lose precision. Serialized as a decimal string, which is also the form
/// capacities are persisted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capacity(U256);

impl Capacity {
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Parse a plain decimal string. Signs, whitespace and empty strings are rejected.
    pub fn from_dec_str(value: &str) -> WalletResult<Self> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WalletError::InvalidArgument(format!(
                "Invalid capacity '{value}': expected a non-negative decimal integer"
            )));
        }
        U256::from_dec_str(value).map(Self).map_err(|e| {
            WalletError::InvalidArgument(format!("Invalid capacity '{value}': {e:?}"))
        })
    }

    pub fn checked_add(self, other: Capacity) -> WalletResult<Capacity> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(WalletError::CapacityOverflow)
    }

    /// Sum capacities exactly, failing on overflow instead of wrapping
    pub fn checked_sum<I: IntoIterator<Item = Capacity>>(iter: I) -> WalletResult<Capacity> {
        iter.into_iter()
            .try_fold(Capacity::zero(), |acc, c| acc.checked_add(c))
    }
}

impl From<u64> for Capacity {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<u128> for Capacity {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Capacity {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl FromStr for Capacity {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(s)
    }
}

impl Display for Capacity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // U256 displays in decimal
        write!(f, "{}", self.0)
    }
}

impl Serialize for Capacity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Capacity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Capacity::from_dec_str(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_beyond_u64() {
        let big = "340282366920938463463374607431768211456"; // 2^128
        let capacity = Capacity::from_dec_str(big).unwrap();
        assert_eq!(capacity.to_string(), big);
        assert!(capacity > Capacity::from(u128::MAX));
        assert_eq!(capacity.as_u256(), U256::from(u128::MAX) + U256::one());
    }

    #[test]
    fn test_rejects_malformed_strings() {
        for bad in ["", "-1", "+5", " 10", "1.5", "0x10", "ten"] {
            assert!(
                matches!(
                    Capacity::from_dec_str(bad),
                    Err(WalletError::InvalidArgument(_))
                ),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_checked_sum_is_exact() {
        let values = ["18446744073709551615", "18446744073709551615", "2"];
        let total =
            Capacity::checked_sum(values.iter().map(|v| Capacity::from_dec_str(v).unwrap()))
                .unwrap();
        assert_eq!(total.to_string(), "36893488147419103232");
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Capacity::from(U256::MAX);
        assert_eq!(
            max.checked_add(Capacity::from(1u64)),
            Err(WalletError::CapacityOverflow)
        );
    }

    #[test]
    fn test_serde_uses_decimal_strings() {
        let capacity = Capacity::from(6_100_000_000u64);
        let json = serde_json::to_string(&capacity).unwrap();
        assert_eq!(json, "\"6100000000\"");
        let back: Capacity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, capacity);
        assert!(serde_json::from_str::<Capacity>("\"abc\"").is_err());
    }
}
