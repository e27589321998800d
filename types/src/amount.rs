//! Amount helpers.
//!
//! Amounts are raw `u128` units. TOML integers stop at `i64::MAX`, which is
//! below common 18-decimal balances, so configuration files may also spell
//! amounts as strings (underscores allowed): `"10_000_000000000000000000"`.

/// Serde adapter for `u128` amounts: accepts integers or decimal strings,
/// always writes a decimal string.
pub mod serde_str {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(v as u128)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
            u128::try_from(v).map_err(|_| E::custom(format!("amount cannot be negative: {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            let digits: String = v.chars().filter(|c| *c != '_').collect();
            digits
                .parse::<u128>()
                .map_err(|e| E::custom(format!("invalid amount {v:?}: {e}")))
        }
    }
}
