//! Canonical JSON form of a session spec.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serializer};

use crate::Result;
use crate::spec::SessionSpec;

/// Serialize a spec to its canonical JSON string.
///
/// The output is byte-identical for structurally identical specs: serde emits
/// struct fields in declaration order, names are fixed by the camelCase
/// renames on the model types, and numeric fields go through the decimal
/// string codecs below. Addresses, selectors and 32-byte reference values are
/// 0x-prefixed lowercase hex.
pub fn to_canonical_json(spec: &SessionSpec) -> Result<String> {
    Ok(serde_json::to_string(spec)?)
}

/// Parse a canonical JSON string back into a spec.
pub fn from_canonical_json(json: &str) -> Result<SessionSpec> {
    Ok(serde_json::from_str(json)?)
}

/// Decimal-string codec for `U256` fields.
///
/// `U256`'s native serde form is hex; the canonical form is base-10 so that
/// consumers without 256-bit integers can treat the value as an opaque
/// decimal string.
pub(crate) mod u256_dec {
    use super::*;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<U256>().map_err(serde::de::Error::custom)
    }
}

/// Decimal-string codec for `u64` fields (periods, expiry, constraint
/// offsets).
pub(crate) mod u64_dec {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<u64>().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, FixedBytes, address};

    use crate::limits::{LimitType, UsageLimit};
    use crate::spec::{CallPolicy, TransferPolicy};

    fn sample_spec() -> SessionSpec {
        SessionSpec::builder()
            .signer(address!("0x9bbc92a33f193174bf6cc09c4b4055500d972479"))
            .expires_at(1_749_040_108)
            .fee_limit(UsageLimit::lifetime(U256::from(100_000_000_000_000_000u64)))
            .call_policy(CallPolicy {
                target: address!("0x5fc8d32690cc91d4c39d9d3abcbd16989f875707"),
                selector: FixedBytes::from([0xa9, 0x05, 0x9c, 0xbb]),
                max_value_per_use: U256::ZERO,
                value_limit: UsageLimit::allowance(LimitType::Daily, U256::from(1000)),
                constraints: vec![],
            })
            .transfer_policy(TransferPolicy {
                target: Address::ZERO,
                max_value_per_use: U256::from(5),
                value_limit: UsageLimit::unlimited(),
            })
            .build()
    }

    #[test]
    fn test_canonical_json_is_deterministic() {
        let a = to_canonical_json(&sample_spec()).unwrap();
        let b = to_canonical_json(&sample_spec()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_numeric_fields_are_decimal_strings() {
        let json = to_canonical_json(&sample_spec()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["expiresAt"], "1749040108");
        assert_eq!(value["feeLimit"]["limit"], "100000000000000000");
        assert_eq!(value["feeLimit"]["period"], "0");
        assert_eq!(value["callPolicies"][0]["valueLimit"]["period"], "86400");
        assert_eq!(value["callPolicies"][0]["maxValuePerUse"], "0");
        assert_eq!(value["transferPolicies"][0]["maxValuePerUse"], "5");
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let spec = sample_spec();
        let parsed = from_canonical_json(&to_canonical_json(&spec).unwrap()).unwrap();
        assert_eq!(spec, parsed);
    }

    #[test]
    fn test_round_trip_near_u256_max() {
        let spec = SessionSpec::builder()
            .signer(Address::ZERO)
            .expires_at(u64::MAX)
            .fee_limit(UsageLimit::lifetime(U256::MAX))
            .transfer_policy(TransferPolicy {
                target: Address::ZERO,
                max_value_per_use: U256::MAX - U256::from(1),
                value_limit: UsageLimit::lifetime(U256::MAX),
            })
            .build();

        let parsed = from_canonical_json(&to_canonical_json(&spec).unwrap()).unwrap();
        assert_eq!(parsed.fee_limit.limit, U256::MAX);
        assert_eq!(
            parsed.transfer_policies[0].max_value_per_use,
            U256::MAX - U256::from(1)
        );
        assert_eq!(parsed.expires_at, u64::MAX);
    }

    #[test]
    fn test_limit_kind_is_string_tagged() {
        let json = to_canonical_json(&sample_spec()).unwrap();
        assert!(json.contains("\"Lifetime\""));
        assert!(json.contains("\"Daily\""));
        assert!(json.contains("\"Unlimited\""));
    }
}
