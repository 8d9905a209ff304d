//! API key record issued after a successful verification.
//!
//! Records are fabricated client-side and appended to the `api_keys` list in
//! client storage. No server validates them.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Prefix carried by every generated key.
pub const KEY_PREFIX: &str = "sk_";

/// Number of random base-36 characters after the timestamp component.
const RANDOM_SUFFIX_LEN: usize = 11;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Represents one entry of the stored `api_keys` JSON array.
///
/// # Stored Shape
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "key": "sk_m2x9k1q0abc123def45",
///   "name": "Default API Key",
///   "created": "2025-12-20T10:00:00Z",
///   "requests": 0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    /// Fresh random identifier
    pub id: Uuid,

    /// Opaque key: `sk_` + base-36 timestamp + random base-36 characters
    pub key: String,

    /// Human-readable label
    pub name: String,

    /// When this key was issued
    pub created: DateTime<Utc>,

    /// Request counter, always 0 at issue time
    pub requests: u64,
}

impl ApiKeyRecord {
    /// Synthesize a new record with the given label.
    pub fn issue(name: impl Into<String>) -> Self {
        let created = Utc::now();
        Self {
            id: Uuid::new_v4(),
            key: generate_api_key(created),
            name: name.into(),
            created,
            requests: 0,
        }
    }

    /// Short SHA-256 fingerprint of the key, safe to print and log.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.key.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..12].to_string()
    }

    /// Key with everything but the prefix and the last four characters hidden.
    ///
    /// Stored records may come from elsewhere, so short or non-ASCII keys are
    /// handled by character, not by byte offset.
    pub fn masked_key(&self) -> String {
        let body = self.key.strip_prefix(KEY_PREFIX).unwrap_or(&self.key);
        let mut tail: Vec<char> = body.chars().rev().take(4).collect();
        tail.reverse();
        format!("{}****{}", KEY_PREFIX, tail.into_iter().collect::<String>())
    }
}

fn generate_api_key(now: DateTime<Utc>) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();

    let mut rng = rand::rng();
    let random: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();

    format!("{}{}{}", KEY_PREFIX, to_base36(millis), random)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        // Date.UTC(2024, 0, 1) in base 36
        assert_eq!(to_base36(1_704_067_200_000), "lqu5m2o0");
    }

    #[test]
    fn generated_key_has_prefix_and_alphabet() {
        let key = generate_api_key(Utc::now());
        assert!(key.starts_with(KEY_PREFIX));
        assert!(key[KEY_PREFIX.len()..]
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
        assert!(key.len() > KEY_PREFIX.len() + RANDOM_SUFFIX_LEN);
    }

    #[test]
    fn issued_record_starts_unused() {
        let record = ApiKeyRecord::issue("Default API Key");
        assert_eq!(record.name, "Default API Key");
        assert_eq!(record.requests, 0);
        assert!(record.key.starts_with(KEY_PREFIX));
    }

    #[test]
    fn issued_records_are_distinct() {
        let a = ApiKeyRecord::issue("a");
        let b = ApiKeyRecord::issue("b");
        assert_ne!(a.id, b.id);
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn record_serializes_with_expected_field_names() {
        let record = ApiKeyRecord::issue("Default API Key");
        let value = serde_json::to_value(&record).unwrap();
        for field in ["id", "key", "name", "created", "requests"] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        assert_eq!(value["requests"], 0);
    }

    #[test]
    fn masked_key_hides_middle() {
        let mut record = ApiKeyRecord::issue("x");
        record.key = "sk_abcdefghijkl".into();
        assert_eq!(record.masked_key(), "sk_****ijkl");
        assert_eq!(record.fingerprint().len(), 12);
    }

    #[test]
    fn masked_key_tolerates_short_and_multibyte_keys() {
        let mut record = ApiKeyRecord::issue("x");

        record.key = "ab".into();
        assert_eq!(record.masked_key(), "sk_****ab");

        record.key = String::new();
        assert_eq!(record.masked_key(), "sk_****");

        record.key = "sk_a€b".into();
        assert_eq!(record.masked_key(), "sk_****a€b");

        record.key = "sk_xyzé€ab".into();
        assert_eq!(record.masked_key(), "sk_****é€ab");
    }
}
