//! Payload fingerprints for change detection.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of a JSON payload.
///
/// `serde_json::Value` objects serialize with sorted keys, so two payloads that
/// differ only in key order produce the same checksum.
pub fn payload_checksum(payload: &serde_json::Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checksum_consistency() {
        let payload = json!([{"meal_type": "LUNCH", "count": 4}]);
        assert_eq!(payload_checksum(&payload), payload_checksum(&payload));
    }

    #[test]
    fn test_different_content_different_checksum() {
        let a = json!([{"count": 4}]);
        let b = json!([{"count": 5}]);
        assert_ne!(payload_checksum(&a), payload_checksum(&b));
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a: serde_json::Value = serde_json::from_str(r#"{"a": 1, "b": 2}"#).unwrap();
        let b: serde_json::Value = serde_json::from_str(r#"{"b": 2, "a": 1}"#).unwrap();
        assert_eq!(payload_checksum(&a), payload_checksum(&b));
    }
}
