//! Opaque page cursors.
//!
//! A cursor is the `LastEvaluatedKey` of a Query or Scan, JSON encoded and then
//! base64 (URL-safe, unpadded) so it can travel in a query string. Every key
//! attribute of the table and its indexes is a string.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use talentdesk_core::storage::RepositoryError;

/// Encodes a `LastEvaluatedKey`. Returns `None` when there is no further page.
pub fn encode_cursor(
    last_evaluated_key: Option<&HashMap<String, AttributeValue>>,
) -> Result<Option<String>, RepositoryError> {
    let Some(key) = last_evaluated_key.filter(|k| !k.is_empty()) else {
        return Ok(None);
    };

    let mut plain = BTreeMap::new();
    for (name, value) in key {
        let s = value.as_s().map_err(|_| {
            RepositoryError::Serialization(format!("Non-string key attribute: {}", name))
        })?;
        plain.insert(name.as_str(), s.as_str());
    }

    let json =
        serde_json::to_vec(&plain).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    Ok(Some(URL_SAFE_NO_PAD.encode(json)))
}

/// Decodes a cursor produced by [`encode_cursor`].
pub fn decode_cursor(cursor: &str) -> Result<HashMap<String, AttributeValue>, RepositoryError> {
    let invalid = || RepositoryError::Validation("Invalid page cursor".to_string());

    let bytes = URL_SAFE_NO_PAD.decode(cursor).map_err(|_| invalid())?;
    let plain: HashMap<String, String> = serde_json::from_slice(&bytes).map_err(|_| invalid())?;
    if plain.is_empty() {
        return Err(invalid());
    }

    Ok(plain
        .into_iter()
        .map(|(name, value)| (name, AttributeValue::S(value)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("PK".to_string(), AttributeValue::S("JOB#j1".to_string())),
            ("SK".to_string(), AttributeValue::S("META#j1".to_string())),
            (
                "GSI1PK".to_string(),
                AttributeValue::S("JOBSTATUS#active".to_string()),
            ),
        ])
    }

    #[test]
    fn test_cursor_round_trip() {
        let key = sample_key();
        let cursor = encode_cursor(Some(&key)).unwrap().unwrap();
        assert_eq!(decode_cursor(&cursor).unwrap(), key);
    }

    #[test]
    fn test_no_key_means_no_cursor() {
        assert_eq!(encode_cursor(None).unwrap(), None);
        assert_eq!(encode_cursor(Some(&HashMap::new())).unwrap(), None);
    }

    #[test]
    fn test_garbage_cursor_is_validation_error() {
        assert!(matches!(
            decode_cursor("not a cursor!"),
            Err(RepositoryError::Validation(_))
        ));
        let empty = URL_SAFE_NO_PAD.encode("{}");
        assert!(decode_cursor(&empty).is_err());
    }

    #[test]
    fn test_numeric_key_attribute_rejected() {
        let key = HashMap::from([("PK".to_string(), AttributeValue::N("1".to_string()))]);
        assert!(encode_cursor(Some(&key)).is_err());
    }
}
