//! Conversion between documents and domain entities.

use crate::dao::Document;
use rehla_core::{RehlaError, RehlaResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Serializes an entity into a document. The `id` field is never stored.
pub(crate) fn encode<T: Serialize>(entity: &T) -> RehlaResult<Document> {
    match serde_json::to_value(entity)? {
        Value::Object(mut document) => {
            document.remove("id");
            Ok(document)
        }
        other => Err(RehlaError::internal(format!(
            "Entity did not serialize to an object: {}",
            other
        ))),
    }
}

/// Deserializes a document, injecting its id.
pub(crate) fn decode<T: DeserializeOwned>(id: &str, mut document: Document) -> RehlaResult<T> {
    document.insert("id".to_string(), Value::String(id.to_string()));
    serde_json::from_value(Value::Object(document))
        .map_err(|e| RehlaError::store(format!("Malformed document '{}': {}", id, e)))
}

/// Deserializes every `(id, document)` pair of a listing.
pub(crate) fn decode_all<T: DeserializeOwned>(entries: Vec<(String, Document)>) -> RehlaResult<Vec<T>> {
    entries
        .into_iter()
        .map(|(id, document)| decode(&id, document))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehla_core::Course;

    #[test]
    fn test_encode_strips_id_and_decode_restores_it() {
        let course = Course {
            id: "c1".to_string(),
            title: "Chemistry".to_string(),
            price: 25_000,
            ..Course::default()
        };
        let document = encode(&course).unwrap();
        assert!(document.get("id").is_none());

        let decoded: Course = decode("c1", document).unwrap();
        assert_eq!(decoded, course);
    }

    #[test]
    fn test_decode_malformed_is_store_error() {
        let mut document = Document::new();
        document.insert("title".to_string(), Value::Bool(true));
        let err = decode::<Course>("c1", document).unwrap_err();
        assert_eq!(err.error_code(), "STORE_ERROR");
    }
}
