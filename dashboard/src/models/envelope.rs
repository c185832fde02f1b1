//! Response envelope shared by every admin endpoint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DashboardError, DashboardResult, DataWarning};

/// Uniform wrapper returned by the backend: `{ success, data, message? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Failed envelope with an optional backend message.
    pub fn failure(message: Option<&str>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.map(str::to_string),
        }
    }

    /// Unwrap `data`.
    ///
    /// `success: false` and `data: null` both become [`DashboardError::Application`]
    /// carrying the backend message or the default. An empty collection is a
    /// valid payload and passes through unchanged.
    pub fn into_data(self) -> DashboardResult<T> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(DashboardError::application(
                self.message.as_deref().or(Some("No data returned")),
            )),
            (false, _) => Err(DashboardError::application(self.message.as_deref())),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
        }
    }
}

impl ApiResponse<Value> {
    /// Try to read an envelope out of a raw response body.
    ///
    /// Returns `None` when the body is not JSON or has no boolean `success`
    /// field; callers treat that as a transport failure.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(body).ok()?;
        if !value.get("success").is_some_and(Value::is_boolean) {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

/// Convert decoded envelope data into a typed value.
pub fn decode_data<T: DeserializeOwned>(data: Value) -> DashboardResult<T> {
    serde_json::from_value(data).map_err(|e| DashboardError::decode(e.to_string()))
}

/// Convert decoded envelope data into a list of typed records.
///
/// `data` must be an array. Items that do not fit `T` are skipped with a
/// [`DataWarning::MalformedRecord`] so one bad row never hides the rest.
pub fn decode_records<T: DeserializeOwned>(data: Value, source: &str) -> DashboardResult<Vec<T>> {
    let items = match data {
        Value::Array(items) => items,
        other => {
            return Err(DashboardError::decode(format!(
                "expected an array of records, got {}",
                json_kind(&other)
            ))
            .with_operation(source.to_string()))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => DataWarning::MalformedRecord {
                record: index,
                reason: e.to_string(),
            }
            .emit(source),
        }
    }
    Ok(records)
}

/// Raw collection from envelope data; anything but an array is treated as empty.
pub fn raw_records(data: Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            log::warn!("expected an array payload, got {}", json_kind(&other));
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_data_success() {
        let envelope: ApiResponse<Vec<u32>> =
            serde_json::from_value(json!({"success": true, "data": [1, 2, 3]})).unwrap();
        assert_eq!(envelope.into_data().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_array_is_not_an_error() {
        let envelope: ApiResponse<Vec<u32>> =
            serde_json::from_value(json!({"success": true, "data": []})).unwrap();
        assert!(envelope.into_data().unwrap().is_empty());
    }

    #[test]
    fn test_failure_carries_backend_message() {
        let envelope: ApiResponse<Value> =
            serde_json::from_value(json!({"success": false, "data": null, "message": "Not allowed"}))
                .unwrap();
        let err = envelope.into_data().unwrap_err();
        assert!(matches!(err, DashboardError::Application { .. }));
        assert_eq!(err.message(), "Not allowed");
    }

    #[test]
    fn test_failure_without_message_uses_default() {
        let envelope: ApiResponse<Value> =
            serde_json::from_value(json!({"success": false})).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.message(), crate::error::DEFAULT_APPLICATION_MESSAGE);
    }

    #[test]
    fn test_success_with_null_data_is_an_error() {
        let envelope: ApiResponse<Value> =
            serde_json::from_value(json!({"success": true, "data": null})).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.message(), "No data returned");
    }

    #[test]
    fn test_from_body_requires_success_flag() {
        assert!(ApiResponse::from_body(br#"{"success": true, "data": []}"#).is_some());
        assert!(ApiResponse::from_body(br#"{"error": "bad gateway"}"#).is_none());
        assert!(ApiResponse::from_body(b"<html>502</html>").is_none());
        assert!(ApiResponse::from_body(br#"{"success": "yes"}"#).is_none());
    }

    #[test]
    fn test_decode_records_skips_malformed_items() {
        #[derive(Deserialize)]
        struct Row {
            id: u32,
        }
        let rows: Vec<Row> =
            decode_records(json!([{"id": 1}, {"id": "x"}, {"id": 3}]), "test").unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_decode_records_rejects_non_array() {
        let result: DashboardResult<Vec<Value>> = decode_records(json!({"id": 1}), "test");
        assert!(matches!(result, Err(DashboardError::Decode { .. })));
    }

    #[test]
    fn test_raw_records() {
        assert_eq!(raw_records(json!([1, 2])).len(), 2);
        assert!(raw_records(Value::Null).is_empty());
        assert!(raw_records(json!({"a": 1})).is_empty());
    }
}
