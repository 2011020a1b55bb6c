//! The JSON envelope shared by every endpoint.
//!
//! ```json
//! { "success": true, "message": "Enrollments retrieved successfully.", "total": 2, "data": [...] }
//! ```

use serde::Serialize;
use utoipa::ToSchema;

/// Successful response carrying a payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    /// Number of items in `data` for list endpoints, or the total across pages
    /// for paginated ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            total: None,
            data: Some(data),
        }
    }

    pub fn with_total(mut self, total: i64) -> Self {
        self.total = Some(total);
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// List response whose `total` is the number of returned items.
    pub fn list(message: impl Into<String>, data: Vec<T>) -> Self {
        let total = data.len() as i64;
        Self::ok(message, data).with_total(total)
    }
}

/// Response without a payload: deletions, logouts and every error.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok("Course retrieved.", 42)).unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Course retrieved.");
        assert_eq!(body["data"], 42);
        assert!(body.get("total").is_none());
    }

    #[test]
    fn test_list_sets_total_from_len() {
        let body = serde_json::to_value(ApiResponse::list("ok", vec!["a", "b", "c"])).unwrap();
        assert_eq!(body["total"], 3);
    }

    #[test]
    fn test_with_total_overrides_len() {
        let response = ApiResponse::list("ok", vec![1, 2]).with_total(40);
        assert_eq!(response.total, Some(40));
    }

    #[test]
    fn test_message_response_omits_empty_error() {
        let body = serde_json::to_value(MessageResponse::success("Deleted.")).unwrap();
        assert_eq!(body["success"], true);
        assert!(body.get("error").is_none());
        assert!(body.get("data").is_none());
    }
}
