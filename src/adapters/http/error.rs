//! Standard JSON error body shared by handlers and middleware.

use serde::Serialize;

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn invalid_host(host: &str) -> Self {
        Self {
            code: "INVALID_HOST".to_string(),
            message: format!("Invalid host header: {}", host),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_omits_empty_details() {
        let json = serde_json::to_value(ErrorResponse::bad_request("nope")).unwrap();

        assert_eq!(json["code"], "BAD_REQUEST");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn details_are_serialized_when_present() {
        let json = serde_json::to_value(
            ErrorResponse::internal("boom").with_details(serde_json::json!({ "id": 1 })),
        )
        .unwrap();

        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["details"]["id"], 1);
    }
}
