/// Failures talking to the annotation server.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response that carried a `detail` message.
    #[error("{detail}")]
    Server { status: u16, detail: String },
    /// Non-2xx response without a usable message.
    #[error("Server returned HTTP {status}")]
    Status { status: u16 },
    /// The request never reached the server or the connection broke.
    #[error("Could not reach server: {0}")]
    Transport(String),
    /// The response body could not be decoded.
    #[error("Invalid server response: {0}")]
    Json(String),
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
    /// Rejected locally before sending.
    #[error("{0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status code when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Status { status } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Build a status error from a response body, keeping the server's detail.
    pub(crate) fn from_status_body(status: u16, body: &str) -> Self {
        match extract_detail(body) {
            Some(detail) => Self::Server { status, detail },
            None => Self::Status { status },
        }
    }
}

/// Pull a readable message out of a `{"detail": ...}` error body.
///
/// Validation errors arrive as a list of objects with `msg` fields.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    let detail = value.get("detail")?;
    let text = match detail {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item.get("msg").and_then(|msg| msg.as_str()) {
                Some(msg) => msg.to_string(),
                None => item.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        serde_json::Value::Null => return None,
        other => other.to_string(),
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_becomes_message() {
        let err = ApiError::from_status_body(404, r#"{"detail": "Dataset path not found: /x"}"#);
        assert_eq!(err.to_string(), "Dataset path not found: /x");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn validation_detail_lists_are_joined() {
        let body = r#"{"detail": [{"loc": ["body", "start"], "msg": "field required"},
                                  {"loc": ["body", "end"], "msg": "value is not a valid float"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; value is not a valid float")
        );
    }

    #[test]
    fn missing_detail_falls_back_to_generic_message() {
        let err = ApiError::from_status_body(502, "<html>Bad gateway</html>");
        assert_eq!(err.to_string(), "Server returned HTTP 502");
        let err = ApiError::from_status_body(500, r#"{"detail": "  "}"#);
        assert!(matches!(err, ApiError::Status { status: 500 }));
    }
}
