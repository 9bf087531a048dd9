use bytes::Bytes;
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{HeaderMap, StatusCode};

use crate::models::ResponseId;

/// Represents a response from the simulated endpoint
#[derive(Debug, Clone)]
pub struct ProtocolResponse {
    /// HTTP status code
    pub status: StatusCode,

    /// HTTP headers
    pub headers: HeaderMap,

    /// Response body
    pub body: Bytes,

    /// Canned document that produced the body (if applicable)
    pub response_id: Option<ResponseId>,

    /// Simulated network delay applied before responding, in milliseconds
    pub delay_ms: u64,
}

impl ProtocolResponse {
    /// Create a new ProtocolResponse
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            response_id: None,
            delay_ms: 0,
        }
    }

    /// A `200 OK` document response with explicit content type and length
    pub fn document(content_type: &str, body: Bytes) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            headers.insert(CONTENT_TYPE, value);
        }
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));

        Self::new(StatusCode::OK, headers, body)
    }

    /// Create a new error response
    pub fn error(status: StatusCode, message: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));

        Self::new(status, headers, Bytes::from(message.to_string()))
    }

    /// Set the document identifier for this response
    pub fn with_response_id(mut self, response_id: ResponseId) -> Self {
        self.response_id = Some(response_id);
        self
    }

    /// Set the applied delay for this response
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}
