use std::time::SystemTime;

use hyper::{Method, Uri};
use uuid::Uuid;

use crate::models::QueryParameters;

/// A request to the simulated OAI-PMH endpoint
#[derive(Debug, Clone)]
pub struct ProtocolRequest {
    /// HTTP method
    pub method: Method,

    /// Request URI
    pub uri: Uri,

    /// Decoded query string parameters
    pub params: QueryParameters,

    /// Request timestamp
    pub timestamp: SystemTime,

    /// Request ID for tracing
    pub request_id: String,
}

impl ProtocolRequest {
    /// Create a new ProtocolRequest
    pub fn new(method: Method, uri: Uri, params: QueryParameters) -> Self {
        Self {
            method,
            uri,
            params,
            timestamp: SystemTime::now(),
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Build a GET request for a path and query, decoding the query string
    pub fn get(path_and_query: &str) -> Result<Self, hyper::http::uri::InvalidUri> {
        let uri: Uri = path_and_query.parse()?;
        let params = parse_query(uri.query());
        Ok(Self::new(Method::GET, uri, params))
    }

    /// Get a query parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Decode an `application/x-www-form-urlencoded` query string.
///
/// Values of a repeated key are joined with `,` in query order, so
/// `verb=Identify&verb=ListSets` yields `Identify,ListSets`.
pub fn parse_query(query: Option<&str>) -> QueryParameters {
    let mut params = QueryParameters::new();

    if let Some(q) = query {
        for (key, value) in form_urlencoded::parse(q.as_bytes()) {
            params
                .entry(key.into_owned())
                .and_modify(|joined: &mut String| {
                    joined.push(',');
                    joined.push_str(&value);
                })
                .or_insert_with(|| value.to_string());
        }
    }

    params
}
