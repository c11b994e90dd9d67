use reqwest::header::{HeaderMap, AsHeaderName};
use serde::Serialize;

/// Note attached to envelopes whose body could not be decoded as JSON.
pub const TEXT_FALLBACK_NOTE: &str = "Returned as text (not JSON)";

/// Content type reported when the upstream sent none.
pub const UNKNOWN_CONTENT_TYPE: &str = "unknown";

/// Raw result of an outbound fetch.
#[derive(Debug, Clone, Default)]
pub struct UpstreamResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    /// Looks up a header by name, case-insensitively.
    ///
    /// When the upstream repeats a header, the last value wins. Values that
    /// are not valid visible ASCII are treated as absent.
    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers
            .get_all(name)
            .iter()
            .last()
            .and_then(|v| v.to_str().ok())
    }
}

/// Response payload, either decoded JSON or the raw text body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Body {
    Structured(serde_json::Value),
    Text(String),
}

impl Body {
    pub fn is_structured(&self) -> bool {
        matches!(self, Body::Structured(_))
    }
}

/// Details about the upstream exchange echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub url: String,
    pub content_type: String,
    /// Byte length of the raw upstream body
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Uniform success payload returned for every completed forward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    pub success: bool,
    pub status_code: u16,
    pub data: Body,
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, CONTENT_TYPE};
    use serde_json::json;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let response = UpstreamResponse {
            status: 200,
            headers,
            body: Vec::new(),
        };

        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn test_header_last_value_wins() {
        let mut headers = HeaderMap::new();
        headers.append(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        headers.append(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let response = UpstreamResponse {
            status: 200,
            headers,
            body: Vec::new(),
        };

        assert_eq!(response.header(CONTENT_TYPE), Some("application/json"));
    }

    #[test]
    fn test_envelope_serialization_shape() {
        let envelope = ResultEnvelope {
            success: true,
            status_code: 200,
            data: Body::Structured(json!({"id": 1})),
            metadata: Metadata {
                url: "http://upstream/posts/1".to_string(),
                content_type: "application/json".to_string(),
                size: 8,
                note: None,
            },
        };

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "status_code": 200,
                "data": {"id": 1},
                "metadata": {
                    "url": "http://upstream/posts/1",
                    "content_type": "application/json",
                    "size": 8
                }
            })
        );
    }

    #[test]
    fn test_text_body_serializes_as_plain_string() {
        let value = serde_json::to_value(Body::Text("hello".to_string())).unwrap();
        assert_eq!(value, json!("hello"));
    }
}
