//! Envelope construction for completed upstream fetches.
//!
//! Decides whether the upstream body is JSON or text and wraps it, together
//! with the echoed request details, into a `ResultEnvelope`.

use super::types::*;
use reqwest::header::CONTENT_TYPE;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Classifies a raw body as decoded JSON or plain text.
///
/// Decoding failure is not an error; the body is returned as lossy UTF-8 text
/// instead. An empty body is text.
pub fn classify_body(raw: &[u8]) -> Body {
    let candidate = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);

    match serde_json::from_slice::<serde_json::Value>(candidate) {
        Ok(value) => Body::Structured(value),
        Err(_) => Body::Text(String::from_utf8_lossy(raw).into_owned()),
    }
}

/// Builds the envelope for a completed fetch.
///
/// The upstream status code is passed through verbatim, so a 404 or 500 from
/// the target still produces a successful envelope.
pub fn build_envelope(url: &str, response: UpstreamResponse) -> ResultEnvelope {
    let content_type = response
        .header(CONTENT_TYPE)
        .unwrap_or(UNKNOWN_CONTENT_TYPE)
        .to_string();
    let size = response.body.len();
    let data = classify_body(&response.body);

    let note = if data.is_structured() {
        None
    } else {
        tracing::warn!(url = %url, "Upstream body is not JSON, returning as text");
        Some(TEXT_FALLBACK_NOTE.to_string())
    };

    ResultEnvelope {
        success: true,
        status_code: response.status,
        data,
        metadata: Metadata {
            url: url.to_string(),
            content_type,
            size,
            note,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};
    use serde_json::json;

    fn upstream(status: u16, content_type: Option<&'static str>, body: &[u8]) -> UpstreamResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        UpstreamResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_classify_json_object() {
        assert_eq!(
            classify_body(br#"{"id":1,"title":"foo"}"#),
            Body::Structured(json!({"id": 1, "title": "foo"}))
        );
    }

    #[test]
    fn test_classify_json_scalar() {
        assert_eq!(classify_body(b"42"), Body::Structured(json!(42)));
    }

    #[test]
    fn test_classify_keeps_large_integers_exact() {
        let body = classify_body(br#"{"id":123456789012345678901234567890}"#);
        let rendered = serde_json::to_string(&body).unwrap();
        assert_eq!(rendered, r#"{"id":123456789012345678901234567890}"#);
    }

    #[test]
    fn test_classify_plain_text() {
        assert_eq!(classify_body(b"hello"), Body::Text("hello".to_string()));
    }

    #[test]
    fn test_classify_empty_body_is_text() {
        assert_eq!(classify_body(b""), Body::Text(String::new()));
    }

    #[test]
    fn test_classify_ignores_bom() {
        assert_eq!(
            classify_body(b"\xEF\xBB\xBF{\"ok\":true}"),
            Body::Structured(json!({"ok": true}))
        );
    }

    #[test]
    fn test_classify_invalid_utf8_is_lossy_text() {
        match classify_body(b"caf\xFF") {
            Body::Text(text) => assert_eq!(text, "caf\u{FFFD}"),
            other => panic!("expected text body, got {:?}", other),
        }
    }

    #[test]
    fn test_json_envelope_has_no_note() {
        let body = br#"{"id":1,"title":"foo"}"#;
        let envelope = build_envelope(
            "http://upstream/posts/1",
            upstream(200, Some("application/json"), body),
        );

        assert!(envelope.success);
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.data, Body::Structured(json!({"id": 1, "title": "foo"})));
        assert_eq!(envelope.metadata.url, "http://upstream/posts/1");
        assert_eq!(envelope.metadata.content_type, "application/json");
        assert_eq!(envelope.metadata.size, body.len());
        assert_eq!(envelope.metadata.note, None);
    }

    #[test]
    fn test_text_envelope_has_note() {
        let envelope = build_envelope("http://upstream/", upstream(200, Some("text/plain"), b"hello"));

        assert_eq!(envelope.data, Body::Text("hello".to_string()));
        assert_eq!(envelope.metadata.note.as_deref(), Some(TEXT_FALLBACK_NOTE));
        assert_eq!(envelope.metadata.size, 5);
    }

    #[test]
    fn test_upstream_error_status_passes_through() {
        let envelope = build_envelope(
            "http://upstream/missing",
            upstream(404, Some("application/json"), br#"{"error":"not found"}"#),
        );

        assert!(envelope.success);
        assert_eq!(envelope.status_code, 404);
        assert_eq!(envelope.data, Body::Structured(json!({"error": "not found"})));
    }

    #[test]
    fn test_missing_content_type_is_unknown() {
        let envelope = build_envelope("http://upstream/", upstream(200, None, b"{}"));
        assert_eq!(envelope.metadata.content_type, UNKNOWN_CONTENT_TYPE);
    }

    #[test]
    fn test_size_counts_raw_bytes() {
        let body = "héllo".as_bytes();
        let envelope = build_envelope("http://upstream/", upstream(500, Some("text/plain"), body));
        assert_eq!(envelope.metadata.size, 6);
        assert_eq!(envelope.status_code, 500);
    }
}
