//! Request/response encoding for the `batchexecute` translate RPC.
//!
//! The endpoint takes a JSON array whose payload is itself JSON text, wrapped
//! in a single form field. Replies bury the translation inside a second JSON
//! document at a fixed index path. Every step below checks the shape before
//! indexing, so an endpoint change surfaces as a [`CodecError`].

use serde_json::Value;
use thiserror::Error;

use super::client::TranslationRequest;

/// Remote procedure selected by the request. Opaque, must not change.
pub const RPC_ID: &str = "MkEWBc";

/// Form field carrying the encoded request.
pub const FORM_FIELD: &str = "f.req";

/// Content type the endpoint expects for the form body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=utf-8";

const RESPONSE_MARKER: &[u8] = b"[[";

/// Index path from the decoded payload down to the fragment list.
const FRAGMENTS_PATH: [usize; 4] = [1, 0, 0, 5];

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode request JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to encode request form: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),

    #[error("could not find start of JSON array in response:\n{body}")]
    MissingMarker { body: String },

    #[error("invalid JSON in response {stage}: {source}")]
    InvalidJson {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing element at {path} of response")]
    MissingElement { path: String },

    #[error("expected {expected} at {path} of response (got {found})")]
    UnexpectedType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Builds the `f.req=...` form body for one segment.
pub fn encode_request(request: &TranslationRequest) -> Result<String, CodecError> {
    let payload = serde_json::to_string(&(
        (
            request.text.as_str(),
            request.source_lang.as_str(),
            request.target_lang.as_str(),
            true,
        ),
        [None::<()>],
    ))?;

    let envelope = serde_json::to_string(&[[(RPC_ID, payload.as_str(), None::<()>, "generic")]])?;

    Ok(serde_urlencoded::to_string([(FORM_FIELD, envelope.as_str())].as_slice())?)
}

/// Extracts the translated text from a raw response body.
///
/// The result always ends with exactly one trailing newline.
pub fn decode_response(body: &[u8]) -> Result<String, CodecError> {
    let start = body
        .windows(RESPONSE_MARKER.len())
        .position(|w| w == RESPONSE_MARKER)
        .ok_or_else(|| CodecError::MissingMarker {
            body: String::from_utf8_lossy(body).into_owned(),
        })?;

    // The body carries several length-prefixed chunks; only the first array matters.
    let envelope: Vec<Vec<Value>> = serde_json::Deserializer::from_slice(&body[start..])
        .into_iter::<Vec<Vec<Value>>>()
        .next()
        .transpose()
        .map_err(|source| CodecError::InvalidJson {
            stage: "envelope",
            source,
        })?
        .unwrap_or_default();

    let raw = envelope
        .first()
        .and_then(|row| row.get(2))
        .ok_or_else(|| CodecError::MissingElement {
            path: "[0][2]".to_string(),
        })?;
    let raw = raw.as_str().ok_or_else(|| CodecError::UnexpectedType {
        path: "[0][2]".to_string(),
        expected: "string",
        found: type_name(raw),
    })?;

    let payload: Value = serde_json::from_str(raw).map_err(|source| CodecError::InvalidJson {
        stage: "payload",
        source,
    })?;

    let mut path = String::from("payload");
    let mut node = &payload;
    for index in FRAGMENTS_PATH {
        let items = expect_array(node, &path)?;
        path.push_str(&format!("[{index}]"));
        node = items
            .get(index)
            .ok_or_else(|| CodecError::MissingElement { path: path.clone() })?;
    }

    let mut translated = String::new();
    for (i, fragment) in expect_array(node, &path)?.iter().enumerate() {
        let fragment_path = format!("{path}[{i}]");
        let text = expect_array(fragment, &fragment_path)?
            .first()
            .ok_or_else(|| CodecError::MissingElement {
                path: format!("{fragment_path}[0]"),
            })?;
        let text = text.as_str().ok_or_else(|| CodecError::UnexpectedType {
            path: format!("{fragment_path}[0]"),
            expected: "string",
            found: type_name(text),
        })?;
        translated.push_str(text);
    }

    if !translated.ends_with('\n') {
        translated.push('\n');
    }

    Ok(translated)
}

fn expect_array<'v>(value: &'v Value, path: &str) -> Result<&'v Vec<Value>, CodecError> {
    value.as_array().ok_or_else(|| CodecError::UnexpectedType {
        path: path.to_string(),
        expected: "array",
        found: type_name(value),
    })
}

const fn type_name(value: &Value) -> &'static str {
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
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Wraps `fragments` the way the endpoint does.
    pub(crate) fn response_body(fragments: &Value) -> String {
        let payload = json!([null, [[[null, null, null, null, null, fragments]]]]);
        let envelope = json!([["wrb.fr", RPC_ID, payload.to_string(), null, null, null, "generic"]]);
        format!(")]}}'\n\n{}\n{envelope}\n58\n[[\"di\",17],[\"af.httprm\",16,\"-1\",3]]\n", envelope.to_string().len())
    }

    fn request(text: &str, source: &str, target: &str) -> TranslationRequest {
        TranslationRequest::new(text, source, target)
    }

    fn form_value(body: &str) -> String {
        let fields: Vec<(String, String)> = serde_urlencoded::from_str(body).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, FORM_FIELD);
        fields[0].1.clone()
    }

    #[test]
    fn test_encode_request_wire_shape() {
        let body = encode_request(&request("Hello", "en", "fr")).unwrap();

        assert!(body.starts_with("f.req="));
        assert_eq!(
            form_value(&body),
            r#"[[["MkEWBc","[[\"Hello\",\"en\",\"fr\",true],[null]]",null,"generic"]]]"#
        );
    }

    #[test]
    fn test_encode_request_autodetect_and_escaping() {
        let body = encode_request(&request("a \"quoted\" line\n&more", "", "ja")).unwrap();
        let envelope: Value = serde_json::from_str(&form_value(&body)).unwrap();

        let payload: Value = serde_json::from_str(envelope[0][0][1].as_str().unwrap()).unwrap();
        assert_eq!(payload, json!([["a \"quoted\" line\n&more", "", "ja", true], [null]]));
        assert!(!body.contains('&'));
    }

    #[test]
    fn test_decode_concatenates_fragments_and_appends_newline() {
        let body = response_body(&json!([["He", null], ["llo", null, []]]));
        assert_eq!(decode_response(body.as_bytes()).unwrap(), "Hello\n");
    }

    #[test]
    fn test_decode_keeps_existing_trailing_newline() {
        let body = response_body(&json!([["Bonjour\n"], ["le monde\n"]]));
        assert_eq!(decode_response(body.as_bytes()).unwrap(), "Bonjour\nle monde\n");
    }

    #[test]
    fn test_decode_empty_fragment_list() {
        let body = response_body(&json!([]));
        assert_eq!(decode_response(body.as_bytes()).unwrap(), "\n");
    }

    #[test]
    fn test_decode_missing_marker() {
        let err = decode_response(b"<html><body>Error 400</body></html>").unwrap_err();
        assert!(matches!(err, CodecError::MissingMarker { ref body } if body.contains("Error 400")));
    }

    #[test]
    fn test_decode_invalid_envelope() {
        let err = decode_response(b")]}'\n[[\"wrb.fr\", oops").unwrap_err();
        assert!(matches!(err, CodecError::InvalidJson { stage: "envelope", .. }));
    }

    #[test]
    fn test_decode_number_at_payload_position() {
        let err = decode_response(br#"[["wrb.fr","MkEWBc",42]]"#).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnexpectedType { expected: "string", found: "number", .. }
        ));
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_decode_short_envelope() {
        let err = decode_response(br#"[["wrb.fr","MkEWBc"]]"#).unwrap_err();
        assert!(matches!(err, CodecError::MissingElement { ref path } if path == "[0][2]"));
    }

    #[test]
    fn test_decode_payload_not_json() {
        let err = decode_response(br#"[["wrb.fr","MkEWBc","not json"]]"#).unwrap_err();
        assert!(matches!(err, CodecError::InvalidJson { stage: "payload", .. }));
    }

    #[test]
    fn test_decode_payload_path_too_short() {
        let payload = json!([null, [[[null, null]]]]).to_string();
        let body = json!([["wrb.fr", RPC_ID, payload]]).to_string();

        let err = decode_response(body.as_bytes()).unwrap_err();
        assert!(matches!(err, CodecError::MissingElement { ref path } if path == "payload[1][0][0][5]"));
    }

    #[test]
    fn test_decode_payload_path_wrong_type() {
        let payload = json!([null, {"unexpected": true}]).to_string();
        let body = json!([["wrb.fr", RPC_ID, payload]]).to_string();

        let err = decode_response(body.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnexpectedType { ref path, found: "object", .. } if path == "payload[1]"
        ));
    }

    #[test]
    fn test_decode_fragment_text_not_string() {
        let body = response_body(&json!([["ok"], [7]]));

        let err = decode_response(body.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnexpectedType { ref path, found: "number", .. }
                if path == "payload[1][0][0][5][1][0]"
        ));
    }
}
