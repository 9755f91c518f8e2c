//! Deterministic canonical form of an outbound request.
//!
//! JSON requests canonicalize as `METHOD + PATH + body`. Requests with
//! attachments canonicalize as
//! `METHOD + PATH + "\n" + fields + "\n" + sorted file hashes`, where
//! `fields` is the form data flattened, sorted by key at every level and
//! RFC 3986 percent-encoded.

use crate::attachment::HashedFile;
use crate::{Result, SigningError};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Everything except RFC 3986 unreserved characters.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// `/<version>/<endpoint>` with leading slashes of the endpoint dropped.
pub fn canonical_path(version: &str, endpoint: &str) -> String {
    format!("/{}/{}", version, endpoint.trim_start_matches('/'))
}

/// Whether a body carries nothing worth serializing.
pub fn is_empty_body(data: Option<&Value>) -> bool {
    match data {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Copy of `value` with object keys in ascending order at every level.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_keys(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Bytes of a JSON body as it is signed and transmitted, or `None` when
/// the body is empty. Slashes are not escaped.
pub fn json_payload(data: Option<&Value>) -> Result<Option<Vec<u8>>> {
    match data {
        Some(value) if !is_empty_body(Some(value)) => {
            Ok(Some(serde_json::to_vec(&sort_keys(value))?))
        }
        _ => Ok(None),
    }
}

/// Flatten form data into `(key, value)` pairs sorted by key at every
/// nesting level.
///
/// Nested keys use bracket notation (`meta[side]`, `tags[0]`). Keys that are
/// integers sort numerically and ahead of other keys, which sort byte-wise.
/// Scalars are rendered as strings first, so `123` and `"123"` produce the
/// same pair; booleans become `1`/`0`, whole floats drop their `.0` and nulls
/// are dropped.
pub fn form_fields(data: Option<&Value>) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    match data {
        None | Some(Value::Null) => {}
        Some(value @ (Value::Object(_) | Value::Array(_))) => {
            flatten(None, value, &mut pairs);
        }
        Some(other) => {
            return Err(SigningError::InvalidFormData(format!(
                "form data must be an object or array, got {}",
                json_type(other)
            )));
        }
    }
    Ok(pairs)
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut Vec<(String, String)>) {
    let child_key = |key: &str| match prefix {
        Some(p) => format!("{p}[{key}]"),
        None => key.to_string(),
    };

    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_by(|a, b| compare_form_keys(a, b));
            for key in keys {
                flatten(Some(child_key(key).as_str()), &map[key.as_str()], out);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(Some(child_key(&index.to_string()).as_str()), item, out);
            }
        }
        scalar => {
            if let (Some(key), Some(text)) = (prefix, scalar_string(scalar)) {
                out.push((key.to_string(), text));
            }
        }
    }
}

/// Order of form keys within one object.
pub fn compare_form_keys(a: &str, b: &str) -> Ordering {
    match (integer_key(a), integer_key(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.as_bytes().cmp(b.as_bytes()),
    }
}

/// `key` as an integer when it is written in canonical decimal form
/// (`"10"`, `"-3"`; not `"010"`, `"+1"` or `"-0"`).
fn integer_key(key: &str) -> Option<i64> {
    key.parse::<i64>().ok().filter(|n| n.to_string() == key)
}

fn number_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        Value::Number(n) => Some(number_string(n)),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Percent-encode flattened pairs as `k=v&k=v`.
pub fn encode_fields(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, RFC3986),
                utf8_percent_encode(value, RFC3986)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// File digests in ascending order, comma separated.
pub fn file_hash_list(files: &[HashedFile]) -> String {
    let mut hashes: Vec<&str> = files.iter().map(|f| f.sha256.as_str()).collect();
    hashes.sort_unstable();
    hashes.join(",")
}

/// The byte string that gets signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest(Vec<u8>);

impl CanonicalRequest {
    /// `METHOD + PATH + json`.
    pub fn json(method: &str, path: &str, body: Option<&[u8]>) -> Self {
        let mut bytes = request_line(method, path);
        if let Some(body) = body {
            bytes.extend_from_slice(body);
        }
        Self(bytes)
    }

    /// `METHOD + PATH + "\n" + fields + "\n" + hashes`.
    pub fn multipart(
        method: &str,
        path: &str,
        fields: &[(String, String)],
        files: &[HashedFile],
    ) -> Self {
        let mut bytes = request_line(method, path);
        bytes.push(b'\n');
        bytes.extend_from_slice(encode_fields(fields).as_bytes());
        bytes.push(b'\n');
        bytes.extend_from_slice(file_hash_list(files).as_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

fn request_line(method: &str, path: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(method.len() + path.len());
    bytes.extend_from_slice(method.to_ascii_uppercase().as_bytes());
    bytes.extend_from_slice(path.as_bytes());
    bytes
}
