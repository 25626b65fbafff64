//! Parameter resolution shared by every action.
//!
//! One precedence rule for all modes: a message value that is present,
//! type-valid and non-empty wins; otherwise the node's static value is used;
//! a required parameter with neither fails with `MissingParameter`.

use serde_json::Value;

use crate::{IgcError, Result, connection::REST_ROOT};

/// Trimmed value, or `None` when blank.
fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Resolve an optional string parameter.
pub fn string(
    msg: Option<&str>,
    fallback: Option<&str>,
) -> Option<String> {
    non_empty(msg).or_else(|| non_empty(fallback))
}

/// Resolve a required string parameter.
pub fn required_string(
    name: &str,
    msg: Option<&str>,
    fallback: Option<&str>,
) -> Result<String> {
    string(msg, fallback).ok_or_else(|| IgcError::MissingParameter(name.to_string()))
}

/// Parse a JSON object out of a string field.
pub fn parse_document(
    name: &str,
    text: &str,
) -> Result<Value> {
    let value: Value = serde_json::from_str(text).map_err(|e| IgcError::Parse(format!("'{}' is not valid JSON: {}", name, e)))?;
    if !value.is_object() {
        return Err(IgcError::Parse(format!("'{}' must be a JSON object", name)));
    }
    Ok(value)
}

/// An object is used as is, a non-empty string is parsed; anything else is
/// treated as absent.
fn document_value(
    name: &str,
    value: Option<&Value>,
) -> Result<Option<Value>> {
    match value {
        Some(v @ Value::Object(_)) => Ok(Some(v.clone())),
        Some(Value::String(text)) if !text.trim().is_empty() => parse_document(name, text).map(Some),
        _ => Ok(None),
    }
}

/// Resolve a structured document. A malformed message value fails the
/// resolution rather than falling back.
pub fn document(
    name: &str,
    msg: Option<&Value>,
    fallback: Option<&Value>,
) -> Result<Option<Value>> {
    if let Some(doc) = document_value(name, msg)? {
        return Ok(Some(doc));
    }
    document_value(name, fallback)
}

pub fn required_document(
    name: &str,
    msg: Option<&Value>,
    fallback: Option<&Value>,
) -> Result<Value> {
    document(name, msg, fallback)?.ok_or_else(|| IgcError::MissingParameter(name.to_string()))
}

/// Split a comma-separated property list, dropping blank entries.
pub fn split_properties(list: &str) -> Vec<String> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Resolve the property list. A message sequence wins even when empty; blank
/// entries are dropped either way.
pub fn properties(
    msg: Option<&[String]>,
    fallback: Option<&str>,
) -> Vec<String> {
    match msg {
        Some(list) => list.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).map(str::to_string).collect(),
        None => fallback.map(split_properties).unwrap_or_default(),
    }
}

/// Reduce a URL to the host-rooted API path handed to the REST client.
///
/// Anything before the fixed REST root is dropped. Without the root, an
/// `http(s)` URL loses its scheme and authority and other values become
/// host-rooted. The query string is kept.
pub fn normalize_url(raw: &str) -> Result<String> {
    let raw = raw.trim();

    if let Some(idx) = raw.find(REST_ROOT) {
        return Ok(raw[idx..].to_string());
    }

    if has_http_scheme(raw) {
        let url = reqwest::Url::parse(raw).map_err(|e| IgcError::Parse(format!("invalid url '{}': {}", raw, e)))?;
        return Ok(match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        });
    }

    if raw.starts_with('/') {
        Ok(raw.to_string())
    } else {
        Ok(format!("/{}", raw))
    }
}

fn has_http_scheme(raw: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| raw.get(..scheme.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme)))
}
