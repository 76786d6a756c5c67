//! `$batch` response decoding
//!
//! The decoder walks the multipart response recursively. Every fragment is
//! classified by its own `Content-Type`:
//!
//! - `application/http` is an embedded response and becomes a leaf
//! - `multipart/mixed; boundary=X` is a changeset and is split on `--X`
//! - anything else is absorbed as [`ParsedResponse::Empty`]
//!
//! The same procedure handles the outer batch and nested changesets, so the
//! decoded tree has the shape of the request envelope.

use super::response::{ParsedResponse, ResponseHeader, ResponseLeaf};
use crate::utils::error::Result;
use serde_json::Value;
use tracing::{debug, warn};

/// Stateless decoder for batch response bodies
pub struct ResponseDecoder;

impl ResponseDecoder {
    /// Decode a complete batch response body
    ///
    /// The first line of the body is taken as the batch delimiter.
    pub fn decode(raw: &str) -> Result<Vec<ParsedResponse>> {
        let normalized = normalize_newlines(raw);
        let normalized = normalized.trim_start();

        let delimiter = match normalized.lines().next() {
            Some(line) if !line.trim().is_empty() => line.trim_end(),
            _ => {
                debug!("Batch response is empty");
                return Ok(Vec::new());
            }
        };

        normalized
            .split(delimiter)
            .filter(|fragment| {
                let fragment = fragment.trim();
                !fragment.is_empty() && fragment != "--"
            })
            .map(Self::decode_part)
            .collect()
    }

    /// Decode one multipart fragment, dispatching on its `Content-Type`
    pub fn decode_part(fragment: &str) -> Result<ParsedResponse> {
        let fragment = fragment.trim_start();

        let Some(content_type) = part_content_type(fragment) else {
            warn!("Batch fragment has no Content-Type, skipping");
            return Ok(ParsedResponse::Empty);
        };
        let media_type = content_type.to_ascii_lowercase();

        if media_type.starts_with("application/http") {
            return Self::decode_leaf(fragment);
        }

        if media_type.starts_with("multipart/mixed") {
            return match boundary_parameter(content_type) {
                Some(boundary) => Self::decode_changeset(fragment, boundary),
                None => {
                    debug!("multipart/mixed fragment without boundary, skipping");
                    Ok(ParsedResponse::Empty)
                }
            };
        }

        warn!("Unrecognized batch fragment Content-Type: {}", content_type);
        Ok(ParsedResponse::Empty)
    }

    fn decode_leaf(fragment: &str) -> Result<ParsedResponse> {
        // MIME part headers come first; the embedded response follows the blank line
        let Some((_, embedded)) = fragment.split_once("\n\n") else {
            warn!("application/http fragment has no embedded response, skipping");
            return Ok(ParsedResponse::Empty);
        };
        let (head, body) = embedded.split_once("\n\n").unwrap_or((embedded, ""));

        let mut lines = head.lines();
        let status_line = lines.next().unwrap_or_default().trim().to_string();
        let headers = lines.filter_map(parse_header).collect();

        Ok(ParsedResponse::Leaf(ResponseLeaf {
            status_line,
            headers,
            body: decode_json_body(body)?,
        }))
    }

    fn decode_changeset(fragment: &str, boundary: &str) -> Result<ParsedResponse> {
        let delimiter = format!("--{}", boundary);
        let parts: Vec<&str> = fragment.split(delimiter.as_str()).collect();

        // first part is the changeset's own header block, last is the closing `--`
        if parts.len() < 2 {
            return Ok(ParsedResponse::Changeset(Vec::new()));
        }

        parts[1..parts.len() - 1]
            .iter()
            .map(|part| Self::decode_part(part))
            .collect::<Result<Vec<_>>>()
            .map(ParsedResponse::Changeset)
    }
}

/// Decode a JSON body and strip the service's `d` / `results` envelope
///
/// Blank bodies (e.g. `204 No Content`) decode to `null`.
pub fn decode_json_body(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(trimmed)?;
    Ok(unwrap_envelope(value))
}

fn unwrap_envelope(mut value: Value) -> Value {
    for field in ["d", "results"] {
        let inner = value.as_object_mut().and_then(|map| map.remove(field));
        if let Some(inner) = inner {
            value = inner;
        }
    }
    value
}

fn normalize_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

/// Value of the `Content-Type` header in the fragment's leading header block
fn part_content_type(fragment: &str) -> Option<&str> {
    fragment
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.trim())
}

fn boundary_parameter(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|boundary| !boundary.is_empty())
}

fn parse_header(line: &str) -> Option<ResponseHeader> {
    let line = line.trim_end();
    if line.is_empty() {
        return None;
    }
    let (name, value) = line.split_once(": ").or_else(|| line.split_once(':'))?;
    Some(ResponseHeader {
        name: name.trim().to_string(),
        value: value.trim().to_string(),
    })
}
