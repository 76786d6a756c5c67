//! Response fixtures and request factories
//!
//! Response bodies use CRLF line endings, as the service sends them.

use odata_batch::{BatchItem, Changeset, ODataRequest};

pub const RESPONSE_BOUNDARY: &str = "batchresponse_5e1b";
pub const CHANGESET_BOUNDARY: &str = "changesetresponse_77c0";

/// One `application/http` part holding `status` and `body`
pub fn http_part(status: &str, body: &str) -> String {
    let mut part = String::from(
        "Content-Type: application/http\r\nContent-Transfer-Encoding: binary\r\n\r\n",
    );
    part.push_str(&format!("HTTP/1.1 {}\r\n", status));
    if body.is_empty() {
        part.push_str("Content-Length: 0\r\n\r\n");
    } else {
        part.push_str("Content-Type: application/json\r\n\r\n");
        part.push_str(body);
        part.push_str("\r\n");
    }
    part
}

/// A changeset part wrapping `parts`
pub fn changeset_part(parts: &[String]) -> String {
    let mut part = format!(
        "Content-Type: multipart/mixed; boundary={}\r\n\r\n",
        CHANGESET_BOUNDARY
    );
    for inner in parts {
        part.push_str(&format!("--{}\r\n{}", CHANGESET_BOUNDARY, inner));
    }
    part.push_str(&format!("--{}--\r\n", CHANGESET_BOUNDARY));
    part
}

/// A complete batch response made of `parts`
pub fn batch_response(parts: &[String]) -> String {
    let mut body = String::new();
    for part in parts {
        body.push_str(&format!("--{}\r\n{}", RESPONSE_BOUNDARY, part));
    }
    body.push_str(&format!("--{}--\r\n", RESPONSE_BOUNDARY));
    body
}

/// Body of a single-entity read
pub fn entity(object_id: &str) -> String {
    format!(r#"{{"d":{{"ObjectID":"{}"}}}}"#, object_id)
}

/// Body of a collection read
pub fn collection(object_ids: &[&str]) -> String {
    let rows: Vec<String> = object_ids
        .iter()
        .map(|id| format!(r#"{{"ObjectID":"{}"}}"#, id))
        .collect();
    format!(r#"{{"d":{{"results":[{}]}}}}"#, rows.join(","))
}

/// Factory for batch items
pub struct BatchFactory;

impl BatchFactory {
    /// `n` top-level reads of `ContactCollection`
    pub fn reads(n: usize) -> Vec<BatchItem> {
        (0..n)
            .map(|i| {
                BatchItem::from(
                    ODataRequest::get("ContactCollection")
                        .query("skip", i.to_string())
                        .query("top", "1"),
                )
            })
            .collect()
    }

    /// A read followed by a changeset of two creates without content ids
    pub fn read_then_changeset() -> Vec<BatchItem> {
        vec![
            BatchItem::from(ODataRequest::get("AccountCollection").query("top", "1")),
            BatchItem::from(Changeset::new(vec![
                ODataRequest::post("ContactCollection").body(r#"{"FirstName":"Ada"}"#),
                ODataRequest::post("ContactCollection").body(r#"{"FirstName":"Grace"}"#),
            ])),
        ]
    }
}
