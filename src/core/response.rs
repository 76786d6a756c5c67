//! Decoded batch response tree

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A header line of an embedded response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub name: String,
    pub value: String,
}

/// One embedded HTTP response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseLeaf {
    /// e.g. `HTTP/1.1 201 Created`
    pub status_line: String,
    pub headers: Vec<ResponseHeader>,
    /// JSON body with the `d`/`results` envelope removed, `null` when empty
    pub body: Value,
}

impl ResponseLeaf {
    /// Numeric status code parsed from the status line
    pub fn status_code(&self) -> Option<u16> {
        self.status_line
            .split_whitespace()
            .nth(1)
            .and_then(|code| code.parse().ok())
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status_code(), Some(200..=299))
    }

    /// First header with `name`, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// Node of the decoded response tree
///
/// The shape mirrors the request envelope: a plain request decodes to a
/// `Leaf`, a changeset to a `Changeset` of leaves. Fragments the decoder
/// cannot classify decode to `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsedResponse {
    Leaf(ResponseLeaf),
    Changeset(Vec<ParsedResponse>),
    Empty,
}

impl ParsedResponse {
    pub fn as_leaf(&self) -> Option<&ResponseLeaf> {
        match self {
            ParsedResponse::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_changeset(&self) -> Option<&[ParsedResponse]> {
        match self {
            ParsedResponse::Changeset(parts) => Some(parts),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ParsedResponse::Empty)
    }

    /// Leaf body, if this node is a leaf
    pub fn body(&self) -> Option<&Value> {
        self.as_leaf().map(|leaf| &leaf.body)
    }
}
