//! `$batch` envelope encoding
//!
//! A batch body is a `multipart/mixed` document. Each part is either a single
//! embedded HTTP request or a nested changeset, itself a `multipart/mixed`
//! document with its own boundary. Changesets hold requests only, so they
//! never nest.

use super::request::ODataRequest;
use crate::utils::error::{ODataError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Requests the service applies as one all-or-nothing unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changeset {
    pub requests: Vec<ODataRequest>,
}

impl Changeset {
    pub fn new(requests: Vec<ODataRequest>) -> Self {
        Self { requests }
    }

    pub fn push(&mut self, request: ODataRequest) {
        self.requests.push(request);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Give every request without a content id its position in the changeset
    pub fn assign_content_ids(&mut self) {
        for (i, request) in self.requests.iter_mut().enumerate() {
            if request.content_id.is_none() {
                request.content_id = Some(i.to_string());
            }
        }
    }
}

impl FromIterator<ODataRequest> for Changeset {
    fn from_iter<I: IntoIterator<Item = ODataRequest>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// One top-level part of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchItem {
    Request(ODataRequest),
    Changeset(Changeset),
}

impl BatchItem {
    /// Parse a YAML list of items written as `- request: ...` / `- changeset: ...`
    pub fn list_from_yaml(text: &str) -> Result<Vec<BatchItem>> {
        serde_yaml::with::singleton_map_recursive::deserialize(serde_yaml::Deserializer::from_str(
            text,
        ))
        .map_err(|e| ODataError::Config(format!("Invalid batch items: {}", e)))
    }
}

impl From<ODataRequest> for BatchItem {
    fn from(request: ODataRequest) -> Self {
        BatchItem::Request(request)
    }
}

impl From<Changeset> for BatchItem {
    fn from(changeset: Changeset) -> Self {
        BatchItem::Changeset(changeset)
    }
}

/// Which envelope a boundary delimits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Batch,
    Changeset,
}

impl BoundaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryKind::Batch => "batch",
            BoundaryKind::Changeset => "changeset",
        }
    }

    /// A fresh `<kind>_<uuid>` boundary token
    pub fn fresh_boundary(&self) -> String {
        format!("{}_{}", self.as_str(), Uuid::new_v4())
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A multipart body and the boundary that frames it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub body: String,
    pub boundary: String,
}

impl EncodedBody {
    /// `Content-Type` header value announcing this body
    pub fn content_type(&self) -> String {
        format!("multipart/mixed; boundary={}", self.boundary)
    }
}

/// Stateless encoder for batch and changeset envelopes
pub struct BatchEncoder;

impl BatchEncoder {
    /// Give requests inside changesets their positional content ids
    ///
    /// Ids already set by the caller are left alone.
    pub fn assign_content_ids(items: &mut [BatchItem]) {
        for item in items.iter_mut() {
            if let BatchItem::Changeset(changeset) = item {
                changeset.assign_content_ids();
            }
        }
    }

    /// Encode a full batch body
    ///
    /// Requests inside changesets that lack a content id receive one first;
    /// the caller's items are updated in place.
    pub fn encode_batch(items: &mut [BatchItem]) -> EncodedBody {
        Self::assign_content_ids(items);
        let parts = items.iter().map(Self::wrap_item);
        Self::encode(BoundaryKind::Batch, parts)
    }

    /// Encode a changeset body with its own boundary
    pub fn encode_changeset(changeset: &Changeset) -> EncodedBody {
        let parts = changeset.requests.iter().map(Self::wrap_request);
        Self::encode(BoundaryKind::Changeset, parts)
    }

    /// Frame already-wrapped parts under a fresh boundary of `kind`
    pub fn encode<I>(kind: BoundaryKind, parts: I) -> EncodedBody
    where
        I: IntoIterator<Item = String>,
    {
        let boundary = kind.fresh_boundary();
        let delimiter = format!("--{}", boundary);

        let mut body = String::new();
        for part in parts {
            body.push_str(&delimiter);
            body.push('\n');
            body.push_str(&part);
        }
        body.push_str(&delimiter);
        body.push_str("--");

        EncodedBody { body, boundary }
    }

    fn wrap_item(item: &BatchItem) -> String {
        match item {
            BatchItem::Request(request) => Self::wrap_request(request),
            BatchItem::Changeset(changeset) => Self::wrap_changeset(changeset),
        }
    }

    fn wrap_request(request: &ODataRequest) -> String {
        format!(
            "Content-Type: application/http\nContent-Transfer-Encoding: binary\n\n{}\n\n",
            request.serialize()
        )
    }

    fn wrap_changeset(changeset: &Changeset) -> String {
        let nested = Self::encode_changeset(changeset);
        format!("Content-Type: {}\n\n{}\n", nested.content_type(), nested.body)
    }
}
