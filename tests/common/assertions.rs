//! Custom test assertions
//!
//! Assertions over decoded response trees.

use odata_batch::{ParsedResponse, ResponseLeaf};
use serde_json::Value;

pub trait ParsedResponseAssertions {
    /// Assert this node is a leaf and return it
    fn expect_leaf(&self) -> &ResponseLeaf;

    /// Assert this node is a changeset of `len` parts and return them
    fn expect_changeset(&self, len: usize) -> &[ParsedResponse];
}

impl ParsedResponseAssertions for ParsedResponse {
    fn expect_leaf(&self) -> &ResponseLeaf {
        match self.as_leaf() {
            Some(leaf) => leaf,
            None => panic!("Expected a leaf response, got {:?}", self),
        }
    }

    fn expect_changeset(&self, len: usize) -> &[ParsedResponse] {
        let parts = match self.as_changeset() {
            Some(parts) => parts,
            None => panic!("Expected a changeset response, got {:?}", self),
        };
        assert_eq!(
            parts.len(),
            len,
            "Expected changeset of {} parts, got {}",
            len,
            parts.len()
        );
        parts
    }
}

/// Assert a leaf carries `status` and the given object id
pub fn assert_entity(leaf: &ResponseLeaf, status: u16, object_id: &str) {
    assert_eq!(leaf.status_code(), Some(status), "status of {:?}", leaf);
    assert_eq!(
        leaf.body.get("ObjectID").and_then(Value::as_str),
        Some(object_id),
        "ObjectID of {:?}",
        leaf
    );
}
