//! Query value escaping
//!
//! Mirrors the form-style escaping OData services expect in `$filter`,
//! `$select` and friends: ASCII alphanumerics and `-_.!*()` pass through,
//! everything else is percent-encoded (space becomes `%20`).

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query option value
pub fn url_encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}
