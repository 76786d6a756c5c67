//! Utility modules for the OData client
//!
//! - **error**: Error type and result alias shared by every module
//! - **encoding**: Query value escaping

pub mod encoding;
pub mod error;

pub use encoding::url_encode;
pub use error::{ODataError, Result};
