//! Authentication against the OData service
//!
//! Basic-auth credentials plus the CSRF token handshake.

pub mod session;

pub use session::{AuthSession, CSRF_TOKEN_HEADER, basic_authorization};
