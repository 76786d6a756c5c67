//! Integration tests for odata-batch-rs
//!
//! These tests run the clients against a local mock service over real HTTP.

pub mod auth_session_tests;
pub mod config_file_tests;
pub mod non_blocking_client_tests;
