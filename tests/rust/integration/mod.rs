//! Integration tests - drive the HTTP router against an in-memory datastore
//!
//! These tests exercise routing, pagination and error translation without a
//! running Neo4j instance.

mod api_tests;
mod support;
