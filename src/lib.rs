//! Codelist Graph - read-only API over code lists stored in Neo4j
//!
//! This crate exposes hierarchical reference data through:
//! - A generic graph query executor with single and multi result modes
//! - Typed extraction of node and relationship properties
//! - Result mappers projecting rows into code lists, editions and codes
//! - Datastore operations with existence pre-checks
//! - A thin paginated JSON API on axum

pub mod config;
pub mod graph;
pub mod models;
pub mod server;
pub mod store;
