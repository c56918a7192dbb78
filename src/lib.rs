//! # Book Gateway Library
//!
//! Bearer tokens for the reading app and a cached proxy in front of the
//! Google Books volumes API.
//!
//! Modules:
//! - `auth` — JWT issuance, validation and the bearer extractor
//! - `books` — normalized book records, upstream transport, lookup service
//! - `cache` — expiring cache for lookup results
//! - `parser` — Google Books response parsing
//! - `config` — YAML service configuration
//! - `server` — axum routes and startup

pub mod auth;
pub mod books;
pub mod cache;
pub mod config;
pub mod helpers;
pub mod observability;
pub mod parser;
pub mod server;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::books::lookup::{BookLookupService, LookupSettings};
pub use crate::books::record::BookRecord;
pub use crate::config::types::ServiceConfig;
