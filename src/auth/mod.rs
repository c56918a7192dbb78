//! Bearer token issuance and validation (HS256 JWT).

pub mod claims;
pub mod error;
pub mod extractor;
pub mod token_service;
