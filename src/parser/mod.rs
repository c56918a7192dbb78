//! Google Books response parsing and normalization.

pub mod volumes;
