//! External book lookup: Google Books proxy with caching.

pub mod error;
pub mod lookup;
pub mod record;
pub mod transport;

use crate::books::lookup::BookLookupService;
use crate::books::transport::ReqwestTransport;
use crate::cache::book_cache::MemoryBookCache;

/// The production wiring: reqwest upstream, in-process cache.
pub type GoogleBooksLookup = BookLookupService<ReqwestTransport, MemoryBookCache>;
