use std::time::Duration;

use tracing::{debug, info, warn};

use crate::books::error::{LookupError, UpstreamError};
use crate::books::record::BookRecord;
use crate::books::transport::{BooksTransport, VolumesRequest};
use crate::cache::book_cache::{BookCache, CachedLookup};
use crate::config::types::{CacheConfig, GoogleBooksConfig};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::parser::volumes::{normalize_isbn, parse_volumes, VolumesResponse};
use crate::utils::constants::ISBN_KEY_PREFIX;

static SEARCH_OP: &str = "search";
static ISBN_OP: &str = "isbn";

/// Request shaping and caching knobs for [`BookLookupService`].
#[derive(Debug, Clone, Default)]
pub struct LookupSettings {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub max_results: Option<u32>,
    pub print_type: Option<String>,
    pub order_by: Option<String>,
    pub timeout: Duration,
    pub cache_ttl: Duration,
}

impl LookupSettings {
    pub fn from_config(books: &GoogleBooksConfig, cache: &CacheConfig) -> Self {
        Self {
            api_key: books.api_key.clone(),
            language: books.language.clone(),
            max_results: books.max_results,
            print_type: books.print_type.clone(),
            order_by: books.order_by.clone(),
            timeout: Duration::from_millis(books.timeout_ms),
            cache_ttl: Duration::from_secs(cache.ttl_seconds),
        }
    }

    fn search_request(&self, query: &str) -> VolumesRequest {
        VolumesRequest {
            query: query.to_owned(),
            api_key: self.api_key.clone(),
            language: self.language.clone(),
            max_results: self.max_results,
            print_type: self.print_type.clone(),
            order_by: self.order_by.clone(),
        }
    }

    fn isbn_request(&self, isbn: &str) -> VolumesRequest {
        VolumesRequest {
            query: isbn_key(isbn),
            api_key: self.api_key.clone(),
            ..VolumesRequest::default()
        }
    }
}

fn isbn_key(isbn: &str) -> String {
    format!("{}{}", ISBN_KEY_PREFIX, isbn)
}

/// Google Books lookups with a read-through cache.
///
/// Search is fail-soft: upstream trouble yields an empty list. ISBN lookup
/// tells apart bad input (`Err`), not found (`Ok(None)`) and a hit.
/// Only normalized records are cached, so cached and fresh answers are equal.
#[derive(Debug, Clone)]
pub struct BookLookupService<T, C> {
    transport: T,
    cache: C,
    settings: LookupSettings,
}

impl<T, C> BookLookupService<T, C>
where
    T: BooksTransport,
    C: BookCache,
{
    pub fn new(transport: T, cache: C, settings: LookupSettings) -> Self {
        Self { transport, cache, settings }
    }

    /// Free-text search. Blank queries return nothing without calling upstream.
    pub async fn search_by_text(&self, query: &str) -> Vec<BookRecord> {
        let query = query.trim();
        if query.is_empty() {
            debug!("blank search query, skipping upstream");
            return Vec::new();
        }

        let metrics = get_metrics().await;
        metrics.lookup_requests.with_label_values(&[SEARCH_OP]).inc();

        if let Some(CachedLookup::Volumes(records)) = self.cache.get(query).await {
            metrics.cache_hits.with_label_values(&[SEARCH_OP]).inc();
            debug!(query, total = records.len(), "search served from cache");
            return records;
        }
        metrics.cache_misses.with_label_values(&[SEARCH_OP]).inc();

        let response = match self.fetch_volumes(SEARCH_OP, self.settings.search_request(query)).await {
            Ok(response) => response,
            Err(err) => {
                warn!(query, error = %err, "search upstream failed, returning no results");
                return Vec::new();
            }
        };

        let records = response.to_records();
        info!(query, total_items = response.total_items, returned = records.len(), "search fetched");
        self.cache
            .set(query, CachedLookup::Volumes(records.clone()), self.settings.cache_ttl)
            .await;
        records
    }

    /// Books by author, `inauthor:<author>`.
    pub async fn search_by_author(&self, author: &str) -> Vec<BookRecord> {
        match author.trim() {
            "" => Vec::new(),
            author => self.search_by_text(&format!("inauthor:{}", author)).await,
        }
    }

    /// Books by subject, `subject:<genre>`.
    pub async fn search_by_genre(&self, genre: &str) -> Vec<BookRecord> {
        match genre.trim() {
            "" => Vec::new(),
            genre => self.search_by_text(&format!("subject:{}", genre)).await,
        }
    }

    /// Exact ISBN lookup. Hyphens and whitespace are ignored.
    pub async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>, LookupError> {
        let isbn = normalize_isbn(isbn);
        if isbn.is_empty() {
            return Err(LookupError::InvalidArgument("isbn must not be empty".to_owned()));
        }

        let metrics = get_metrics().await;
        metrics.lookup_requests.with_label_values(&[ISBN_OP]).inc();

        let key = isbn_key(&isbn);
        if let Some(CachedLookup::Volume(record)) = self.cache.get(&key).await {
            metrics.cache_hits.with_label_values(&[ISBN_OP]).inc();
            debug!(isbn = %isbn, "isbn served from cache");
            return Ok(Some(record));
        }
        metrics.cache_misses.with_label_values(&[ISBN_OP]).inc();

        let response = match self.fetch_volumes(ISBN_OP, self.settings.isbn_request(&isbn)).await {
            Ok(response) => response,
            Err(err) => {
                warn!(isbn = %isbn, error = %err, "isbn upstream failed, treating as not found");
                return Ok(None);
            }
        };

        let Some(record) = response.best_match(&isbn).map(|volume| volume.to_record()) else {
            debug!(isbn = %isbn, "isbn not found upstream");
            return Ok(None);
        };

        info!(isbn = %isbn, title = %record.title, author = ?record.primary_author(), "isbn fetched");
        self.cache
            .set(&key, CachedLookup::Volume(record.clone()), self.settings.cache_ttl)
            .await;
        Ok(Some(record))
    }

    /// One upstream exchange: send, check status, parse. No retries.
    async fn fetch_volumes(
        &self,
        operation: &'static str,
        request: VolumesRequest,
    ) -> Result<VolumesResponse, UpstreamError> {
        let metrics = get_metrics().await;
        let start = get_instant();
        metrics.upstream_requests.with_label_values(&[operation]).inc();

        let result = tokio::time::timeout(self.settings.timeout, self.transport.get_volumes(&request))
            .await
            .map_err(|_| UpstreamError::Timeout(self.settings.timeout))
            .and_then(|sent| sent)
            .and_then(|response| {
                if response.status.is_success() {
                    Ok(response)
                } else {
                    Err(UpstreamError::Status(response.status))
                }
            })
            .and_then(|response| parse_volumes(&response.body).map_err(UpstreamError::from));

        metrics
            .upstream_duration
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            metrics
                .upstream_failures
                .with_label_values(&[operation, err.reason()])
                .inc();
        }
        result
    }
}
