pub mod book_cache;
