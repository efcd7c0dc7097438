pub mod slug_cache;

pub use slug_cache::{CacheEntry, CacheEntryView, CacheStats, ClearResult, SlugCache, cache_key};
