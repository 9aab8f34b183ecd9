//! Price data providers and the in-memory fetch cache.

pub mod cache;
pub mod circuit_breaker;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use cache::{CachedProvider, SeriesCache, SeriesKey};
pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
