//! Persistence Layer
//!
//! Item caches for transactions and prices, keyed by (network, timestamp).
//!
//! # Backends
//! - [`memory_cache::MemoryItemCache`]: in-process, used by tests and short runs
//! - [`json_cache::JsonItemCache`]: one JSON file per network, survives restarts
//!
//! # Layout on disk
//!
//! ```text
//! <cache_path>/
//!   transactions/<network>.json
//!   prices/<network>.json
//! ```

pub mod json_cache;
pub mod memory_cache;
