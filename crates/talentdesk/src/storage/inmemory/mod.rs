//! In-memory storage backend for tests and local development.
//!
//! Stores every entity in a `HashMap` wrapped in `Arc<RwLock<_>>`. Writes that
//! check a version hold the write lock for the whole read-check-write, so they
//! are atomic with respect to each other. Nothing is persisted.
//!
//! # Example
//!
//! ```rust,ignore
//! use talentdesk::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod paging;
mod repository;

pub use repository::InMemoryRepository;
