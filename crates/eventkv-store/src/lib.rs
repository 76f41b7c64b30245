//! Document storage for eventkv.
//!
//! The store persists the whole [`Document`](eventkv_core::Document) as one
//! JSON object and offers only whole-document `load` and `save`. There are
//! no partial updates and no locking.
//!
//! This crate provides:
//! - [`DocumentStore`], the backend trait
//! - [`JsonFileStore`], a single JSON file on disk
//! - [`MemoryStore`], serialized bytes held in memory
//! - [`KvService`], which runs each operation as one load, validate, mutate,
//!   save cycle against a backend
//!
//! ## Quick Start
//!
//! ```rust
//! use eventkv_core::CreateRequest;
//! use eventkv_store::{KvService, MemoryStore, ReadOutcome};
//!
//! let service = KvService::new(MemoryStore::new());
//! service.create(&CreateRequest::from_json(br#"{"colour":"red"}"#)?)?;
//! assert_eq!(service.read("colour")?, ReadOutcome::Live("red".to_string()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Concurrent writers against the same backend are not serialized: two
//! overlapping cycles can each save a document that misses the other's
//! event.

#![deny(missing_docs)]

/// Error types for store operations.
pub mod error;
/// JSON file backend.
pub mod file;
/// In-memory backend.
pub mod memory;
/// Read-modify-write service over a backend.
pub mod service;
/// Storage backend trait.
pub mod traits;

pub use error::{ServiceError, StoreError};
pub use file::{JsonFileStore, WriteOptions};
pub use memory::MemoryStore;
pub use service::{KvService, ReadOutcome};
pub use traits::DocumentStore;
