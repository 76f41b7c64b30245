//! Event-log core for eventkv.
//!
//! This crate provides:
//! - The [`Event`] type recorded for every create, update and delete
//! - [`KeyRecord`], the append-only history of one key
//! - [`Document`], the whole store as a mapping of key to record, with the
//!   create/read/update/delete/history operations
//! - [`CreateRequest`] parsing for `{"key":"value"}` request bodies
//!
//! Core invariants:
//! - A key's current state is derived from the last event of its record
//! - The first event of every record is a create
//! - Records are never removed and never shrink
//! - A rejected operation leaves the document untouched
//!
//! ## Quick Start
//!
//! ```rust
//! use eventkv_core::{Document, KeyState};
//!
//! let mut doc = Document::new();
//! doc.create("colour", "red")?;
//! doc.update("colour", "blue")?;
//! assert_eq!(doc.read("colour")?, KeyState::Live("blue"));
//!
//! doc.delete("colour")?;
//! assert_eq!(doc.read("colour")?, KeyState::Deleted);
//! assert_eq!(doc.history("colour")?.len(), 3);
//! # Ok::<(), eventkv_core::CoreError>(())
//! ```
#![deny(missing_docs)]

/// Whole-store document and the per-key operations.
pub mod document;
/// Error types for core operations and document decoding.
pub mod errors;
/// Event types recorded in key histories.
pub mod events;
/// Per-key records and derived state.
pub mod record;
/// Request body parsing.
pub mod request;

pub use document::Document;
pub use errors::{CoreError, SchemaError};
pub use events::{Event, EventKind};
pub use record::{KeyRecord, KeyState};
pub use request::CreateRequest;
