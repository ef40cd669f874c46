//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the aggregate-level data access contract for words.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Word::validate()` before persistence.
//! - Repositories never reorder definitions; ranking belongs to the service.

pub mod word_repo;
