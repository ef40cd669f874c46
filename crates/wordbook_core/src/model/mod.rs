//! Dictionary domain model.
//!
//! # Responsibility
//! - Define the `Word` aggregate and its embedded `Definition` entities.
//! - Define client input shapes and vote directions.
//!
//! # Invariants
//! - A `Definition` only exists inside the `definitions` of one `Word`.
//! - Definition ids are unique within their owning word.
//! - Timestamps are UTC with millisecond precision.

pub mod definition;
pub mod word;
