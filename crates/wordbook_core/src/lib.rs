//! Core domain logic for the Wordbook dictionary.
//! This crate is the single source of truth for ranking and aggregate invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod ranking;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::definition::{
    Definition, DefinitionId, DefinitionPatch, InvalidVoteDirection, NewDefinition, VoteDirection,
};
pub use model::word::{NewWord, Word, WordId, WordPatch, WordValidationError};
pub use ranking::{compare_definitions, is_ranked, rank_definitions, ranked};
pub use repo::word_repo::{RepoError, RepoResult, SqliteWordRepository, WordOrder, WordRepository};
pub use service::word_service::{ServiceResult, WordService, WordServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
