//! HTTP surface for the Wordbook dictionary.
//!
//! Maps the `/words` REST routes onto `wordbook_core::WordService`, with
//! uniform JSON errors, request logging and CORS.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use config::{ListOrder, ServerConfig};
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
