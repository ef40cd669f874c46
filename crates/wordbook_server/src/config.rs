//! Server configuration.
//!
//! # Responsibility
//! - Parse listen address, store location, logging and list-order settings
//!   from command-line flags with environment fallbacks.
//!
//! # Invariants
//! - Every setting has a default; the server starts with no flags at all.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use wordbook_core::WordOrder;

/// Default ordering applied to `GET /words` when no `sort` query is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListOrder {
    /// Newest creation first.
    CreatedAt,
    /// Most recently updated first.
    UpdatedAt,
}

impl From<ListOrder> for WordOrder {
    fn from(value: ListOrder) -> Self {
        match value {
            ListOrder::CreatedAt => WordOrder::CreatedAtDesc,
            ListOrder::UpdatedAt => WordOrder::UpdatedAtDesc,
        }
    }
}

/// Runtime settings for the Wordbook HTTP server.
#[derive(Debug, Clone, Parser)]
#[command(name = "wordbook")]
#[command(version)]
#[command(about = "Collaborative dictionary HTTP server")]
pub struct ServerConfig {
    /// Bind address.
    #[arg(long, env = "WORDBOOK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on. 0 means OS-assigned.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite database file; created and migrated on first start.
    #[arg(long, env = "WORDBOOK_DB_PATH", default_value = "wordbook.sqlite3")]
    pub db_path: PathBuf,

    /// One of trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "WORDBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files. Logs go to stderr when unset.
    #[arg(long, env = "WORDBOOK_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Default sort key of the word list.
    #[arg(long, env = "WORDBOOK_LIST_ORDER", value_enum, default_value_t = ListOrder::UpdatedAt)]
    pub list_order: ListOrder,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn effective_log_level(&self) -> &str {
        match self.log_level.as_deref() {
            Some(level) => level,
            None => wordbook_core::default_log_level(),
        }
    }
}
