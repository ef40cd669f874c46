//! Word repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load, list, save and delete whole `Word` aggregates.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `save` replaces the word row and all definition rows in one transaction.
//! - Definitions are stored with `position` equal to their index in
//!   `Word::definitions`, and read back in that order. No sorting happens here.
//! - Write paths call `Word::validate()` before touching SQL.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::{schema_version, DbError};
use crate::model::definition::Definition;
use crate::model::word::{Word, WordId, WordValidationError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const WORD_SELECT_SQL: &str = "SELECT
    uuid,
    text,
    created_at,
    updated_at
FROM words";

const DEFINITION_SELECT_SQL: &str = "SELECT
    uuid,
    text,
    votes,
    created_at,
    updated_at
FROM definitions
WHERE word_uuid = ?1
ORDER BY position ASC;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for word persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Aggregate failed validation before write.
    Validation(WordValidationError),
    Db(DbError),
    /// No word with this id exists.
    NotFound(WordId),
    /// Stored row cannot be converted into the domain model.
    InvalidData(String),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "word not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted word data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "word repository requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<WordValidationError> for RepoError {
    fn from(value: WordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Ordering of the top-level word list. Both keys sort newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordOrder {
    CreatedAtDesc,
    #[default]
    UpdatedAtDesc,
}

impl WordOrder {
    fn order_by_sql(self) -> &'static str {
        match self {
            Self::CreatedAtDesc => "ORDER BY created_at DESC, uuid ASC",
            Self::UpdatedAtDesc => "ORDER BY updated_at DESC, uuid ASC",
        }
    }
}

/// Persistence façade over whole word aggregates.
///
/// Implementations must persist one word and all its definitions atomically.
pub trait WordRepository {
    /// Loads one word with definitions in stored order.
    fn find_by_id(&self, id: WordId) -> RepoResult<Option<Word>>;
    /// Lists all words in the requested order.
    fn find_all(&self, order: WordOrder) -> RepoResult<Vec<Word>>;
    /// Inserts or fully replaces a word aggregate.
    fn save(&self, word: &Word) -> RepoResult<Word>;
    /// Deletes a word and its definitions.
    fn delete(&self, id: WordId) -> RepoResult<()>;
}

/// SQLite-backed word repository.
pub struct SqliteWordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWordRepository<'conn> {
    /// Creates a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = schema_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    fn load_definitions(&self, word_uuid: &str) -> RepoResult<Vec<Definition>> {
        let mut stmt = self.conn.prepare_cached(DEFINITION_SELECT_SQL)?;
        let mut rows = stmt.query([word_uuid])?;
        let mut definitions = Vec::new();
        while let Some(row) = rows.next()? {
            definitions.push(parse_definition_row(row)?);
        }
        Ok(definitions)
    }

    fn load_word(&self, row: &Row<'_>) -> RepoResult<Word> {
        let uuid_text: String = row.get("uuid")?;
        let id = parse_uuid(&uuid_text, "words.uuid")?;
        let word = Word {
            id,
            text: row.get("text")?,
            created_at: parse_millis(row.get("created_at")?, "words.created_at")?,
            updated_at: parse_millis(row.get("updated_at")?, "words.updated_at")?,
            definitions: self.load_definitions(&uuid_text)?,
        };
        word.validate()
            .map_err(|err| RepoError::InvalidData(format!("word {id}: {err}")))?;
        Ok(word)
    }
}

impl WordRepository for SqliteWordRepository<'_> {
    fn find_by_id(&self, id: WordId) -> RepoResult<Option<Word>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{WORD_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(self.load_word(row)?)),
            None => Ok(None),
        }
    }

    fn find_all(&self, order: WordOrder) -> RepoResult<Vec<Word>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORD_SELECT_SQL} {};", order.order_by_sql()))?;
        let mut rows = stmt.query([])?;
        let mut words = Vec::new();
        while let Some(row) = rows.next()? {
            words.push(self.load_word(row)?);
        }
        Ok(words)
    }

    fn save(&self, word: &Word) -> RepoResult<Word> {
        word.validate()?;

        let word_uuid = word.id.to_string();
        // The repository borrows the connection immutably; nested transactions
        // are never opened by this type.
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO words (uuid, text, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (uuid) DO UPDATE SET
                text = excluded.text,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at;",
            params![
                word_uuid,
                word.text.as_str(),
                word.created_at.timestamp_millis(),
                word.updated_at.timestamp_millis(),
            ],
        )?;

        tx.execute("DELETE FROM definitions WHERE word_uuid = ?1;", [&word_uuid])?;

        {
            let mut insert = tx.prepare_cached(
                "INSERT INTO definitions (
                    uuid,
                    word_uuid,
                    position,
                    text,
                    votes,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            )?;
            for (position, definition) in word.definitions.iter().enumerate() {
                let position = i64::try_from(position).map_err(|_| {
                    RepoError::InvalidData(format!(
                        "definition position {position} exceeds storage range"
                    ))
                })?;
                insert.execute(params![
                    definition.id.to_string(),
                    word_uuid,
                    position,
                    definition.text.as_str(),
                    definition.votes,
                    definition.created_at.timestamp_millis(),
                    definition.updated_at.timestamp_millis(),
                ])?;
            }
        }

        tx.commit()?;
        Ok(word.clone())
    }

    fn delete(&self, id: WordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM words WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_definition_row(row: &Row<'_>) -> RepoResult<Definition> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Definition {
        id: parse_uuid(&uuid_text, "definitions.uuid")?,
        text: row.get("text")?,
        votes: row.get("votes")?,
        created_at: parse_millis(row.get("created_at")?, "definitions.created_at")?,
        updated_at: parse_millis(row.get("updated_at")?, "definitions.updated_at")?,
    })
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn parse_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}"))
    })
}
