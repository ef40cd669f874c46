//! Word use-case service.
//!
//! # Responsibility
//! - Resolve words and nested definitions, apply one mutation per call.
//! - Rank definitions and persist the whole aggregate through one helper.
//!
//! # Invariants
//! - Every save goes through `persist`, which ranks before saving.
//! - A missing word or definition fails before anything is persisted.
//! - Definition lookups only search the addressed word.
//! - Every mutating call returns the updated (or deleted) `Word`.

use crate::clock::{Clock, SystemClock};
use crate::model::definition::{
    Definition, DefinitionId, DefinitionPatch, InvalidVoteDirection, NewDefinition, VoteDirection,
};
use crate::model::word::{NewWord, Word, WordId, WordPatch, WordValidationError};
use crate::ranking::rank_definitions;
use crate::repo::word_repo::{RepoError, WordOrder, WordRepository};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type ServiceResult<T> = Result<T, WordServiceError>;

/// Service error for word use-cases.
#[derive(Debug)]
pub enum WordServiceError {
    /// Request input is malformed or violates model rules.
    InvalidRequest(String),
    WordNotFound(WordId),
    /// Definition id does not exist under the addressed word.
    DefinitionNotFound {
        word_id: WordId,
        definition_id: DefinitionId,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl WordServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::WordNotFound(_) | Self::DefinitionNotFound { .. }
        )
    }

    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

impl Display for WordServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest(message) => write!(f, "{message}"),
            Self::WordNotFound(id) => write!(f, "word not found: {id}"),
            Self::DefinitionNotFound {
                word_id,
                definition_id,
            } => write!(
                f,
                "definition not found: {definition_id} (word {word_id})"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WordServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for WordServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::WordNotFound(id),
            RepoError::Validation(err) => Self::InvalidRequest(err.to_string()),
            other => Self::Repo(other),
        }
    }
}

impl From<WordValidationError> for WordServiceError {
    fn from(value: WordValidationError) -> Self {
        Self::InvalidRequest(value.to_string())
    }
}

impl From<InvalidVoteDirection> for WordServiceError {
    fn from(value: InvalidVoteDirection) -> Self {
        Self::InvalidRequest(value.to_string())
    }
}

/// Word service facade over repository implementations.
pub struct WordService<R: WordRepository> {
    repo: R,
    clock: Arc<dyn Clock>,
}

impl<R: WordRepository> WordService<R> {
    /// Creates a service stamping times from the system clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, Arc::new(SystemClock))
    }

    pub fn with_clock(repo: R, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Creates a word with optional initial definitions.
    pub fn create_word(&self, input: NewWord) -> ServiceResult<Word> {
        let word = Word::from_input(input, self.clock.now());
        let result = self.persist(word);
        log_outcome("word_create", &result, String::new);
        result
    }

    /// Lists all words, newest first by the requested key.
    pub fn list_words(&self, order: WordOrder) -> ServiceResult<Vec<Word>> {
        let words = self.repo.find_all(order).map_err(|err| {
            error!("event=word_list module=service status=error order={order:?} error={err}");
            WordServiceError::from(err)
        })?;
        info!(
            "event=word_list module=service status=ok order={order:?} count={}",
            words.len()
        );
        Ok(words)
    }

    pub fn get_word(&self, word_id: WordId) -> ServiceResult<Word> {
        self.load(word_id)
    }

    /// Merges word fields and refreshes the word's `updated_at`.
    pub fn update_word(&self, word_id: WordId, patch: WordPatch) -> ServiceResult<Word> {
        let result = self.load(word_id).and_then(|mut word| {
            word.apply_patch(patch, self.clock.now());
            self.persist(word)
        });
        log_outcome("word_update", &result, || format!("word_id={word_id}"));
        result
    }

    /// Deletes a word with all of its definitions and returns what was removed.
    pub fn delete_word(&self, word_id: WordId) -> ServiceResult<Word> {
        let result = self.load(word_id).and_then(|word| {
            self.repo.delete(word.id)?;
            Ok(word)
        });
        log_outcome("word_delete", &result, || format!("word_id={word_id}"));
        result
    }

    /// Appends a new zero-vote definition and re-ranks.
    pub fn add_definition(&self, word_id: WordId, input: NewDefinition) -> ServiceResult<Word> {
        let result = self.load(word_id).and_then(|mut word| {
            word.push_definition(Definition::new(input.text, self.clock.now()));
            self.persist(word)
        });
        log_outcome("definition_add", &result, || format!("word_id={word_id}"));
        result
    }

    /// Merges definition fields, refreshes its `updated_at` and re-ranks.
    pub fn edit_definition(
        &self,
        word_id: WordId,
        definition_id: DefinitionId,
        patch: DefinitionPatch,
    ) -> ServiceResult<Word> {
        let result = self.load(word_id).and_then(|mut word| {
            let now = self.clock.now();
            locate(&mut word, definition_id)?.apply_patch(patch, now);
            self.persist(word)
        });
        log_outcome("definition_edit", &result, || {
            format!("word_id={word_id} definition_id={definition_id}")
        });
        result
    }

    /// Removes one definition from its word.
    pub fn delete_definition(
        &self,
        word_id: WordId,
        definition_id: DefinitionId,
    ) -> ServiceResult<Word> {
        let result = self.load(word_id).and_then(|mut word| {
            word.remove_definition(definition_id)
                .ok_or(WordServiceError::DefinitionNotFound {
                    word_id,
                    definition_id,
                })?;
            self.persist(word)
        });
        log_outcome("definition_delete", &result, || {
            format!("word_id={word_id} definition_id={definition_id}")
        });
        result
    }

    /// Applies one vote, refreshes the definition's `updated_at` and re-ranks.
    pub fn vote(
        &self,
        word_id: WordId,
        definition_id: DefinitionId,
        direction: VoteDirection,
    ) -> ServiceResult<Word> {
        let result = self.load(word_id).and_then(|mut word| {
            let now = self.clock.now();
            locate(&mut word, definition_id)?.apply_vote(direction, now);
            self.persist(word)
        });
        log_outcome("definition_vote", &result, || {
            format!("word_id={word_id} definition_id={definition_id} direction={direction}")
        });
        result
    }

    /// Parses a raw direction token, then votes.
    ///
    /// An unknown token fails before the word is even loaded.
    pub fn vote_token(
        &self,
        word_id: WordId,
        definition_id: DefinitionId,
        token: &str,
    ) -> ServiceResult<Word> {
        let direction = token.parse::<VoteDirection>().map_err(|err| {
            warn!(
                "event=definition_vote module=service status=rejected word_id={word_id} definition_id={definition_id} error_code=invalid_direction"
            );
            WordServiceError::from(err)
        })?;
        self.vote(word_id, definition_id, direction)
    }

    fn load(&self, word_id: WordId) -> ServiceResult<Word> {
        self.repo
            .find_by_id(word_id)?
            .ok_or(WordServiceError::WordNotFound(word_id))
    }

    /// Ranks definitions, validates and saves the whole aggregate.
    fn persist(&self, mut word: Word) -> ServiceResult<Word> {
        rank_definitions(&mut word.definitions);
        word.validate()?;
        Ok(self.repo.save(&word)?)
    }
}

fn locate(word: &mut Word, definition_id: DefinitionId) -> ServiceResult<&mut Definition> {
    let word_id = word.id;
    word.definition_mut(definition_id)
        .ok_or(WordServiceError::DefinitionNotFound {
            word_id,
            definition_id,
        })
}

fn log_outcome(event: &str, result: &ServiceResult<Word>, context: impl FnOnce() -> String) {
    match result {
        Ok(word) => info!(
            "event={event} module=service status=ok word_id={} definitions={}",
            word.id,
            word.definitions.len()
        ),
        Err(err) if err.is_not_found() || err.is_invalid_request() => warn!(
            "event={event} module=service status=rejected {} error={err}",
            context()
        ),
        Err(err) => error!(
            "event={event} module=service status=error {} error={err}",
            context()
        ),
    }
}
