//! Word aggregate root.
//!
//! # Responsibility
//! - Own a word's text, timestamps and embedded definitions.
//! - Resolve and remove definitions by id within this word only.
//!
//! # Invariants
//! - `definitions` is exclusively owned; no definition is shared across words.
//! - Adding or removing a definition does not touch `updated_at`.
//! - Persisted order of `definitions` is the ranked display order.

use super::definition::{Definition, DefinitionId, NewDefinition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a word.
pub type WordId = Uuid;

/// Validation errors for the word aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordValidationError {
    NilWordId,
    NilDefinitionId,
    BlankWordText,
    BlankDefinitionText,
    DuplicateDefinitionId(DefinitionId),
}

impl Display for WordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilWordId => write!(f, "word id must not be nil"),
            Self::NilDefinitionId => write!(f, "definition id must not be nil"),
            Self::BlankWordText => write!(f, "word text must not be blank"),
            Self::BlankDefinitionText => write!(f, "definition text must not be blank"),
            Self::DuplicateDefinitionId(id) => {
                write!(f, "definition id {id} appears more than once in one word")
            }
        }
    }
}

impl Error for WordValidationError {}

/// A dictionary word together with its definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: WordId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub definitions: Vec<Definition>,
}

impl Word {
    /// Creates a word without definitions, stamped at `now`.
    pub fn new(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            created_at: now,
            updated_at: now,
            definitions: Vec::new(),
        }
    }

    /// Builds a word from client input, all parts stamped at `now`.
    ///
    /// Definitions keep input order here; ranking happens at persistence.
    pub fn from_input(input: NewWord, now: DateTime<Utc>) -> Self {
        let mut word = Self::new(input.text, now);
        word.definitions = input
            .definitions
            .into_iter()
            .map(|definition| Definition::new(definition.text, now))
            .collect();
        word
    }

    /// Merges client-writable fields and refreshes `updated_at`.
    pub fn apply_patch(&mut self, patch: WordPatch, now: DateTime<Utc>) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        self.updated_at = now;
    }

    /// Appends a definition and returns its id.
    pub fn push_definition(&mut self, definition: Definition) -> DefinitionId {
        let id = definition.id;
        self.definitions.push(definition);
        id
    }

    pub fn definition(&self, id: DefinitionId) -> Option<&Definition> {
        self.definitions.iter().find(|definition| definition.id == id)
    }

    pub fn definition_mut(&mut self, id: DefinitionId) -> Option<&mut Definition> {
        self.definitions
            .iter_mut()
            .find(|definition| definition.id == id)
    }

    /// Removes a definition, preserving the relative order of the rest.
    pub fn remove_definition(&mut self, id: DefinitionId) -> Option<Definition> {
        let index = self
            .definitions
            .iter()
            .position(|definition| definition.id == id)?;
        Some(self.definitions.remove(index))
    }

    /// Validates the whole aggregate.
    ///
    /// # Errors
    /// - Nil ids, blank texts, or a definition id repeated within this word.
    pub fn validate(&self) -> Result<(), WordValidationError> {
        if self.id.is_nil() {
            return Err(WordValidationError::NilWordId);
        }
        if self.text.trim().is_empty() {
            return Err(WordValidationError::BlankWordText);
        }

        let mut seen = HashSet::with_capacity(self.definitions.len());
        for definition in &self.definitions {
            definition.validate()?;
            if !seen.insert(definition.id) {
                return Err(WordValidationError::DuplicateDefinitionId(definition.id));
            }
        }
        Ok(())
    }
}

/// Client input for creating a word.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewWord {
    pub text: String,
    #[serde(default)]
    pub definitions: Vec<NewDefinition>,
}

/// Partial update for a word's own fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WordPatch {
    #[serde(default)]
    pub text: Option<String>,
}
