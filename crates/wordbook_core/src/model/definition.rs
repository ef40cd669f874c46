//! Definition entity embedded in a word.
//!
//! # Responsibility
//! - Hold one community-submitted definition and its vote score.
//! - Apply text edits and votes with timestamp refresh.
//!
//! # Invariants
//! - `votes` starts at 0 and has no floor or ceiling.
//! - `updated_at` moves on every text edit and every vote.

use super::word::WordValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a definition, meaningful only inside its owning word.
pub type DefinitionId = Uuid;

/// One definition of a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub id: DefinitionId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Net score: up votes minus down votes.
    pub votes: i64,
}

impl Definition {
    /// Creates a fresh definition with zero votes, stamped at `now`.
    pub fn new(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            created_at: now,
            updated_at: now,
            votes: 0,
        }
    }

    /// Merges client-writable fields and refreshes `updated_at`.
    pub fn apply_patch(&mut self, patch: DefinitionPatch, now: DateTime<Utc>) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        self.updated_at = now;
    }

    /// Applies one vote and refreshes `updated_at`.
    pub fn apply_vote(&mut self, direction: VoteDirection, now: DateTime<Utc>) {
        self.votes = match direction {
            VoteDirection::Up => self.votes.saturating_add(1),
            VoteDirection::Down => self.votes.saturating_sub(1),
        };
        self.updated_at = now;
    }

    /// Validates definition-level invariants.
    pub fn validate(&self) -> Result<(), WordValidationError> {
        if self.id.is_nil() {
            return Err(WordValidationError::NilDefinitionId);
        }
        if self.text.trim().is_empty() {
            return Err(WordValidationError::BlankDefinitionText);
        }
        Ok(())
    }
}

/// Client input for a new definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewDefinition {
    pub text: String,
}

/// Partial update for an existing definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DefinitionPatch {
    #[serde(default)]
    pub text: Option<String>,
}

/// Direction of a single vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl Display for VoteDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected vote direction token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVoteDirection(pub String);

impl Display for InvalidVoteDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid vote direction `{}`; expected `up` or `down`",
            self.0
        )
    }
}

impl Error for InvalidVoteDirection {}

impl FromStr for VoteDirection {
    type Err = InvalidVoteDirection;

    /// Accepts exactly the lowercase tokens `up` and `down`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(InvalidVoteDirection(other.to_string())),
        }
    }
}
