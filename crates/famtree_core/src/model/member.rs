//! Family member record model.
//!
//! # Responsibility
//! - Define the flat input record shared by every record source.
//! - Keep relational links as plain optional ids.
//!
//! # Invariants
//! - `id` is unique within one record set.
//! - `parent_id` / `spouse_id` are honored only when they resolve inside the
//!   same record set; dangling links are legal data, not errors.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier of one member record in the record store.
pub type MemberId = i64;

/// One flat record describing a family member and its relational links.
///
/// Serialized with camelCase names to match the record store's JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: MemberId,
    pub name: String,
    /// Free-form year text, e.g. `1948` or `c. 1910`.
    #[serde(default)]
    pub birth_year: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Zero for the founding generation.
    pub generation: u32,
    #[serde(default)]
    pub parent_id: Option<MemberId>,
    #[serde(default)]
    pub spouse_id: Option<MemberId>,
}

/// Validation errors for member records written to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    /// `name` is blank after trim.
    BlankName(MemberId),
}

impl Display for MemberValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName(id) => write!(f, "member {id} has a blank name"),
        }
    }
}

impl Error for MemberValidationError {}

impl MemberRecord {
    /// Creates a record with no optional attributes and no links.
    pub fn new(id: MemberId, name: impl Into<String>, generation: u32) -> Self {
        Self {
            id,
            name: name.into(),
            birth_year: None,
            notes: None,
            phone_number: None,
            address: None,
            generation,
            parent_id: None,
            spouse_id: None,
        }
    }

    /// Sets the parent link.
    pub fn with_parent(mut self, parent_id: MemberId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Sets the spouse link.
    pub fn with_spouse(mut self, spouse_id: MemberId) -> Self {
        self.spouse_id = Some(spouse_id);
        self
    }

    /// Sets the birth year text.
    pub fn with_birth_year(mut self, birth_year: impl Into<String>) -> Self {
        self.birth_year = Some(birth_year.into());
        self
    }

    /// Returns whether this record qualifies as the tree root.
    pub fn is_root_candidate(&self) -> bool {
        self.parent_id.is_none() && self.generation == 0
    }

    /// Validates invariants required before a store write.
    ///
    /// Links are deliberately not checked here: records are entered by hand
    /// and may reference members that were never entered.
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.name.trim().is_empty() {
            return Err(MemberValidationError::BlankName(self.id));
        }
        Ok(())
    }
}
