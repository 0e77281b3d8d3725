//! Error types for the Cardvault core.

use thiserror::Error;

/// Validation errors for card content.
///
/// Callers branch on the variant; the rendered message is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("skill {index} is missing a name")]
    SkillNameRequired { index: usize },

    #[error("skill {index} is missing a category")]
    SkillCategoryRequired { index: usize },

    #[error("a card named {0:?} already exists")]
    DuplicateName(String),
}
