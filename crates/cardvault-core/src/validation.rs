//! Card validation: an ordered list of named validators.
//!
//! The rule set is shared verbatim by store create and update. Validators
//! run in a fixed order and the first failure wins; there is no error
//! accumulation.

use regex::Regex;
use std::sync::LazyLock;

use crate::card::Card;
use crate::error::ValidationError;

/// local@domain.tld. Intentionally strict on the dot-TLD tail, permissive
/// on the local part.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email regex")
});

/// Permissive phone shape: optional leading +, then at least 10 characters
/// of digits, spaces, and common punctuation.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s().-]{10,}$").expect("phone regex"));

/// A named validation rule.
type Validator = fn(&Card) -> Result<(), ValidationError>;

/// The rule set, in evaluation order.
const VALIDATORS: &[(&str, Validator)] = &[
    ("name", validate_name),
    ("email", validate_email),
    ("phone", validate_phone),
    ("skills", validate_skills),
];

/// Validate a card against the full rule set, short-circuiting on the
/// first violation.
pub fn validate_card(card: &Card) -> Result<(), ValidationError> {
    for (_name, validator) in VALIDATORS {
        validator(card)?;
    }
    Ok(())
}

/// Names of the rules, in order. Exposed for diagnostics and tests.
pub fn rule_names() -> Vec<&'static str> {
    VALIDATORS.iter().map(|(name, _)| *name).collect()
}

fn validate_name(card: &Card) -> Result<(), ValidationError> {
    if card.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    Ok(())
}

fn validate_email(card: &Card) -> Result<(), ValidationError> {
    match &card.email {
        Some(email) if !email.is_empty() && !EMAIL_RE.is_match(email) => {
            Err(ValidationError::InvalidEmail(email.clone()))
        }
        _ => Ok(()),
    }
}

fn validate_phone(card: &Card) -> Result<(), ValidationError> {
    match &card.phone {
        Some(phone) if !phone.is_empty() && !PHONE_RE.is_match(phone) => {
            Err(ValidationError::InvalidPhone(phone.clone()))
        }
        _ => Ok(()),
    }
}

fn validate_skills(card: &Card) -> Result<(), ValidationError> {
    for (index, skill) in card.skills.iter().enumerate() {
        if skill.name.trim().is_empty() {
            return Err(ValidationError::SkillNameRequired { index });
        }
        if skill.category.trim().is_empty() {
            return Err(ValidationError::SkillCategoryRequired { index });
        }
    }
    Ok(())
}
