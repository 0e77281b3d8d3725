//! Card: the sole identity-bearing entity.
//!
//! A card is the authoritative record a user maintains for themselves (or
//! receives from someone else). Everything on it except the name is
//! optional. Skills are owned by their card and have no independent
//! lifecycle.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::sharing::SharingPreferences;
use crate::types::{now_millis, CardId, SkillId};

/// Proficiency in a skill, ordered for display.
///
/// The derive order is the display order: Beginner < Intermediate <
/// Advanced < Expert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    /// All levels in display order.
    pub const ALL: [Proficiency; 4] = [
        Proficiency::Beginner,
        Proficiency::Intermediate,
        Proficiency::Advanced,
        Proficiency::Expert,
    ];
}

/// A skill listed on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Identifier, unique within the owning card.
    pub id: SkillId,

    /// Skill name. Must be non-blank (enforced by card validation).
    pub name: String,

    /// Category the skill belongs to. Must be non-blank.
    pub category: String,

    /// Self-assessed proficiency.
    pub proficiency: Proficiency,
}

impl Skill {
    /// Create a skill with a fresh id.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        proficiency: Proficiency,
    ) -> Self {
        Self {
            id: SkillId::generate(),
            name: name.into(),
            category: category.into(),
            proficiency,
        }
    }
}

/// A contact card.
///
/// The id is immutable after creation. `updated_at` moves only through
/// [`Card::touch`]; removal is a store-level operation, never in-place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier, immutable after creation.
    pub id: CardId,

    /// Display name. Required; never blank after trimming.
    pub name: String,

    /// Job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Company or organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Email address (local@domain.tld shape when present).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number (permissive shape, >= 10 significant characters).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Profile image bytes. Opaque to the core; capture is external.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Bytes>,

    /// Skills in the order the user arranged them.
    #[serde(default)]
    pub skills: Vec<Skill>,

    /// Category labels for grouping and search.
    #[serde(default)]
    pub categories: BTreeSet<String>,

    /// Per-tier field sets governing what leaves the device.
    #[serde(default)]
    pub sharing: SharingPreferences,

    /// Creation time, Unix milliseconds.
    pub created_at: i64,

    /// Last update time, Unix milliseconds.
    pub updated_at: i64,
}

impl Card {
    /// Create a card with a fresh id and current timestamps.
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: CardId::generate(),
            name: name.into(),
            title: None,
            company: None,
            email: None,
            phone: None,
            image: None,
            skills: Vec::new(),
            categories: BTreeSet::new(),
            sharing: SharingPreferences::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh only the last-updated timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }

    /// Fluent setter used by tests and builders.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Fluent setter used by tests and builders.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Fluent setter used by tests and builders.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Fluent setter used by tests and builders.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Fluent setter used by tests and builders.
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Fluent setter used by tests and builders.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Distinct skill names on this card (case preserved, first wins).
    pub fn skill_names(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.skills
            .iter()
            .filter(|s| seen.insert(s.name.as_str()))
            .map(|s| s.name.as_str())
            .collect()
    }
}
