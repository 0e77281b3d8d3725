//! Sharing tiers and per-tier field sets.
//!
//! A card owner declares, per tier, exactly which fields leave the device.
//! The three field sets are independent: no subset relationship between
//! tiers is enforced, and the filter honors the stored sets exactly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The seven addressable card fields.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CardField {
    Name,
    Title,
    Company,
    Email,
    Phone,
    Image,
    Skills,
}

impl CardField {
    /// All addressable fields.
    pub const ALL: [CardField; 7] = [
        CardField::Name,
        CardField::Title,
        CardField::Company,
        CardField::Email,
        CardField::Phone,
        CardField::Image,
        CardField::Skills,
    ];
}

/// Sharing tier selector. Pure discriminator, no owned state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharingLevel {
    Public,
    Professional,
    Personal,
}

impl SharingLevel {
    /// All tiers.
    pub const ALL: [SharingLevel; 3] = [
        SharingLevel::Public,
        SharingLevel::Professional,
        SharingLevel::Personal,
    ];
}

impl fmt::Display for SharingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SharingLevel::Public => "public",
            SharingLevel::Professional => "professional",
            SharingLevel::Personal => "personal",
        };
        write!(f, "{s}")
    }
}

/// Per-card sharing preferences: one field set per tier.
///
/// `allow_forwarding` and `expires_at` are stored and serialized but not
/// consulted by the filter or envelope logic; their enforcement semantics
/// are unsettled product questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingPreferences {
    /// Fields exposed at the public tier.
    pub public: BTreeSet<CardField>,

    /// Fields exposed at the professional tier.
    pub professional: BTreeSet<CardField>,

    /// Fields exposed at the personal tier.
    pub personal: BTreeSet<CardField>,

    /// Whether a recipient may forward the card onward. Stored only.
    #[serde(default)]
    pub allow_forwarding: bool,

    /// Preference-level expiry (Unix ms), distinct from envelope expiry.
    /// Stored only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl SharingPreferences {
    /// The field set configured for a tier.
    pub fn fields_for(&self, level: SharingLevel) -> &BTreeSet<CardField> {
        match level {
            SharingLevel::Public => &self.public,
            SharingLevel::Professional => &self.professional,
            SharingLevel::Personal => &self.personal,
        }
    }

    /// Whether a field is exposed at a tier.
    pub fn exposes(&self, level: SharingLevel, field: CardField) -> bool {
        self.fields_for(level).contains(&field)
    }
}

impl Default for SharingPreferences {
    fn default() -> Self {
        Self {
            public: BTreeSet::from([CardField::Name, CardField::Title, CardField::Company]),
            professional: BTreeSet::from([
                CardField::Name,
                CardField::Title,
                CardField::Company,
                CardField::Email,
                CardField::Skills,
            ]),
            personal: BTreeSet::from(CardField::ALL),
            allow_forwarding: false,
            expires_at: None,
        }
    }
}
