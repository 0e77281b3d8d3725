//! # Cardvault Core
//!
//! Pure primitives for Cardvault: cards, skills, sharing tiers, and field
//! filtering.
//!
//! This crate contains no I/O, no storage, no crypto. It is pure
//! computation over the card data model.
//!
//! ## Key Types
//!
//! - [`Card`] - The sole identity-bearing entity
//! - [`Skill`] - Owned by its card, no independent lifecycle
//! - [`SharingPreferences`] - Per-tier field sets
//! - [`SharingLevel`] - Tier selector (public / professional / personal)
//!
//! ## Filtering
//!
//! [`filter`] derives the reduced view of a card for a tier. It is pure and
//! idempotent; see the module docs.

pub mod card;
pub mod error;
pub mod filter;
pub mod sharing;
pub mod types;
pub mod validation;

pub use card::{Card, Proficiency, Skill};
pub use error::ValidationError;
pub use filter::filter;
pub use sharing::{CardField, SharingLevel, SharingPreferences};
pub use types::{now_millis, CardId, ShareId, SkillId};
pub use validation::validate_card;
