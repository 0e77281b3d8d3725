//! Tier filtering: derive the reduced view of a card for a sharing level.
//!
//! Filtering happens on the sender side, before anything is serialized or
//! encrypted; a receiver only ever sees the already-reduced snapshot.

use crate::card::Card;
use crate::sharing::{CardField, SharingLevel};

/// Produce a copy of `card` with every field outside the tier's configured
/// field set cleared.
///
/// Pure and deterministic: reads nothing but the two arguments, mutates
/// nothing, and is idempotent (`filter(filter(c, l), l) == filter(c, l)`,
/// because the copy carries the same preferences).
///
/// Cleared values: name becomes the empty string, optional fields become
/// `None`, skills become empty.
pub fn filter(card: &Card, level: SharingLevel) -> Card {
    let fields = card.sharing.fields_for(level);
    let mut out = card.clone();

    if !fields.contains(&CardField::Name) {
        out.name = String::new();
    }
    if !fields.contains(&CardField::Title) {
        out.title = None;
    }
    if !fields.contains(&CardField::Company) {
        out.company = None;
    }
    if !fields.contains(&CardField::Email) {
        out.email = None;
    }
    if !fields.contains(&CardField::Phone) {
        out.phone = None;
    }
    if !fields.contains(&CardField::Image) {
        out.image = None;
    }
    if !fields.contains(&CardField::Skills) {
        out.skills.clear();
    }

    out
}
