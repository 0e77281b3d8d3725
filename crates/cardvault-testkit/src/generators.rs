//! Proptest generators for property-based testing.

use proptest::prelude::*;
use std::collections::BTreeSet;

use cardvault_core::{
    Card, CardField, Proficiency, SharingLevel, SharingPreferences, Skill,
};

/// Generate a non-blank display name.
pub fn name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z .'-]{0,30}[A-Za-z]".prop_map(String::from)
}

/// Generate a valid email address.
pub fn email() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.]{0,12}@[a-z]{1,10}\\.(com|org|dev)".prop_map(String::from)
}

/// Generate a valid phone number.
pub fn phone() -> impl Strategy<Value = String> {
    "[0-9]{10,14}".prop_map(String::from)
}

/// Generate a proficiency level.
pub fn proficiency() -> impl Strategy<Value = Proficiency> {
    prop_oneof![
        Just(Proficiency::Beginner),
        Just(Proficiency::Intermediate),
        Just(Proficiency::Advanced),
        Just(Proficiency::Expert),
    ]
}

/// Generate a sharing level.
pub fn sharing_level() -> impl Strategy<Value = SharingLevel> {
    prop_oneof![
        Just(SharingLevel::Public),
        Just(SharingLevel::Professional),
        Just(SharingLevel::Personal),
    ]
}

/// Generate a valid skill.
pub fn skill() -> impl Strategy<Value = Skill> {
    ("[A-Za-z]{2,16}", "[A-Za-z]{2,16}", proficiency())
        .prop_map(|(name, category, proficiency)| Skill::new(name, category, proficiency))
}

/// Generate an arbitrary field set (any subset of the seven fields).
pub fn field_set() -> impl Strategy<Value = BTreeSet<CardField>> {
    prop::collection::vec(any::<bool>(), 7).prop_map(|mask| {
        CardField::ALL
            .into_iter()
            .zip(mask)
            .filter_map(|(field, keep)| keep.then_some(field))
            .collect()
    })
}

/// Generate sharing preferences with independent arbitrary tiers.
pub fn sharing_preferences() -> impl Strategy<Value = SharingPreferences> {
    (field_set(), field_set(), field_set(), any::<bool>()).prop_map(
        |(public, professional, personal, allow_forwarding)| SharingPreferences {
            public,
            professional,
            personal,
            allow_forwarding,
            expires_at: None,
        },
    )
}

/// Generate a valid card with arbitrary optional fields, skills, and
/// sharing preferences.
pub fn card() -> impl Strategy<Value = Card> {
    (
        name(),
        prop::option::of("[A-Za-z ]{2,20}"),
        prop::option::of("[A-Za-z ]{2,20}"),
        prop::option::of(email()),
        prop::option::of(phone()),
        prop::collection::vec(skill(), 0..4),
        prop::collection::vec("[a-z]{2,12}", 0..3),
        sharing_preferences(),
    )
        .prop_map(
            |(name, title, company, email, phone, skills, categories, sharing)| {
                let mut card = Card::new(name);
                card.title = title;
                card.company = company;
                card.email = email;
                card.phone = phone;
                card.skills = skills;
                card.categories = categories.into_iter().collect();
                card.sharing = sharing;
                card
            },
        )
}
