//! End-to-end properties of the card collection and the sharing envelope
//! flow, exercised through the unified Vault API.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use proptest::prelude::*;

use cardvault::{Vault, VaultConfig};
use cardvault_core::{filter, Card, CardField, Proficiency, SharingLevel, Skill};
use cardvault_share::{EnvelopeKey, ShareError, ShareProtocol};
use cardvault_store::{MemoryStorage, StoreError};
use cardvault_testkit::fixtures::{FailingFixture, TestFixture};
use cardvault_testkit::generators;

async fn open_vault(fixture: &TestFixture) -> Vault {
    Vault::open(
        fixture.key.clone(),
        fixture.storage.clone(),
        VaultConfig::default(),
    )
    .await
}

#[tokio::test]
async fn create_then_get_returns_an_equal_card() {
    let fixture = TestFixture::new();
    let vault = open_vault(&fixture).await;

    let card = fixture.full_card("Ada Lovelace");
    let created = vault.store().create(card.clone()).await.unwrap();
    assert_eq!(created, card);
    assert_eq!(vault.store().get(card.id).await.unwrap(), card);
}

#[tokio::test]
async fn update_moves_updated_at_strictly_forward() {
    let fixture = TestFixture::new();
    let vault = open_vault(&fixture).await;

    let card = vault
        .store()
        .create(fixture.full_card("Ada Lovelace"))
        .await
        .unwrap();
    let before = card.updated_at;

    std::thread::sleep(std::time::Duration::from_millis(2));
    let updated = vault.store().update(card).await.unwrap();
    assert!(updated.updated_at > before);
}

#[tokio::test]
async fn mutations_roll_back_on_save_failure() {
    let fixture = FailingFixture::new();
    let vault = Vault::open(
        fixture.key.clone(),
        fixture.storage.clone(),
        VaultConfig::default(),
    )
    .await;

    let a = vault.store().create(Card::new("Ada")).await.unwrap();
    vault.store().create(Card::new("Grace")).await.unwrap();
    let snapshot = vault.store().list().await;

    // create
    fixture.storage.fail_next_save();
    assert!(vault.store().create(Card::new("Edsger")).await.is_err());
    assert_eq!(vault.store().list().await, snapshot);

    // update
    fixture.storage.fail_next_save();
    let mut edited = a.clone();
    edited.title = Some("Countess".into());
    assert!(vault.store().update(edited).await.is_err());
    assert_eq!(vault.store().list().await, snapshot);

    // delete
    fixture.storage.fail_next_save();
    assert!(vault.store().delete(a.id).await.is_err());
    assert_eq!(vault.store().list().await, snapshot);
}

#[tokio::test]
async fn duplicate_name_with_different_id_is_a_validation_error() {
    let fixture = TestFixture::new();
    let vault = open_vault(&fixture).await;

    vault.store().create(Card::new("Ada Lovelace")).await.unwrap();
    let err = vault
        .store()
        .create(Card::new("ADA LOVELACE"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(vault.store().list().await.len(), 1);
}

#[tokio::test]
async fn qr_roundtrip_yields_the_filtered_snapshot_only() {
    let fixture = TestFixture::new();
    let vault = open_vault(&fixture).await;

    let card = vault
        .store()
        .create(fixture.full_card("Ada Lovelace"))
        .await
        .unwrap();

    let text = vault
        .share_qr(card.id, SharingLevel::Professional)
        .await
        .unwrap();
    let received = vault.receive(&text).unwrap();

    assert_eq!(received, filter(&card, SharingLevel::Professional));
    // The full card carries a phone and image the professional tier hides.
    assert_ne!(received, card);
    assert_eq!(received.phone, None);
    assert_eq!(received.image, None);
}

#[tokio::test]
async fn expired_envelope_fails_expired_regardless_of_payload() {
    let fixture = TestFixture::new();
    let protocol = fixture.protocol();

    let card = fixture.full_card("Ada Lovelace");
    let text = protocol
        .build_qr(
            &card,
            SharingLevel::Personal,
            Some(cardvault_core::now_millis() - 1000),
        )
        .unwrap();

    assert!(matches!(protocol.unpack(&text).unwrap_err(), ShareError::Expired));
}

#[tokio::test]
async fn exhausted_link_fails_usage_exceeded_then_disappears() {
    let fixture = TestFixture::new();
    let protocol = fixture.protocol();
    let card = fixture.full_card("Ada Lovelace");

    let url = protocol
        .build_link(&card, SharingLevel::Public, 1)
        .await
        .unwrap();
    let share_id = ShareProtocol::share_id_from_url(&url).unwrap();

    protocol.resolve_link(share_id).await.unwrap();
    assert!(matches!(
        protocol.resolve_link(share_id).await.unwrap_err(),
        ShareError::ShareNotFound(_)
    ));
}

#[tokio::test]
async fn any_single_bit_flip_is_rejected() {
    let fixture = TestFixture::new();
    let protocol = fixture.protocol();

    let text = protocol
        .build_qr(&fixture.full_card("Ada Lovelace"), SharingLevel::Public, None)
        .unwrap();
    let bytes = BASE64.decode(&text).unwrap();

    for index in 0..bytes.len() {
        for bit in 0..8 {
            let mut corrupted = bytes.clone();
            corrupted[index] ^= 1 << bit;
            let err = protocol.unpack(&BASE64.encode(&corrupted)).unwrap_err();
            assert!(
                matches!(err, ShareError::Decryption | ShareError::InvalidFormat(_)),
                "byte {index} bit {bit}: silent decode"
            );
        }
    }
}

#[tokio::test]
async fn ada_public_scenario() {
    // Card {name: "Ada", email: "ada@x.com", skills: [Rust/Lang/Expert]},
    // public tier = {name, title, company}. The public QR must carry the
    // name and nothing else.
    let fixture = TestFixture::new();
    let protocol = fixture.protocol();

    let card = Card::new("Ada")
        .with_email("ada@x.com")
        .with_skill(Skill::new("Rust", "Lang", Proficiency::Expert));
    assert_eq!(
        card.sharing.public,
        [CardField::Name, CardField::Title, CardField::Company].into()
    );

    let text = protocol.build_qr(&card, SharingLevel::Public, None).unwrap();
    let received = protocol.unpack(&text).unwrap();

    assert_eq!(received.name, "Ada");
    assert_eq!(received.email, None);
    assert!(received.skills.is_empty());
}

#[tokio::test]
async fn receiving_instance_persists_the_contact() {
    let key = EnvelopeKey::generate();
    let sender = Vault::open(
        key.clone(),
        Arc::new(MemoryStorage::new()),
        VaultConfig::default(),
    )
    .await;
    let receiver = Vault::open(key, Arc::new(MemoryStorage::new()), VaultConfig::default()).await;

    let card = sender
        .store()
        .create(Card::new("Ada").with_email("ada@x.com"))
        .await
        .unwrap();
    let text = sender
        .share_qr(card.id, SharingLevel::Professional)
        .await
        .unwrap();

    let contact = receiver.receive_and_save(&text).await.unwrap();
    assert_eq!(contact.email.as_deref(), Some("ada@x.com"));
    assert_eq!(receiver.store().list().await.len(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn filter_is_idempotent_and_exact(
        card in generators::card(),
        level in generators::sharing_level(),
    ) {
        let once = filter(&card, level);
        // Idempotence
        prop_assert_eq!(filter(&once, level), once.clone());

        // Fields outside the set are empty; fields inside are untouched.
        let fields = card.sharing.fields_for(level);
        if fields.contains(&CardField::Name) {
            prop_assert_eq!(&once.name, &card.name);
        } else {
            prop_assert_eq!(&once.name, "");
        }
        if fields.contains(&CardField::Email) {
            prop_assert_eq!(&once.email, &card.email);
        } else {
            prop_assert_eq!(&once.email, &None);
        }
        if fields.contains(&CardField::Skills) {
            prop_assert_eq!(&once.skills, &card.skills);
        } else {
            prop_assert!(once.skills.is_empty());
        }
    }

    #[test]
    fn qr_roundtrip_equals_filter(
        card in generators::card(),
        level in generators::sharing_level(),
    ) {
        let fixture = TestFixture::new();
        let protocol = fixture.protocol();
        let text = protocol.build_qr(&card, level, None).unwrap();
        prop_assert_eq!(protocol.unpack(&text).unwrap(), filter(&card, level));
    }
}
