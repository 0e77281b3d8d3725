//! CardStore: the sole writer of the authoritative card collection.
//!
//! The collection lives behind a single async mutex, so exactly one
//! mutation is in flight at a time and no caller can observe a collection
//! that has been mutated in memory but not yet persisted. Every mutation
//! follows the same discipline: mutate, persist the whole collection, and
//! roll the mutation back verbatim if the persist fails.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use cardvault_core::{now_millis, validate_card, Card, CardId, ValidationError};

use crate::encode::{decode_cards, encode_cards};
use crate::error::{Result, StorageError, StoreError};
use crate::traits::{Storage, CARDS_KEY};

/// Aggregate statistics over the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CardStatistics {
    /// Number of cards.
    pub card_count: usize,
    /// Distinct skill names across all cards (case-insensitive).
    pub distinct_skill_count: usize,
    /// Distinct category labels across all cards (case-insensitive).
    pub distinct_category_count: usize,
    /// Mean number of skills per card (0.0 for an empty collection).
    pub average_skills_per_card: f64,
    /// When the statistics were computed (Unix ms).
    pub computed_at: i64,
}

/// The authoritative card collection.
///
/// Constructed once at process start via [`CardStore::load`] and passed by
/// handle; there is no ambient global instance.
pub struct CardStore {
    storage: Arc<dyn Storage>,
    cards: Mutex<Vec<Card>>,
    /// Load-on-start failure, if any. The store starts empty in that case
    /// (fail-open: an unreadable store must not crash the host).
    load_error: Option<StorageError>,
}

impl CardStore {
    /// Load the collection from the persistence collaborator.
    ///
    /// A missing key means "nothing persisted yet" and yields an empty
    /// collection. Any other failure (backend error, undecodable bytes) is
    /// recorded as a retrievable last-error and the collection starts
    /// empty.
    pub async fn load(storage: Arc<dyn Storage>) -> Self {
        let mut cards = Vec::new();
        let mut load_error = None;

        match storage.load(CARDS_KEY).await {
            Ok(bytes) => match decode_cards(&bytes) {
                Ok(loaded) => {
                    debug!(count = loaded.len(), "loaded card collection");
                    cards = loaded;
                }
                Err(e) => {
                    warn!(error = %e, "stored card collection is undecodable, starting empty");
                    load_error = Some(e);
                }
            },
            Err(e) if e.is_not_found() => {
                debug!("no stored card collection, starting empty");
            }
            Err(e) => {
                warn!(error = %e, "failed to load card collection, starting empty");
                load_error = Some(e);
            }
        }

        Self {
            storage,
            cards: Mutex::new(cards),
            load_error,
        }
    }

    /// The load-on-start failure, if one occurred.
    pub fn load_error(&self) -> Option<String> {
        self.load_error.as_ref().map(|e| e.to_string())
    }

    /// Create a card.
    ///
    /// Rejects a card whose name matches an existing card's name under
    /// case-insensitive comparison (with a different id). On persist
    /// failure the collection is restored to its pre-call state.
    pub async fn create(&self, card: Card) -> Result<Card> {
        validate_card(&card)?;

        let mut cards = self.cards.lock().await;

        let name_key = card.name.trim().to_lowercase();
        if cards
            .iter()
            .any(|c| c.id != card.id && c.name.trim().to_lowercase() == name_key)
        {
            return Err(ValidationError::DuplicateName(card.name.clone()).into());
        }

        cards.push(card.clone());
        if let Err(e) = self.persist(&cards).await {
            cards.pop();
            warn!(card = %card.id, error = %e, "create rolled back");
            return Err(StoreError::Storage(e));
        }

        debug!(card = %card.id, "created card");
        Ok(card)
    }

    /// Update a card by id.
    ///
    /// The stored entry is replaced by a copy with a refreshed
    /// last-updated timestamp; on persist failure the previous entry is
    /// restored verbatim.
    pub async fn update(&self, card: Card) -> Result<Card> {
        validate_card(&card)?;

        let mut cards = self.cards.lock().await;

        let index = cards
            .iter()
            .position(|c| c.id == card.id)
            .ok_or(StoreError::NotFound(card.id))?;

        let mut updated = card;
        updated.touch();

        let previous = std::mem::replace(&mut cards[index], updated.clone());
        if let Err(e) = self.persist(&cards).await {
            cards[index] = previous;
            warn!(card = %updated.id, error = %e, "update rolled back");
            return Err(StoreError::Storage(e));
        }

        debug!(card = %updated.id, "updated card");
        Ok(updated)
    }

    /// Delete a card by id.
    ///
    /// On persist failure the removed entry is re-inserted at its original
    /// position.
    pub async fn delete(&self, id: CardId) -> Result<()> {
        let mut cards = self.cards.lock().await;

        let index = cards
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let removed = cards.remove(index);
        if let Err(e) = self.persist(&cards).await {
            cards.insert(index, removed);
            warn!(card = %id, error = %e, "delete rolled back");
            return Err(StoreError::Storage(e));
        }

        debug!(card = %id, "deleted card");
        Ok(())
    }

    /// Get a card by id.
    pub async fn get(&self, id: CardId) -> Result<Card> {
        let cards = self.cards.lock().await;
        cards
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Snapshot of all cards, most recently updated first.
    pub async fn list(&self) -> Vec<Card> {
        let cards = self.cards.lock().await;
        let mut snapshot = cards.clone();
        snapshot.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        snapshot
    }

    /// Case-insensitive substring search over name, title, company, email,
    /// skill names, and categories.
    ///
    /// A blank query returns the full collection unfiltered.
    pub async fn search(&self, query: &str) -> Vec<Card> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.list().await;
        }

        let cards = self.cards.lock().await;
        cards
            .iter()
            .filter(|c| card_matches(c, &needle))
            .cloned()
            .collect()
    }

    /// Aggregate statistics over the collection.
    pub async fn statistics(&self) -> CardStatistics {
        let cards = self.cards.lock().await;

        let mut skills = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut skill_total = 0usize;

        for card in cards.iter() {
            skill_total += card.skills.len();
            for skill in &card.skills {
                skills.insert(skill.name.trim().to_lowercase());
            }
            for category in &card.categories {
                categories.insert(category.trim().to_lowercase());
            }
        }

        let card_count = cards.len();
        CardStatistics {
            card_count,
            distinct_skill_count: skills.len(),
            distinct_category_count: categories.len(),
            average_skills_per_card: if card_count == 0 {
                0.0
            } else {
                skill_total as f64 / card_count as f64
            },
            computed_at: now_millis(),
        }
    }

    /// Persist the whole collection under the fixed key.
    ///
    /// Called with the collection lock held: the single-writer guarantee
    /// depends on no other write interleaving between the in-memory
    /// mutation and this persist.
    async fn persist(&self, cards: &[Card]) -> std::result::Result<(), StorageError> {
        let bytes = encode_cards(cards)?;
        self.storage.save(CARDS_KEY, bytes).await
    }
}

/// Whether a card matches a lowercased search needle.
fn card_matches(card: &Card, needle: &str) -> bool {
    let haystacks = [
        Some(card.name.as_str()),
        card.title.as_deref(),
        card.company.as_deref(),
        card.email.as_deref(),
    ];
    if haystacks
        .into_iter()
        .flatten()
        .any(|h| h.to_lowercase().contains(needle))
    {
        return true;
    }

    card.skills
        .iter()
        .any(|s| s.name.to_lowercase().contains(needle))
        || card
            .categories
            .iter()
            .any(|c| c.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FailingStorage, MemoryStorage};
    use cardvault_core::{Proficiency, Skill};

    async fn store() -> CardStore {
        CardStore::load(Arc::new(MemoryStorage::new())).await
    }

    fn ada() -> Card {
        Card::new("Ada Lovelace")
            .with_title("Analyst")
            .with_email("ada@x.com")
            .with_skill(Skill::new("Rust", "Languages", Proficiency::Expert))
            .with_category("engineering")
    }

    #[tokio::test]
    async fn test_create_then_get_returns_equal_card() {
        let store = store().await;
        let card = ada();
        let created = store.create(card.clone()).await.unwrap();
        assert_eq!(created, card);
        assert_eq!(store.get(card.id).await.unwrap(), card);
    }

    #[tokio::test]
    async fn test_create_invalid_card_rejected() {
        let store = store().await;
        let err = store.create(Card::new("  ")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_name_case_insensitive() {
        let store = store().await;
        store.create(Card::new("Ada Lovelace")).await.unwrap();

        let err = store.create(Card::new("ada lovelace")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::DuplicateName(_))
        ));
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rollback_on_persist_failure() {
        let storage = Arc::new(FailingStorage::new());
        let store = CardStore::load(storage.clone()).await;
        store.create(Card::new("Ada")).await.unwrap();
        let before = store.list().await;

        storage.fail_next_save();
        let err = store.create(Card::new("Grace")).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(store.list().await, before);

        // Retry after rollback is safe.
        store.create(Card::new("Grace")).await.unwrap();
        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp() {
        let store = store().await;
        let card = store.create(ada()).await.unwrap();
        let before = card.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(2));
        let mut edited = card.clone();
        edited.company = Some("Analytical Engines Ltd".into());
        let updated = store.update(edited).await.unwrap();

        assert!(updated.updated_at > before);
        assert_eq!(
            store.get(card.id).await.unwrap().company.as_deref(),
            Some("Analytical Engines Ltd")
        );
    }

    #[tokio::test]
    async fn test_update_missing_card_is_not_found() {
        let store = store().await;
        let err = store.update(ada()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rollback_restores_previous_entry() {
        let storage = Arc::new(FailingStorage::new());
        let store = CardStore::load(storage.clone()).await;
        let card = store.create(ada()).await.unwrap();

        storage.fail_next_save();
        let mut edited = card.clone();
        edited.title = Some("Countess".into());
        assert!(store.update(edited).await.is_err());

        // The stored entry is the pre-update card, timestamp included.
        assert_eq!(store.get(card.id).await.unwrap(), card);
    }

    #[tokio::test]
    async fn test_delete_and_rollback() {
        let storage = Arc::new(FailingStorage::new());
        let store = CardStore::load(storage.clone()).await;
        let a = store.create(Card::new("Ada")).await.unwrap();
        let b = store.create(Card::new("Grace")).await.unwrap();

        storage.fail_next_save();
        assert!(store.delete(a.id).await.is_err());
        // Rolled back, original position preserved.
        assert_eq!(store.get(a.id).await.unwrap(), a);
        assert_eq!(store.list().await.len(), 2);

        store.delete(a.id).await.unwrap();
        assert!(matches!(
            store.get(a.id).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert_eq!(store.get(b.id).await.unwrap(), b);
    }

    #[tokio::test]
    async fn test_delete_missing_card_is_not_found() {
        let store = store().await;
        let err = store.delete(CardId::generate()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_most_recently_updated_first() {
        let store = store().await;
        let a = store.create(Card::new("Ada")).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let _b = store.create(Card::new("Grace")).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.update(a.clone()).await.unwrap();

        let listed = store.list().await;
        assert_eq!(listed[0].id, a.id);
    }

    #[tokio::test]
    async fn test_search_over_all_fields() {
        let store = store().await;
        store.create(ada()).await.unwrap();
        store
            .create(Card::new("Grace Hopper").with_company("US Navy"))
            .await
            .unwrap();

        assert_eq!(store.search("lovelace").await.len(), 1);
        assert_eq!(store.search("NAVY").await.len(), 1);
        assert_eq!(store.search("rust").await.len(), 1); // skill name
        assert_eq!(store.search("engineer").await.len(), 1); // category
        assert_eq!(store.search("ada@").await.len(), 1); // email
        assert_eq!(store.search("nobody").await.len(), 0);
        assert_eq!(store.search("   ").await.len(), 2); // blank: everything
    }

    #[tokio::test]
    async fn test_statistics() {
        let store = store().await;
        store
            .create(
                Card::new("Ada")
                    .with_skill(Skill::new("Rust", "Languages", Proficiency::Expert))
                    .with_skill(Skill::new("Calculus", "Math", Proficiency::Expert))
                    .with_category("engineering"),
            )
            .await
            .unwrap();
        store
            .create(
                Card::new("Grace")
                    .with_skill(Skill::new("rust", "Languages", Proficiency::Advanced))
                    .with_category("Engineering"),
            )
            .await
            .unwrap();

        let stats = store.statistics().await;
        assert_eq!(stats.card_count, 2);
        assert_eq!(stats.distinct_skill_count, 2); // rust, calculus
        assert_eq!(stats.distinct_category_count, 1);
        assert!((stats.average_skills_per_card - 1.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_statistics_on_empty_collection() {
        let store = store().await;
        let stats = store.statistics().await;
        assert_eq!(stats.card_count, 0);
        assert_eq!(stats.average_skills_per_card, 0.0);
    }

    #[tokio::test]
    async fn test_load_on_start_roundtrip() {
        let storage = Arc::new(MemoryStorage::new());
        let card = {
            let store = CardStore::load(storage.clone()).await;
            store.create(ada()).await.unwrap()
        };

        let reopened = CardStore::load(storage).await;
        assert_eq!(reopened.get(card.id).await.unwrap(), card);
        assert!(reopened.load_error().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_is_fail_open() {
        let storage = Arc::new(FailingStorage::new());
        storage.fail_all_loads(true);

        let store = CardStore::load(storage.clone()).await;
        assert!(store.list().await.is_empty());
        assert!(store.load_error().is_some());

        // The store still works once the backend recovers.
        storage.fail_all_loads(false);
        store.create(Card::new("Ada")).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_undecodable_collection_is_fail_open() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .save(CARDS_KEY, bytes::Bytes::from_static(b"not cbor"))
            .await
            .unwrap();

        let store = CardStore::load(storage).await;
        assert!(store.list().await.is_empty());
        assert!(store.load_error().is_some());
    }
}
