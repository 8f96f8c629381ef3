use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::{
    LandlordSwipe, LandlordSwipeKey, Listing, Match, MatchKey, MatchUpsert, RenterSwipe,
    RenterSwipeKey, SwipeDirection,
};
use crate::services::store::{StoreError, SwipeStore};

/// In-memory swipe ledger and match store
///
/// Used by the test suite and benchmarks, and handy for local development
/// without a database. A single mutex guards all four relations, so every
/// store call is atomic; the engine-level race between reading one side and
/// inserting the match is the same one the Postgres store faces, and is
/// closed the same way, by `insert_or_get_match` being a single call.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Relations>,
}

#[derive(Default)]
struct Relations {
    listings: HashMap<Uuid, Listing>,
    renter_swipes: HashMap<RenterSwipeKey, RenterSwipe>,
    landlord_swipes: HashMap<LandlordSwipeKey, LandlordSwipe>,
    matches: HashMap<MatchKey, Match>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Relations> {
        // A poisoned mutex means a panic mid-update in this process; tests
        // should see that loudly rather than operate on torn state.
        self.inner.lock().expect("memory store mutex poisoned")
    }
}

#[async_trait]
impl SwipeStore for MemoryStore {
    async fn listing(&self, id: Uuid) -> Result<Option<Listing>, StoreError> {
        Ok(self.lock().listings.get(&id).cloned())
    }

    async fn create_listing(&self, listing: Listing) -> Result<Listing, StoreError> {
        self.lock().listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn upsert_renter_swipe(
        &self,
        key: RenterSwipeKey,
        direction: SwipeDirection,
        viewed_at: DateTime<Utc>,
    ) -> Result<RenterSwipe, StoreError> {
        let mut relations = self.lock();
        let swipe = relations
            .renter_swipes
            .entry(key)
            .and_modify(|swipe| {
                swipe.direction = direction;
                swipe.viewed_at = viewed_at;
            })
            .or_insert_with(|| RenterSwipe {
                listing_id: key.listing_id,
                renter_id: key.renter_id,
                direction,
                viewed_at,
            });
        Ok(swipe.clone())
    }

    async fn renter_swipe(&self, key: RenterSwipeKey) -> Result<Option<RenterSwipe>, StoreError> {
        Ok(self.lock().renter_swipes.get(&key).cloned())
    }

    async fn upsert_landlord_swipe(
        &self,
        key: LandlordSwipeKey,
        direction: SwipeDirection,
        viewed_at: DateTime<Utc>,
    ) -> Result<LandlordSwipe, StoreError> {
        let mut relations = self.lock();
        let swipe = relations
            .landlord_swipes
            .entry(key)
            .and_modify(|swipe| {
                swipe.direction = direction;
                swipe.viewed_at = viewed_at;
            })
            .or_insert_with(|| LandlordSwipe {
                listing_id: key.listing_id,
                renter_id: key.renter_id,
                landlord_id: key.landlord_id,
                direction,
                viewed_at,
            });
        Ok(swipe.clone())
    }

    async fn landlord_swipe(
        &self,
        key: LandlordSwipeKey,
    ) -> Result<Option<LandlordSwipe>, StoreError> {
        Ok(self.lock().landlord_swipes.get(&key).cloned())
    }

    async fn insert_or_get_match(
        &self,
        key: MatchKey,
        id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<MatchUpsert, StoreError> {
        let mut relations = self.lock();
        match relations.matches.entry(key) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                Ok(MatchUpsert::AlreadyExists(entry.get().clone()))
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                let created = entry
                    .insert(Match {
                        id,
                        listing_id: key.listing_id,
                        renter_id: key.renter_id,
                        landlord_id: key.landlord_id,
                        created_at,
                    })
                    .clone();
                Ok(MatchUpsert::Created(created))
            }
        }
    }

    async fn matches_for_user(&self, user_id: Uuid) -> Result<Vec<Match>, StoreError> {
        let relations = self.lock();
        let mut matches: Vec<Match> = relations
            .matches
            .values()
            .filter(|m| m.renter_id == user_id || m.landlord_id == user_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn interested_renters(&self, landlord_id: Uuid) -> Result<Vec<RenterSwipe>, StoreError> {
        let relations = self.lock();
        let mut interested: Vec<RenterSwipe> = relations
            .renter_swipes
            .values()
            .filter(|swipe| swipe.direction.is_right())
            .filter(|swipe| {
                relations
                    .listings
                    .get(&swipe.listing_id)
                    .is_some_and(|listing| listing.landlord_id == landlord_id)
            })
            .cloned()
            .collect();
        interested.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));
        Ok(interested)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(landlord_id: Uuid) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            landlord_id,
            title: "Bright Downtown Loft".to_string(),
            price_monthly: 2650,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_renter_upsert_keeps_single_row() {
        let store = MemoryStore::new();
        let key = RenterSwipeKey {
            listing_id: Uuid::new_v4(),
            renter_id: Uuid::new_v4(),
        };

        store
            .upsert_renter_swipe(key, SwipeDirection::Left, Utc::now())
            .await
            .unwrap();
        let updated = store
            .upsert_renter_swipe(key, SwipeDirection::Right, Utc::now())
            .await
            .unwrap();

        assert_eq!(updated.direction, SwipeDirection::Right);
        assert_eq!(store.lock().renter_swipes.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_or_get_match_returns_first_row() {
        let store = MemoryStore::new();
        let key = MatchKey {
            listing_id: Uuid::new_v4(),
            renter_id: Uuid::new_v4(),
            landlord_id: Uuid::new_v4(),
        };

        let first = store
            .insert_or_get_match(key, Uuid::new_v4(), Utc::now())
            .await
            .unwrap();
        let second = store
            .insert_or_get_match(key, Uuid::new_v4(), Utc::now())
            .await
            .unwrap();

        assert!(first.is_new());
        assert!(!second.is_new());
        assert_eq!(first.into_match().id, second.into_match().id);
    }

    #[tokio::test]
    async fn test_interested_renters_skips_left_swipes() {
        let store = MemoryStore::new();
        let landlord_id = Uuid::new_v4();
        let listing = store.create_listing(listing(landlord_id)).await.unwrap();

        let keen = RenterSwipeKey {
            listing_id: listing.id,
            renter_id: Uuid::new_v4(),
        };
        let pass = RenterSwipeKey {
            listing_id: listing.id,
            renter_id: Uuid::new_v4(),
        };
        store
            .upsert_renter_swipe(keen, SwipeDirection::Right, Utc::now())
            .await
            .unwrap();
        store
            .upsert_renter_swipe(pass, SwipeDirection::Left, Utc::now())
            .await
            .unwrap();

        let interested = store.interested_renters(landlord_id).await.unwrap();
        assert_eq!(interested.len(), 1);
        assert_eq!(interested[0].renter_id, keen.renter_id);
    }
}
