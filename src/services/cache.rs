use std::time::Duration;
use uuid::Uuid;

use crate::models::Listing;

/// In-process cache for listing lookups
///
/// Listings are immutable once swipes reference them, so every reconciliation
/// can serve the resolve step from memory after the first hit. Absent
/// listings are not cached: a listing created moments later must become
/// visible on the next swipe.
#[derive(Clone)]
pub struct ListingCache {
    listings: moka::future::Cache<Uuid, Listing>,
}

impl ListingCache {
    /// Create a cache holding up to `capacity` listings for `ttl_secs`
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let listings = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { listings }
    }

    pub async fn get(&self, id: Uuid) -> Option<Listing> {
        let hit = self.listings.get(&id).await;
        if hit.is_some() {
            tracing::trace!("Listing cache hit: {}", id);
        } else {
            tracing::trace!("Listing cache miss: {}", id);
        }
        hit
    }

    pub async fn insert(&self, listing: Listing) {
        self.listings.insert(listing.id, listing).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn listing() -> Listing {
        Listing {
            id: Uuid::new_v4(),
            landlord_id: Uuid::new_v4(),
            title: "Garden Studio".to_string(),
            price_monthly: 1800,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_cache_round_trip() {
        let cache = ListingCache::new(100, 60);
        let listing = listing();

        assert!(cache.get(listing.id).await.is_none());
        cache.insert(listing.clone()).await;

        let cached = cache.get(listing.id).await.unwrap();
        assert_eq!(cached.landlord_id, listing.landlord_id);
    }
}
