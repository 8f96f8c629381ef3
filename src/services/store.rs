use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    LandlordSwipe, LandlordSwipeKey, Listing, Match, MatchKey, MatchUpsert, RenterSwipe,
    RenterSwipeKey, SwipeDirection,
};

/// Errors that can occur in the swipe/match store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Persistence contract for the swipe ledger and the matches relation
///
/// The renter-side and landlord-side swipes are two separate relations with
/// their own unique keys; both upserts and `insert_or_get_match` must be
/// atomic per key so concurrent reconciliations cannot duplicate rows.
#[async_trait]
pub trait SwipeStore: Send + Sync + 'static {
    /// Point lookup of a listing.
    async fn listing(&self, id: Uuid) -> Result<Option<Listing>, StoreError>;

    /// Insert a new listing.
    async fn create_listing(&self, listing: Listing) -> Result<Listing, StoreError>;

    /// Find-or-create-then-update on the (listing, renter) key. Returns the
    /// row as it stands after the call.
    async fn upsert_renter_swipe(
        &self,
        key: RenterSwipeKey,
        direction: SwipeDirection,
        viewed_at: DateTime<Utc>,
    ) -> Result<RenterSwipe, StoreError>;

    /// Point lookup on the (listing, renter) key.
    async fn renter_swipe(&self, key: RenterSwipeKey) -> Result<Option<RenterSwipe>, StoreError>;

    /// Find-or-create-then-update on the (listing, renter, landlord) key.
    async fn upsert_landlord_swipe(
        &self,
        key: LandlordSwipeKey,
        direction: SwipeDirection,
        viewed_at: DateTime<Utc>,
    ) -> Result<LandlordSwipe, StoreError>;

    /// Point lookup on the (listing, renter, landlord) key.
    async fn landlord_swipe(
        &self,
        key: LandlordSwipeKey,
    ) -> Result<Option<LandlordSwipe>, StoreError>;

    /// Atomic insert-or-retrieve on the unique match triple. `id` and
    /// `created_at` are used only when this call creates the row; if another
    /// writer got there first the existing row is returned unchanged.
    async fn insert_or_get_match(
        &self,
        key: MatchKey,
        id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<MatchUpsert, StoreError>;

    /// Matches where the user is the renter or the landlord, newest first.
    async fn matches_for_user(&self, user_id: Uuid) -> Result<Vec<Match>, StoreError>;

    /// Renter-side RIGHT swipes on the landlord's listings, newest first.
    async fn interested_renters(&self, landlord_id: Uuid) -> Result<Vec<RenterSwipe>, StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn health_check(&self) -> Result<bool, StoreError>;
}
