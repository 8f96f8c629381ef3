use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::core::formation::mutual_interest;
use crate::models::{
    ActorRole, LandlordSwipeKey, Listing, MatchKey, RenterSwipeKey, SwipeEvent, SwipeOutcome,
};
use crate::services::cache::ListingCache;
use crate::services::store::{StoreError, SwipeStore};

/// Errors surfaced by a reconciliation call
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Listing {0} not found")]
    ListingNotFound(Uuid),

    #[error("Listing {listing_id} is not owned by {actor_id}")]
    NotListingOwner { listing_id: Uuid, actor_id: Uuid },

    #[error("Landlord swipes must name a renter")]
    MissingRenter,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Swipe Reconciliation Engine
///
/// Sole owner of writes to the swipe relations and the matches relation.
/// A single call takes one swipe event from either side, refreshes that
/// side's row in place, and forms the match the instant both sides are
/// RIGHT. Matching is one-way: once a match row exists, later swipes on
/// the triple (including LEFT flips) leave it untouched.
///
/// No retries happen here. Every operation is idempotent, so callers can
/// retry a failed call wholesale.
pub struct Reconciler<S> {
    store: Arc<S>,
    cache: ListingCache,
}

impl<S: SwipeStore> Reconciler<S> {
    pub fn new(store: Arc<S>, cache: ListingCache) -> Self {
        Self { store, cache }
    }

    /// Reconcile one incoming swipe from either side
    pub async fn submit(&self, event: SwipeEvent) -> Result<SwipeOutcome, ReconcileError> {
        match event.actor_role {
            ActorRole::Renter => self.reconcile_renter(event).await,
            ActorRole::Landlord => self.reconcile_landlord(event).await,
        }
    }

    /// Renter swipes a listing. The landlord is implied by the listing, so
    /// the swipe row itself stays landlord-agnostic.
    async fn reconcile_renter(&self, event: SwipeEvent) -> Result<SwipeOutcome, ReconcileError> {
        let listing = self.resolve_listing(event.listing_id).await?;
        let renter_id = event.actor_id;

        let key = RenterSwipeKey {
            listing_id: listing.id,
            renter_id,
        };
        let swipe = self
            .store
            .upsert_renter_swipe(key, event.direction, Utc::now())
            .await?;

        if !swipe.direction.is_right() {
            return Ok(SwipeOutcome::unmatched());
        }

        let landlord_side = self
            .store
            .landlord_swipe(LandlordSwipeKey {
                listing_id: listing.id,
                renter_id,
                landlord_id: listing.landlord_id,
            })
            .await?;

        if !mutual_interest(Some(&swipe), landlord_side.as_ref()) {
            return Ok(SwipeOutcome::unmatched());
        }

        self.form_match(MatchKey {
            listing_id: listing.id,
            renter_id,
            landlord_id: listing.landlord_id,
        })
        .await
    }

    /// Landlord swipes a renter who applied to one of their listings. The
    /// ownership check runs before anything is written.
    async fn reconcile_landlord(&self, event: SwipeEvent) -> Result<SwipeOutcome, ReconcileError> {
        let listing = self.resolve_listing(event.listing_id).await?;

        if listing.landlord_id != event.actor_id {
            return Err(ReconcileError::NotListingOwner {
                listing_id: listing.id,
                actor_id: event.actor_id,
            });
        }

        let renter_id = event.renter_id.ok_or(ReconcileError::MissingRenter)?;

        let key = LandlordSwipeKey {
            listing_id: listing.id,
            renter_id,
            landlord_id: event.actor_id,
        };
        let swipe = self
            .store
            .upsert_landlord_swipe(key, event.direction, Utc::now())
            .await?;

        if !swipe.direction.is_right() {
            return Ok(SwipeOutcome::unmatched());
        }

        let renter_side = self
            .store
            .renter_swipe(RenterSwipeKey {
                listing_id: listing.id,
                renter_id,
            })
            .await?;

        if !mutual_interest(renter_side.as_ref(), Some(&swipe)) {
            return Ok(SwipeOutcome::unmatched());
        }

        self.form_match(MatchKey {
            listing_id: listing.id,
            renter_id,
            landlord_id: event.actor_id,
        })
        .await
    }

    async fn resolve_listing(&self, id: Uuid) -> Result<Listing, ReconcileError> {
        if let Some(listing) = self.cache.get(id).await {
            return Ok(listing);
        }

        let listing = self
            .store
            .listing(id)
            .await?
            .ok_or(ReconcileError::ListingNotFound(id))?;

        self.cache.insert(listing.clone()).await;
        Ok(listing)
    }

    /// Bring the match for the triple into existence, or retrieve the one a
    /// concurrent reconciliation already created. The fresh id is discarded
    /// when the row already exists.
    async fn form_match(&self, key: MatchKey) -> Result<SwipeOutcome, ReconcileError> {
        let upsert = self
            .store
            .insert_or_get_match(key, Uuid::new_v4(), Utc::now())
            .await?;

        if upsert.is_new() {
            tracing::info!(
                "Match formed: renter {} and landlord {} on listing {}",
                key.renter_id,
                key.landlord_id,
                key.listing_id
            );
        } else {
            tracing::debug!(
                "Match already present for renter {} on listing {}",
                key.renter_id,
                key.listing_id
            );
        }

        Ok(SwipeOutcome {
            match_record: Some(upsert.into_match()),
        })
    }
}
