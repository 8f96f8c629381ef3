// Unit tests for Pillow Match

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use pillow_match::core::{mutual_interest, ReconcileError, Reconciler};
use pillow_match::models::{ActorRole, Listing, SwipeDirection, SwipeEvent};
use pillow_match::services::{ListingCache, MemoryStore, SwipeStore};

fn engine() -> (Arc<MemoryStore>, Reconciler<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let reconciler = Reconciler::new(store.clone(), ListingCache::new(128, 60));
    (store, reconciler)
}

async fn seed_listing(store: &MemoryStore, landlord_id: Uuid) -> Listing {
    store
        .create_listing(Listing {
            id: Uuid::new_v4(),
            landlord_id,
            title: "Quiet Garden Flat".to_string(),
            price_monthly: 1750,
            created_at: Utc::now(),
        })
        .await
        .unwrap()
}

fn renter_event(renter_id: Uuid, listing_id: Uuid, direction: SwipeDirection) -> SwipeEvent {
    SwipeEvent {
        actor_id: renter_id,
        actor_role: ActorRole::Renter,
        listing_id,
        renter_id: None,
        direction,
    }
}

fn landlord_event(
    landlord_id: Uuid,
    listing_id: Uuid,
    renter_id: Uuid,
    direction: SwipeDirection,
) -> SwipeEvent {
    SwipeEvent {
        actor_id: landlord_id,
        actor_role: ActorRole::Landlord,
        listing_id,
        renter_id: Some(renter_id),
        direction,
    }
}

#[test]
fn test_formation_requires_both_sides_right() {
    assert!(!mutual_interest(None, None));
}

#[tokio::test]
async fn test_identical_swipes_are_idempotent() {
    let (store, reconciler) = engine();
    let landlord_id = Uuid::new_v4();
    let renter_id = Uuid::new_v4();
    let listing = seed_listing(&store, landlord_id).await;

    let first = reconciler
        .submit(renter_event(renter_id, listing.id, SwipeDirection::Right))
        .await
        .unwrap();
    let second = reconciler
        .submit(renter_event(renter_id, listing.id, SwipeDirection::Right))
        .await
        .unwrap();

    assert!(!first.matched());
    assert!(!second.matched());

    // Exactly one renter-side row for the pair, no matter how often it is
    // resubmitted.
    let interested = store.interested_renters(landlord_id).await.unwrap();
    assert_eq!(interested.len(), 1);
}

#[tokio::test]
async fn test_reswipe_updates_direction_in_place() {
    let (store, reconciler) = engine();
    let landlord_id = Uuid::new_v4();
    let renter_id = Uuid::new_v4();
    let listing = seed_listing(&store, landlord_id).await;

    reconciler
        .submit(renter_event(renter_id, listing.id, SwipeDirection::Left))
        .await
        .unwrap();
    assert!(store.interested_renters(landlord_id).await.unwrap().is_empty());

    reconciler
        .submit(renter_event(renter_id, listing.id, SwipeDirection::Right))
        .await
        .unwrap();

    let interested = store.interested_renters(landlord_id).await.unwrap();
    assert_eq!(interested.len(), 1);
    assert_eq!(interested[0].direction, SwipeDirection::Right);
}

#[tokio::test]
async fn test_no_match_from_renter_side_alone() {
    let (store, reconciler) = engine();
    let renter_id = Uuid::new_v4();
    let listing = seed_listing(&store, Uuid::new_v4()).await;

    let outcome = reconciler
        .submit(renter_event(renter_id, listing.id, SwipeDirection::Right))
        .await
        .unwrap();

    assert!(!outcome.matched());
    assert!(store.matches_for_user(renter_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_no_match_from_landlord_side_alone() {
    let (store, reconciler) = engine();
    let landlord_id = Uuid::new_v4();
    let renter_id = Uuid::new_v4();
    let listing = seed_listing(&store, landlord_id).await;

    let outcome = reconciler
        .submit(landlord_event(
            landlord_id,
            listing.id,
            renter_id,
            SwipeDirection::Right,
        ))
        .await
        .unwrap();

    assert!(!outcome.matched());
    assert!(store.matches_for_user(landlord_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_left_swipe_blocks_match_until_reswiped() {
    let (store, reconciler) = engine();
    let landlord_id = Uuid::new_v4();
    let renter_id = Uuid::new_v4();
    let listing = seed_listing(&store, landlord_id).await;

    reconciler
        .submit(renter_event(renter_id, listing.id, SwipeDirection::Left))
        .await
        .unwrap();
    let outcome = reconciler
        .submit(landlord_event(
            landlord_id,
            listing.id,
            renter_id,
            SwipeDirection::Right,
        ))
        .await
        .unwrap();
    assert!(!outcome.matched());

    // The renter changing their mind completes the pair.
    let outcome = reconciler
        .submit(renter_event(renter_id, listing.id, SwipeDirection::Right))
        .await
        .unwrap();
    assert!(outcome.matched());
}

#[tokio::test]
async fn test_foreign_landlord_is_rejected_without_writes() {
    let (store, reconciler) = engine();
    let owner_id = Uuid::new_v4();
    let renter_id = Uuid::new_v4();
    let listing = seed_listing(&store, owner_id).await;

    reconciler
        .submit(renter_event(renter_id, listing.id, SwipeDirection::Right))
        .await
        .unwrap();

    let result = reconciler
        .submit(landlord_event(
            Uuid::new_v4(),
            listing.id,
            renter_id,
            SwipeDirection::Right,
        ))
        .await;
    assert!(matches!(result, Err(ReconcileError::NotListingOwner { .. })));

    // The rejected swipe must not have completed the pair: the real owner
    // swiping RIGHT is still the first landlord-side row.
    let outcome = reconciler
        .submit(landlord_event(
            owner_id,
            listing.id,
            renter_id,
            SwipeDirection::Right,
        ))
        .await
        .unwrap();
    assert!(outcome.matched());
    assert_eq!(outcome.match_record.unwrap().landlord_id, owner_id);
}

#[tokio::test]
async fn test_landlord_swipe_without_renter_is_bad_request() {
    let (store, reconciler) = engine();
    let landlord_id = Uuid::new_v4();
    let listing = seed_listing(&store, landlord_id).await;

    let result = reconciler
        .submit(SwipeEvent {
            actor_id: landlord_id,
            actor_role: ActorRole::Landlord,
            listing_id: listing.id,
            renter_id: None,
            direction: SwipeDirection::Right,
        })
        .await;

    assert!(matches!(result, Err(ReconcileError::MissingRenter)));
}

#[tokio::test]
async fn test_unknown_listing_is_not_found_for_both_roles() {
    let (_, reconciler) = engine();
    let missing = Uuid::new_v4();

    let renter = reconciler
        .submit(renter_event(Uuid::new_v4(), missing, SwipeDirection::Right))
        .await;
    assert!(matches!(renter, Err(ReconcileError::ListingNotFound(id)) if id == missing));

    let landlord = reconciler
        .submit(landlord_event(
            Uuid::new_v4(),
            missing,
            Uuid::new_v4(),
            SwipeDirection::Right,
        ))
        .await;
    assert!(matches!(landlord, Err(ReconcileError::ListingNotFound(id)) if id == missing));
}
