use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the marketplace the actor is swiping from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActorRole {
    Renter,
    Landlord,
}

/// Directional decision on a swipe card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "swipe_direction", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn is_right(self) -> bool {
        matches!(self, SwipeDirection::Right)
    }
}

/// Rental listing owned by a landlord
///
/// Immutable once swipes reference it, which is what makes the resolve-path
/// cache safe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    #[serde(rename = "landlordId")]
    pub landlord_id: Uuid,
    pub title: String,
    #[serde(rename = "priceMonthly")]
    pub price_monthly: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// The renter's decision about a listing
///
/// Landlord-agnostic: the renter swipes the listing, not its owner. At most
/// one row per (listing, renter); re-swipes refresh it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenterSwipe {
    #[serde(rename = "listingId")]
    pub listing_id: Uuid,
    #[serde(rename = "renterId")]
    pub renter_id: Uuid,
    pub direction: SwipeDirection,
    #[serde(rename = "viewedAt")]
    pub viewed_at: DateTime<Utc>,
}

/// The landlord's decision about a specific renter on one of their listings
///
/// At most one row per (listing, renter, landlord); re-swipes refresh it in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandlordSwipe {
    #[serde(rename = "listingId")]
    pub listing_id: Uuid,
    #[serde(rename = "renterId")]
    pub renter_id: Uuid,
    #[serde(rename = "landlordId")]
    pub landlord_id: Uuid,
    pub direction: SwipeDirection,
    #[serde(rename = "viewedAt")]
    pub viewed_at: DateTime<Utc>,
}

/// Lookup key for the renter-side relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenterSwipeKey {
    pub listing_id: Uuid,
    pub renter_id: Uuid,
}

/// Lookup key for the landlord-side relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LandlordSwipeKey {
    pub listing_id: Uuid,
    pub renter_id: Uuid,
    pub landlord_id: Uuid,
}

/// Unique identity of a match: listing, renter, and the listing's owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub listing_id: Uuid,
    pub renter_id: Uuid,
    pub landlord_id: Uuid,
}

/// Mutual acceptance between a renter and a landlord on one listing
///
/// Created exactly once per key, never mutated or deleted here. Message
/// threads attach to `id` downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    #[serde(rename = "listingId")]
    pub listing_id: Uuid,
    #[serde(rename = "renterId")]
    pub renter_id: Uuid,
    #[serde(rename = "landlordId")]
    pub landlord_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Result of the atomic insert-or-retrieve on the matches relation
///
/// Both variants carry the canonical row for the key; the tag tells the
/// caller whether this call brought it into existence.
#[derive(Debug, Clone)]
pub enum MatchUpsert {
    Created(Match),
    AlreadyExists(Match),
}

impl MatchUpsert {
    pub fn is_new(&self) -> bool {
        matches!(self, MatchUpsert::Created(_))
    }

    pub fn into_match(self) -> Match {
        match self {
            MatchUpsert::Created(m) | MatchUpsert::AlreadyExists(m) => m,
        }
    }
}

/// One incoming swipe from either side, normalized for the engine
#[derive(Debug, Clone)]
pub struct SwipeEvent {
    pub actor_id: Uuid,
    pub actor_role: ActorRole,
    pub listing_id: Uuid,
    /// Required for landlord swipes; ignored for renter swipes.
    pub renter_id: Option<Uuid>,
    pub direction: SwipeDirection,
}

/// What a reconciliation call produced
#[derive(Debug, Clone)]
pub struct SwipeOutcome {
    /// The match for the triple, present when both sides are RIGHT after
    /// this swipe.
    pub match_record: Option<Match>,
}

impl SwipeOutcome {
    pub fn unmatched() -> Self {
        Self { match_record: None }
    }

    pub fn matched(&self) -> bool {
        self.match_record.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_upsert_tags() {
        let m = Match {
            id: Uuid::new_v4(),
            listing_id: Uuid::new_v4(),
            renter_id: Uuid::new_v4(),
            landlord_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        assert!(MatchUpsert::Created(m.clone()).is_new());
        assert!(!MatchUpsert::AlreadyExists(m.clone()).is_new());
        assert_eq!(MatchUpsert::AlreadyExists(m.clone()).into_match().id, m.id);
    }

    #[test]
    fn test_direction_is_right() {
        assert!(SwipeDirection::Right.is_right());
        assert!(!SwipeDirection::Left.is_right());
    }
}
