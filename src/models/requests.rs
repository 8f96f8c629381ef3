use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to submit a swipe from either side
///
/// `actorRole` and `direction` arrive as strings and are parsed explicitly
/// in the handler so unknown values produce a clear 400.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitSwipeRequest {
    #[serde(alias = "actor_id", rename = "actorId")]
    pub actor_id: Uuid,
    #[validate(length(min = 1))]
    #[serde(alias = "actor_role", rename = "actorRole")]
    pub actor_role: String,
    #[serde(alias = "listing_id", rename = "listingId")]
    pub listing_id: Uuid,
    #[serde(default)]
    #[serde(alias = "renter_id", rename = "renterId")]
    pub renter_id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub direction: String,
}

/// Request to create a listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[serde(alias = "landlord_id", rename = "landlordId")]
    pub landlord_id: Uuid,
    #[validate(length(min = 3))]
    pub title: String,
    #[validate(range(min = 1))]
    #[serde(alias = "price_monthly", rename = "priceMonthly")]
    pub price_monthly: i32,
}
