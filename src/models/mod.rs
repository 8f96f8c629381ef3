// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ActorRole, LandlordSwipe, LandlordSwipeKey, Listing, Match, MatchKey, MatchUpsert, RenterSwipe, RenterSwipeKey, SwipeDirection, SwipeEvent, SwipeOutcome};
pub use requests::{CreateListingRequest, SubmitSwipeRequest};
pub use responses::{ErrorResponse, HealthResponse, InterestedRentersResponse, MatchesResponse, SubmitSwipeResponse};
