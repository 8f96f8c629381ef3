use crate::models::{LandlordSwipe, RenterSwipe};

/// Match formation rule
///
/// Mutual interest exists for a (listing, renter, landlord) triple when the
/// renter-side swipe and the landlord-side swipe both exist with direction
/// RIGHT. Pure decision over the rows the caller read; the atomic
/// insert-or-get on the matches relation is what makes acting on it safe
/// under concurrent reconciliations.
pub fn mutual_interest(renter: Option<&RenterSwipe>, landlord: Option<&LandlordSwipe>) -> bool {
    let renter_right = renter.is_some_and(|swipe| swipe.direction.is_right());
    let landlord_right = landlord.is_some_and(|swipe| swipe.direction.is_right());

    renter_right && landlord_right
}
