use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::{ReconcileError, Reconciler};
use crate::models::{
    ActorRole, CreateListingRequest, ErrorResponse, HealthResponse, InterestedRentersResponse,
    Listing, MatchesResponse, SubmitSwipeRequest, SubmitSwipeResponse, SwipeDirection, SwipeEvent,
};
use crate::services::{ListingCache, PostgresStore, SwipeStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostgresStore>,
    pub cache: ListingCache,
    pub reconciler: Arc<Reconciler<PostgresStore>>,
}

/// Configure all swipe and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/swipes", web::post().to(submit_swipe))
        .route("/matches", web::get().to(get_matches))
        .route("/listings", web::post().to(create_listing))
        .route("/listings/interested", web::get().to(get_interested_renters));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Submit a swipe from either side
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// {
///   "actorId": "uuid",
///   "actorRole": "RENTER|LANDLORD",
///   "listingId": "uuid",
///   "renterId": "uuid (landlord role only)",
///   "direction": "LEFT|RIGHT"
/// }
/// ```
async fn submit_swipe(
    state: web::Data<AppState>,
    req: web::Json<SubmitSwipeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let actor_role = match parse_actor_role(&req.actor_role) {
        Some(role) => role,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid actor role".to_string(),
                message: "Actor role must be one of: RENTER, LANDLORD".to_string(),
                status_code: 400,
            });
        }
    };

    let direction = match parse_direction(&req.direction) {
        Some(direction) => direction,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid direction".to_string(),
                message: "Direction must be one of: LEFT, RIGHT".to_string(),
                status_code: 400,
            });
        }
    };

    let event = SwipeEvent {
        actor_id: req.actor_id,
        actor_role,
        listing_id: req.listing_id,
        renter_id: req.renter_id,
        direction,
    };

    match state.reconciler.submit(event).await {
        Ok(outcome) => {
            HttpResponse::Ok().json(SubmitSwipeResponse::from_match(outcome.match_record.as_ref()))
        }
        Err(err @ ReconcileError::ListingNotFound(_)) => {
            HttpResponse::NotFound().json(ErrorResponse {
                error: "Listing not found".to_string(),
                message: err.to_string(),
                status_code: 404,
            })
        }
        Err(err @ ReconcileError::NotListingOwner { .. }) => {
            HttpResponse::Forbidden().json(ErrorResponse {
                error: "Forbidden".to_string(),
                message: err.to_string(),
                status_code: 403,
            })
        }
        Err(err @ ReconcileError::MissingRenter) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Missing renter".to_string(),
            message: err.to_string(),
            status_code: 400,
        }),
        Err(ReconcileError::Store(err)) => {
            tracing::error!("Failed to reconcile swipe: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record swipe".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

/// List a user's matches, from either side of the marketplace
///
/// GET /api/v1/matches?userId={userId}
async fn get_matches(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let user_id = match parse_id_param(&query, "userId") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.store.matches_for_user(user_id).await {
        Ok(matches) => {
            let count = matches.len();
            HttpResponse::Ok().json(MatchesResponse {
                user_id,
                matches,
                count,
            })
        }
        Err(err) => {
            tracing::error!("Failed to fetch matches for {}: {}", user_id, err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch matches".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

/// List renters who swiped right on a landlord's listings
///
/// GET /api/v1/listings/interested?landlordId={landlordId}
async fn get_interested_renters(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let landlord_id = match parse_id_param(&query, "landlordId") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.store.interested_renters(landlord_id).await {
        Ok(interested) => {
            let count = interested.len();
            HttpResponse::Ok().json(InterestedRentersResponse {
                landlord_id,
                interested,
                count,
            })
        }
        Err(err) => {
            tracing::error!(
                "Failed to fetch interested renters for {}: {}",
                landlord_id,
                err
            );
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch interested renters".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Create a listing
///
/// POST /api/v1/listings
async fn create_listing(
    state: web::Data<AppState>,
    req: web::Json<CreateListingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let listing = Listing {
        id: Uuid::new_v4(),
        landlord_id: req.landlord_id,
        title: req.title.clone(),
        price_monthly: req.price_monthly,
        created_at: Utc::now(),
    };

    match state.store.create_listing(listing).await {
        Ok(listing) => {
            // Warm the resolve path for the swipes that follow.
            state.cache.insert(listing.clone()).await;
            HttpResponse::Created().json(listing)
        }
        Err(err) => {
            tracing::error!("Failed to create listing: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to create listing".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

fn parse_actor_role(raw: &str) -> Option<ActorRole> {
    match raw.to_uppercase().as_str() {
        "RENTER" => Some(ActorRole::Renter),
        "LANDLORD" => Some(ActorRole::Landlord),
        _ => None,
    }
}

fn parse_direction(raw: &str) -> Option<SwipeDirection> {
    match raw.to_uppercase().as_str() {
        "LEFT" => Some(SwipeDirection::Left),
        "RIGHT" => Some(SwipeDirection::Right),
        _ => None,
    }
}

fn parse_id_param(
    query: &std::collections::HashMap<String, String>,
    name: &str,
) -> Result<Uuid, HttpResponse> {
    let raw = query.get(name).ok_or_else(|| {
        HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("Missing {} parameter", name),
            message: format!("{} query parameter is required", name),
            status_code: 400,
        })
    })?;

    Uuid::parse_str(raw).map_err(|_| {
        HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("Invalid {} parameter", name),
            message: format!("{} must be a UUID", name),
            status_code: 400,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_parse_actor_role_accepts_known_roles_only() {
        assert_eq!(parse_actor_role("RENTER"), Some(ActorRole::Renter));
        assert_eq!(parse_actor_role("landlord"), Some(ActorRole::Landlord));
        assert_eq!(parse_actor_role("ADMIN"), None);
        assert_eq!(parse_actor_role(""), None);
    }

    #[test]
    fn test_parse_direction_accepts_known_directions_only() {
        assert_eq!(parse_direction("LEFT"), Some(SwipeDirection::Left));
        assert_eq!(parse_direction("right"), Some(SwipeDirection::Right));
        assert_eq!(parse_direction("UP"), None);
    }

    #[test]
    fn test_parse_id_param() {
        let mut query = std::collections::HashMap::new();
        query.insert("userId".to_string(), Uuid::new_v4().to_string());
        assert!(parse_id_param(&query, "userId").is_ok());

        query.insert("userId".to_string(), "not-a-uuid".to_string());
        assert!(parse_id_param(&query, "userId").is_err());
        assert!(parse_id_param(&query, "landlordId").is_err());
    }
}
