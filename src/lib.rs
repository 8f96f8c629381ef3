//! Pillow Match - swipe reconciliation and match formation for the Pillow rental app
//!
//! Renters swipe on listings, landlords swipe on renters who applied, and a
//! match comes into existence the instant both sides have a RIGHT swipe on
//! record. The engine guarantees at most one match per
//! (listing, renter, landlord) triple regardless of swipe order, repeats, or
//! concurrent arrivals.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{mutual_interest, ReconcileError, Reconciler};
pub use crate::models::{
    ActorRole, Listing, Match, SwipeDirection, SwipeEvent, SwipeOutcome,
};
pub use crate::services::{ListingCache, MemoryStore, PostgresStore, StoreError, SwipeStore};
