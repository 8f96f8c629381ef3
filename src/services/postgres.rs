use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::models::{
    LandlordSwipe, LandlordSwipeKey, Listing, Match, MatchKey, MatchUpsert, RenterSwipe,
    RenterSwipeKey, SwipeDirection,
};
use crate::services::store::{StoreError, SwipeStore};

/// PostgreSQL-backed swipe ledger and match store
///
/// All upserts go through `INSERT .. ON CONFLICT` so each unique key holds
/// exactly one row no matter how the writes interleave. The match relation
/// additionally carries a unique constraint on the
/// (listing_id, renter_id, landlord_id) triple, which is what makes
/// `insert_or_get_match` safe under concurrent reconciliations.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL with URL: {}", url);

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    fn listing_from_row(row: &sqlx::postgres::PgRow) -> Listing {
        Listing {
            id: row.get("id"),
            landlord_id: row.get("landlord_id"),
            title: row.get("title"),
            price_monthly: row.get("price_monthly"),
            created_at: row.get("created_at"),
        }
    }

    fn renter_swipe_from_row(row: &sqlx::postgres::PgRow) -> RenterSwipe {
        RenterSwipe {
            listing_id: row.get("listing_id"),
            renter_id: row.get("renter_id"),
            direction: row.get("direction"),
            viewed_at: row.get("viewed_at"),
        }
    }

    fn match_from_row(row: &sqlx::postgres::PgRow) -> Match {
        Match {
            id: row.get("id"),
            listing_id: row.get("listing_id"),
            renter_id: row.get("renter_id"),
            landlord_id: row.get("landlord_id"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl SwipeStore for PostgresStore {
    async fn listing(&self, id: Uuid) -> Result<Option<Listing>, StoreError> {
        let query = r#"
            SELECT id, landlord_id, title, price_monthly, created_at
            FROM listings
            WHERE id = $1
        "#;

        let row = sqlx::query(query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.as_ref().map(Self::listing_from_row))
    }

    async fn create_listing(&self, listing: Listing) -> Result<Listing, StoreError> {
        let query = r#"
            INSERT INTO listings (id, landlord_id, title, price_monthly, created_at)
            VALUES ($1, $2, $3, $4, $5)
        "#;

        sqlx::query(query)
            .bind(listing.id)
            .bind(listing.landlord_id)
            .bind(&listing.title)
            .bind(listing.price_monthly)
            .bind(listing.created_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Created listing {} for landlord {}", listing.id, listing.landlord_id);

        Ok(listing)
    }

    async fn upsert_renter_swipe(
        &self,
        key: RenterSwipeKey,
        direction: SwipeDirection,
        viewed_at: DateTime<Utc>,
    ) -> Result<RenterSwipe, StoreError> {
        let query = r#"
            INSERT INTO renter_swipes (listing_id, renter_id, direction, viewed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (listing_id, renter_id)
            DO UPDATE SET
                direction = EXCLUDED.direction,
                viewed_at = EXCLUDED.viewed_at
            RETURNING listing_id, renter_id, direction, viewed_at
        "#;

        let row = sqlx::query(query)
            .bind(key.listing_id)
            .bind(key.renter_id)
            .bind(direction)
            .bind(viewed_at)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded renter swipe: {} on listing {} ({:?})",
            key.renter_id,
            key.listing_id,
            direction
        );

        Ok(Self::renter_swipe_from_row(&row))
    }

    async fn renter_swipe(&self, key: RenterSwipeKey) -> Result<Option<RenterSwipe>, StoreError> {
        let query = r#"
            SELECT listing_id, renter_id, direction, viewed_at
            FROM renter_swipes
            WHERE listing_id = $1 AND renter_id = $2
        "#;

        let row = sqlx::query(query)
            .bind(key.listing_id)
            .bind(key.renter_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(Self::renter_swipe_from_row))
    }

    async fn upsert_landlord_swipe(
        &self,
        key: LandlordSwipeKey,
        direction: SwipeDirection,
        viewed_at: DateTime<Utc>,
    ) -> Result<LandlordSwipe, StoreError> {
        let query = r#"
            INSERT INTO landlord_swipes (listing_id, renter_id, landlord_id, direction, viewed_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (listing_id, renter_id, landlord_id)
            DO UPDATE SET
                direction = EXCLUDED.direction,
                viewed_at = EXCLUDED.viewed_at
            RETURNING listing_id, renter_id, landlord_id, direction, viewed_at
        "#;

        let row = sqlx::query(query)
            .bind(key.listing_id)
            .bind(key.renter_id)
            .bind(key.landlord_id)
            .bind(direction)
            .bind(viewed_at)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded landlord swipe: {} on renter {} for listing {} ({:?})",
            key.landlord_id,
            key.renter_id,
            key.listing_id,
            direction
        );

        Ok(LandlordSwipe {
            listing_id: row.get("listing_id"),
            renter_id: row.get("renter_id"),
            landlord_id: row.get("landlord_id"),
            direction: row.get("direction"),
            viewed_at: row.get("viewed_at"),
        })
    }

    async fn landlord_swipe(
        &self,
        key: LandlordSwipeKey,
    ) -> Result<Option<LandlordSwipe>, StoreError> {
        let query = r#"
            SELECT listing_id, renter_id, landlord_id, direction, viewed_at
            FROM landlord_swipes
            WHERE listing_id = $1 AND renter_id = $2 AND landlord_id = $3
        "#;

        let row = sqlx::query(query)
            .bind(key.listing_id)
            .bind(key.renter_id)
            .bind(key.landlord_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| LandlordSwipe {
            listing_id: row.get("listing_id"),
            renter_id: row.get("renter_id"),
            landlord_id: row.get("landlord_id"),
            direction: row.get("direction"),
            viewed_at: row.get("viewed_at"),
        }))
    }

    async fn insert_or_get_match(
        &self,
        key: MatchKey,
        id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<MatchUpsert, StoreError> {
        let insert = r#"
            INSERT INTO matches (id, listing_id, renter_id, landlord_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (listing_id, renter_id, landlord_id)
            DO NOTHING
            RETURNING id, listing_id, renter_id, landlord_id, created_at
        "#;

        let select = r#"
            SELECT id, listing_id, renter_id, landlord_id, created_at
            FROM matches
            WHERE listing_id = $1 AND renter_id = $2 AND landlord_id = $3
        "#;

        // Two rounds: a losing insert whose winner rolled back leaves both
        // steps empty, in which case the retry succeeds.
        for _ in 0..2 {
            let inserted = sqlx::query(insert)
                .bind(id)
                .bind(key.listing_id)
                .bind(key.renter_id)
                .bind(key.landlord_id)
                .bind(created_at)
                .fetch_optional(&self.pool)
                .await?;

            if let Some(row) = inserted {
                return Ok(MatchUpsert::Created(Self::match_from_row(&row)));
            }

            let existing = sqlx::query(select)
                .bind(key.listing_id)
                .bind(key.renter_id)
                .bind(key.landlord_id)
                .fetch_optional(&self.pool)
                .await?;

            if let Some(row) = existing {
                return Ok(MatchUpsert::AlreadyExists(Self::match_from_row(&row)));
            }
        }

        Err(StoreError::Conflict(format!(
            "match upsert raced twice for listing {} renter {}",
            key.listing_id, key.renter_id
        )))
    }

    async fn matches_for_user(&self, user_id: Uuid) -> Result<Vec<Match>, StoreError> {
        let query = r#"
            SELECT id, listing_id, renter_id, landlord_id, created_at
            FROM matches
            WHERE renter_id = $1 OR landlord_id = $1
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(Self::match_from_row).collect())
    }

    async fn interested_renters(&self, landlord_id: Uuid) -> Result<Vec<RenterSwipe>, StoreError> {
        let query = r#"
            SELECT rs.listing_id, rs.renter_id, rs.direction, rs.viewed_at
            FROM renter_swipes rs
            JOIN listings l ON l.id = rs.listing_id
            WHERE l.landlord_id = $1 AND rs.direction = 'right'
            ORDER BY rs.viewed_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(landlord_id)
            .fetch_all(&self.pool)
            .await?;

        let interested: Vec<RenterSwipe> = rows.iter().map(Self::renter_swipe_from_row).collect();

        tracing::debug!(
            "Landlord {} has {} interested renters",
            landlord_id,
            interested.len()
        );

        Ok(interested)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
