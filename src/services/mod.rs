// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::ListingCache;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{StoreError, SwipeStore};
