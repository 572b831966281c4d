// Service exports
pub mod cache;
pub mod directory;
pub mod postgres;

pub use cache::{CacheKey, SnapshotCache};
pub use directory::{DirectoryError, DirectorySource, FacilityDirectory, SeedData};
pub use postgres::{PostgresClient, PostgresError};
