//! Seeding the database from the remote product transaction dataset.

mod client;
mod endpoint;

pub use client::{DEFAULT_SEED_URL, SeedClient, seed_database};
pub use endpoint::get_initialize;
