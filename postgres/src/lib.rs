//! Postgres access shared by the sync job and the read API.

pub mod schema;
pub mod statements;
