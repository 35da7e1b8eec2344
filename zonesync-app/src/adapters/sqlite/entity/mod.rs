//! `SeaORM` entities for the `SQLite` store.

pub mod record;
pub mod zone;
