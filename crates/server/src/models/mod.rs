//! Domain models and per-endpoint read/write structs.
//!
//! Row types (what sqlx reads) live in `crate::db`; the structs here are the
//! shapes services and routes exchange, decoupled from the storage schema.

pub mod basket;
pub mod catalog;
pub mod notification;
pub mod order;
pub mod user;
