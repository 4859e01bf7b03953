//! Bazaar server library.
//!
//! This crate provides the storefront backend as a library, allowing it to
//! be tested and reused by the binary and the integration-test crate.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API to the Telegram bot front-end
//! - `PostgreSQL` via sqlx for users, catalog, baskets, and orders
//! - Telegram Bot API for outbound order notifications
//!
//! The consistency core lives in [`services`]: the basket ledger, the
//! transactional order assembler, and the order status machine. Services
//! return notification payloads instead of sending anything themselves;
//! route handlers dispatch them after the transaction commits.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod telegram;
