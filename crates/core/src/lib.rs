//! Bazaar Core - Shared domain types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `server` - Storefront backend serving the Telegram bot front-end
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain rules - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, the catalog pricing
//!   rule, order statuses, and locales

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
