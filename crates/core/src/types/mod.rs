//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod locale;
pub mod price;
pub mod status;

pub use id::*;
pub use locale::Locale;
pub use price::{Pricing, PricingError};
pub use status::*;
