//! Domain services.
//!
//! Services own validation, transaction boundaries, and the assembly of
//! notification payloads; repositories underneath own the SQL. Services
//! never perform network I/O — side effects come back to the caller as
//! payload values.

pub mod basket;
pub mod catalog;
pub mod orders;
pub mod users;

pub use basket::BasketService;
pub use catalog::CatalogService;
pub use orders::OrderService;
pub use users::UserService;
