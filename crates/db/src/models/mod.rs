//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Serialize` response type where the row needs translating for clients
//! - Create/update DTOs consumed by the matching repository

pub mod event;
pub mod mentorship;
pub mod product;
pub mod session;
pub mod user;
