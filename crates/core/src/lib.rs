//! Domain rules for the Launchpad platform.
//!
//! Everything in this crate is pure: no I/O, no database, no HTTP. The
//! persistence and API crates load snapshots, ask these modules for a
//! decision, and apply it.
//!
//! - [`access`] -- visibility and mutation predicates for each role.
//! - [`product`] -- product submission validation and status transitions.
//! - [`mentorship`] -- mentor assignment and mentorship status transitions.
//! - [`dashboard`] -- counts-by-status and derived metrics.

pub mod access;
pub mod dashboard;
pub mod error;
pub mod mentorship;
pub mod product;
pub mod roles;
pub mod status;
pub mod types;
