pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod mentorship;
pub mod product;
pub mod profile;
