//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod event_repo;
pub mod mentorship_repo;
pub mod product_repo;
pub mod session_repo;
pub mod user_repo;

pub use event_repo::EventRepo;
pub use mentorship_repo::MentorshipRepo;
pub use product_repo::ProductRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
