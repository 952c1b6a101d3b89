//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod checklist_item_repo;
pub mod comment_repo;
pub mod inspection_repo;
pub mod photo_repo;
pub mod session_repo;
pub mod user_repo;

pub use checklist_item_repo::ChecklistItemRepo;
pub use comment_repo::CommentRepo;
pub use inspection_repo::InspectionRepo;
pub use photo_repo::PhotoRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
