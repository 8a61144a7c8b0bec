//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod defect_repo;
pub mod event_repo;
pub mod frame_repo;
pub mod session_repo;

pub use defect_repo::DefectRepo;
pub use event_repo::EventRepo;
pub use frame_repo::FrameRepo;
pub use session_repo::SessionRepo;
