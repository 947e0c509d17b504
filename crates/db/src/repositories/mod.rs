//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument and the owning user's id
//! as the second.

pub mod idea_repo;
pub mod initiative_repo;
pub mod log_entry_repo;
pub mod vision_chat_repo;
pub mod vision_document_repo;
pub mod work_session_repo;

pub use idea_repo::IdeaRepo;
pub use initiative_repo::InitiativeRepo;
pub use log_entry_repo::LogEntryRepo;
pub use vision_chat_repo::VisionChatRepo;
pub use vision_document_repo::VisionDocumentRepo;
pub use work_session_repo::WorkSessionRepo;
