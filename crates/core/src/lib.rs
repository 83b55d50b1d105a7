//! Domain model for the talentdesk recruiting platform.
//!
//! Pure types, key builders, state machines and validation, plus the traits
//! the server implements for storage and the external managed services.

pub mod applications;
pub mod collaborators;
pub mod email;
pub mod http_mapping;
pub mod jobs;
pub mod lifecycle;
pub mod schema;
pub mod serde;
pub mod storage;
pub mod users;
