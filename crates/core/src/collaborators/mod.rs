//! Capabilities of the external managed services: identity, object storage
//! and email. Implementations live with the server.

mod error;
mod traits;
mod types;

pub use error::{CollaboratorError, Result};
pub use traits::{EmailSender, IdentityProvider, ObjectStorage};
pub use types::{
    EmailMessage, IdentityRegistration, PresignedTarget, RegisteredIdentity, UploadRequest,
};
