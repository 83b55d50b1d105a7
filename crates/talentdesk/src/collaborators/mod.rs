//! Implementations of the external collaborator traits.
//!
//! - `http`: gateway client used when `GATEWAY_URL` is configured
//! - `mock`: recording stand-ins for tests and local development
//! - `s3`: presigned resume storage when `RESUME_BUCKET` is set (feature `s3`)

pub mod http;
pub mod mock;
#[cfg(feature = "s3")]
pub mod s3;

pub use http::GatewayClient;
pub use mock::{MockEmailSender, MockIdentityProvider, MockObjectStorage};
#[cfg(feature = "s3")]
pub use s3::S3ObjectStorage;
