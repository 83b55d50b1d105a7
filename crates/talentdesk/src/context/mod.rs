//! Request-scoped context.
//!
//! Provides the [`Actor`] and [`OptionalActor`] extractors that resolve the
//! acting user for role-gated routes.

mod extractor;
mod types;

pub use extractor::USER_ID_HEADER;
pub use types::{Actor, OptionalActor};
