//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of the repository traits
//! using `aws-sdk-dynamodb`. All entities share one table; see
//! `talentdesk_core::schema` for the key layout.

mod conversions;
mod cursor;
mod error;
mod repository;
mod table;

pub use repository::DynamoDbRepository;
pub use table::ensure_table;
