//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `talentdesk_core::storage`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use talentdesk_core::storage::RepositoryError;

use super::conversions::item_version;

fn throttled() -> RepositoryError {
    RepositoryError::QueryFailed("table is throttling requests, retry later".to_string())
}

fn unavailable() -> RepositoryError {
    RepositoryError::ConnectionFailed("table service reported an internal error".to_string())
}

fn missing_table() -> RepositoryError {
    RepositoryError::QueryFailed("table does not exist".to_string())
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let id_str = id.into();
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => missing_table(),
        GetItemError::ProvisionedThroughputExceededException(_)
        | GetItemError::RequestLimitExceeded(_) => throttled(),
        GetItemError::InternalServerError(_) => unavailable(),
        err => RepositoryError::QueryFailed(format!(
            "GetItem for {} {} failed: {:?}",
            entity_type, id_str, err
        )),
    }
}

/// Map a Query SDK error to RepositoryError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> RepositoryError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => missing_table(),
        QueryError::ProvisionedThroughputExceededException(_)
        | QueryError::RequestLimitExceeded(_) => throttled(),
        QueryError::InternalServerError(_) => unavailable(),
        err => RepositoryError::QueryFailed(format!("Query failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to RepositoryError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
) -> RepositoryError {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => missing_table(),
        ScanError::ProvisionedThroughputExceededException(_)
        | ScanError::RequestLimitExceeded(_) => throttled(),
        ScanError::InternalServerError(_) => unavailable(),
        err => RepositoryError::QueryFailed(format!("Scan failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error from a create (`attribute_not_exists(PK)`).
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let id_str = id.into();
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => RepositoryError::AlreadyExists {
            entity_type,
            id: id_str,
        },
        other => map_other_put_item_error(other),
    }
}

/// Map a PutItem SDK error from a versioned write.
///
/// The write is issued with `ReturnValuesOnConditionCheckFailure=ALL_OLD`, so a
/// failed condition carries the stored item when there is one. A returned item
/// means someone else moved the version; no item means it does not exist.
pub fn map_versioned_put_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
    expected: u64,
) -> RepositoryError {
    let id_str = id.into();
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(e) => match e.item() {
            Some(item) => RepositoryError::VersionConflict {
                entity_type,
                id: id_str,
                expected,
                actual: item_version(item).unwrap_or_default(),
            },
            None => RepositoryError::NotFound {
                entity_type,
                id: id_str,
            },
        },
        other => map_other_put_item_error(other),
    }
}

fn map_other_put_item_error(err: PutItemError) -> RepositoryError {
    match err {
        PutItemError::ResourceNotFoundException(_) => missing_table(),
        PutItemError::ProvisionedThroughputExceededException(_)
        | PutItemError::RequestLimitExceeded(_) => throttled(),
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            RepositoryError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => throttled(),
        PutItemError::InternalServerError(_) => unavailable(),
        err => RepositoryError::QueryFailed(format!("PutItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let id_str = id.into();
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => RepositoryError::NotFound {
            entity_type,
            id: id_str,
        },
        DeleteItemError::ResourceNotFoundException(_) => missing_table(),
        DeleteItemError::ProvisionedThroughputExceededException(_)
        | DeleteItemError::RequestLimitExceeded(_) => throttled(),
        DeleteItemError::TransactionConflictException(_) => throttled(),
        DeleteItemError::InternalServerError(_) => unavailable(),
        err => RepositoryError::QueryFailed(format!("DeleteItem failed: {:?}", err)),
    }
}

/// Map a generic connection/config error to RepositoryError.
pub fn map_connection_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::ConnectionFailed(err.to_string())
}
