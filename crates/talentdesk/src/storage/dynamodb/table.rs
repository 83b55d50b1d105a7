//! Table bootstrap for local development.
//!
//! Creates the single table with its three indexes when it is missing, using
//! the layout from `talentdesk_core::schema::TABLE_LAYOUT`. Production tables are
//! provisioned outside the service.

use std::time::Duration;

use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;
use talentdesk_core::schema::{Index, TableLayout};
use talentdesk_core::storage::{RepositoryError, Result};

use super::error::map_connection_error;

const ACTIVATION_ATTEMPTS: u32 = 30;
const ACTIVATION_DELAY: Duration = Duration::from_secs(1);

/// Creates the table if it does not exist and waits for it to become active.
///
/// Returns `true` when the table was created by this call.
pub async fn ensure_table(client: &Client, table_name: &str, layout: &TableLayout) -> Result<bool> {
    if table_status(client, table_name).await?.is_some() {
        tracing::debug!(table = %table_name, "table already exists");
        return Ok(false);
    }

    tracing::info!(table = %table_name, "creating table");
    create_table(client, table_name, layout).await?;
    wait_for_table_active(client, table_name).await?;
    Ok(true)
}

async fn table_status(client: &Client, table_name: &str) -> Result<Option<TableStatus>> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(output) => Ok(output
            .table()
            .and_then(|t| t.table_status())
            .cloned()),
        Err(err) => match err.into_service_error() {
            DescribeTableError::ResourceNotFoundException(_) => Ok(None),
            other => Err(map_connection_error(other)),
        },
    }
}

fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(map_connection_error)
}

fn string_attribute(name: &str) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(map_connection_error)
}

fn index_definition(index: Index) -> Result<GlobalSecondaryIndex> {
    GlobalSecondaryIndex::builder()
        .index_name(index.name())
        .key_schema(key_element(index.pk_attribute(), KeyType::Hash)?)
        .key_schema(key_element(index.sk_attribute(), KeyType::Range)?)
        .projection(
            Projection::builder()
                .projection_type(ProjectionType::All)
                .build(),
        )
        .build()
        .map_err(map_connection_error)
}

async fn create_table(client: &Client, table_name: &str, layout: &TableLayout) -> Result<()> {
    let mut attribute_definitions = vec![
        string_attribute(layout.pk_attribute)?,
        string_attribute(layout.sk_attribute)?,
    ];
    for index in layout.indexes {
        attribute_definitions.push(string_attribute(index.pk_attribute())?);
        attribute_definitions.push(string_attribute(index.sk_attribute())?);
    }

    let mut request = client
        .create_table()
        .table_name(table_name)
        .key_schema(key_element(layout.pk_attribute, KeyType::Hash)?)
        .key_schema(key_element(layout.sk_attribute, KeyType::Range)?)
        .set_attribute_definitions(Some(attribute_definitions))
        .billing_mode(BillingMode::PayPerRequest);

    for index in layout.indexes {
        request = request.global_secondary_indexes(index_definition(index)?);
    }

    request.send().await.map_err(map_connection_error)?;
    Ok(())
}

async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<()> {
    for _ in 0..ACTIVATION_ATTEMPTS {
        if table_status(client, table_name).await? == Some(TableStatus::Active) {
            return Ok(());
        }
        tokio::time::sleep(ACTIVATION_DELAY).await;
    }

    Err(RepositoryError::ConnectionFailed(format!(
        "Table {} did not become active",
        table_name
    )))
}
