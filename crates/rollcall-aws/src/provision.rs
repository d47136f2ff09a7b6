//! Idempotent creation of the attendance table.

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, KeySchemaElement, KeyType, ProvisionedThroughput, ScalarAttributeType,
    TableStatus,
};
use aws_sdk_dynamodb::Client;
use std::time::Duration;
use thiserror::Error;

/// Hash key of the attendance table.
pub const KEY_ATTRIBUTE: &str = "RecordID";
/// Provisioned read and write capacity units.
pub const CAPACITY_UNITS: i64 = 5;

const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLLS: u32 = 150;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("list tables failed: {0}")]
    ListTables(String),
    #[error("create table {table} failed: {message}")]
    CreateTable { table: String, message: String },
    #[error("describe table {table} failed: {message}")]
    DescribeTable { table: String, message: String },
    #[error("invalid table definition: {0}")]
    Build(#[from] aws_sdk_dynamodb::error::BuildError),
    #[error("table {table} not active after {waited:?}")]
    Timeout { table: String, waited: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    AlreadyExists,
    Created,
}

/// Create `table_name` unless it already exists, then wait for it to become active.
pub async fn ensure_table(client: &Client, table_name: &str) -> Result<ProvisionOutcome, ProvisionError> {
    if list_table_names(client).await?.iter().any(|t| t == table_name) {
        tracing::info!(table = table_name, "table already exists");
        return Ok(ProvisionOutcome::AlreadyExists);
    }

    client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(KEY_ATTRIBUTE)
                .key_type(KeyType::Hash)
                .build()?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(KEY_ATTRIBUTE)
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(CAPACITY_UNITS)
                .write_capacity_units(CAPACITY_UNITS)
                .build()?,
        )
        .send()
        .await
        .map_err(|e| ProvisionError::CreateTable {
            table: table_name.to_string(),
            message: DisplayErrorContext(&e).to_string(),
        })?;

    tracing::info!(table = table_name, "create requested, waiting for table to become active");
    wait_until_active(client, table_name).await?;
    tracing::info!(table = table_name, "table created");
    Ok(ProvisionOutcome::Created)
}

async fn list_table_names(client: &Client) -> Result<Vec<String>, ProvisionError> {
    let mut names = Vec::new();
    let mut start: Option<String> = None;

    loop {
        let response = client
            .list_tables()
            .set_exclusive_start_table_name(start.take())
            .send()
            .await
            .map_err(|e| ProvisionError::ListTables(DisplayErrorContext(&e).to_string()))?;

        names.extend(response.table_names().iter().cloned());

        match response.last_evaluated_table_name() {
            Some(last) => start = Some(last.to_string()),
            None => break,
        }
    }

    Ok(names)
}

async fn wait_until_active(client: &Client, table_name: &str) -> Result<(), ProvisionError> {
    for _ in 0..MAX_POLLS {
        let response = client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| ProvisionError::DescribeTable {
                table: table_name.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let status = response.table().and_then(|t| t.table_status());
        if status == Some(&TableStatus::Active) {
            return Ok(());
        }
        tracing::debug!(table = table_name, ?status, "waiting for table");
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    Err(ProvisionError::Timeout {
        table: table_name.to_string(),
        waited: POLL_INTERVAL * MAX_POLLS,
    })
}
