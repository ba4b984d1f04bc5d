use async_trait::async_trait;
use aws_sdk_iotsitewise::types::{
    AssetPropertyValue, PutAssetPropertyValueEntry, Quality, TimeInNanos, Variant,
};
use aws_sdk_iotsitewise::Client as SiteWiseClient;

use crate::domain::{
    BatchPutReport, Datum, PropertyEntry, PropertyValue, QueryColumn, QueryColumnType,
    QueryResult, QueryRow, RejectedEntry,
};
use crate::error::TelemetryError;

/// The two calls this backend makes against the telemetry service
#[async_trait]
pub trait TelemetryService: Send + Sync {
    /// Write a batch of property values in a single request
    async fn batch_put(&self, entries: &[PropertyEntry]) -> Result<BatchPutReport, TelemetryError>;

    /// Run one query statement and return its first page of results
    async fn execute_query(&self, statement: &str) -> Result<QueryResult, TelemetryError>;
}

/// TelemetryService backed by AWS IoT SiteWise
#[derive(Debug, Clone)]
pub struct SiteWiseService {
    client: SiteWiseClient,
}

impl SiteWiseService {
    pub fn new(client: SiteWiseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TelemetryService for SiteWiseService {
    async fn batch_put(&self, entries: &[PropertyEntry]) -> Result<BatchPutReport, TelemetryError> {
        let sdk_entries = entries
            .iter()
            .map(to_sdk_entry)
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .client
            .batch_put_asset_property_value()
            .set_entries(Some(sdk_entries))
            .send()
            .await?;

        let rejected_entries = output
            .error_entries()
            .iter()
            .flat_map(|entry| {
                entry.errors().iter().map(move |err| RejectedEntry {
                    entry_id: entry.entry_id().to_string(),
                    error_code: err.error_code().as_str().to_string(),
                    error_message: err.error_message().to_string(),
                })
            })
            .collect();

        Ok(BatchPutReport { rejected_entries })
    }

    async fn execute_query(&self, statement: &str) -> Result<QueryResult, TelemetryError> {
        let output = self
            .client
            .execute_query()
            .query_statement(statement)
            .send()
            .await?;

        Ok(QueryResult {
            columns: output.columns().iter().map(from_sdk_column).collect(),
            rows: output.rows().iter().map(from_sdk_row).collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }
}

/// Convert a domain entry into the SDK request shape
fn to_sdk_entry(entry: &PropertyEntry) -> Result<PutAssetPropertyValueEntry, TelemetryError> {
    let variant = match &entry.value {
        PropertyValue::StringValue(s) => Variant::builder().string_value(s.clone()).build(),
        PropertyValue::DoubleValue(v) => Variant::builder().double_value(*v).build(),
    };

    let timestamp = TimeInNanos::builder()
        .time_in_seconds(entry.time_in_seconds)
        .build()?;

    let value = AssetPropertyValue::builder()
        .value(variant)
        .timestamp(timestamp)
        .quality(Quality::Good)
        .build();

    let sdk_entry = PutAssetPropertyValueEntry::builder()
        .entry_id(entry.entry_id.clone())
        .property_alias(entry.property_alias.clone())
        .property_values(value)
        .build()?;

    Ok(sdk_entry)
}

fn from_sdk_column(column: &aws_sdk_iotsitewise::types::ColumnInfo) -> QueryColumn {
    QueryColumn {
        name: column.name().map(str::to_string),
        column_type: column.r#type().map(|t| QueryColumnType {
            scalar_type: t.scalar_type().map(|s| s.as_str().to_string()),
        }),
    }
}

fn from_sdk_row(row: &aws_sdk_iotsitewise::types::Row) -> QueryRow {
    QueryRow {
        data: row.data().iter().map(from_sdk_datum).collect(),
    }
}

fn from_sdk_datum(datum: &aws_sdk_iotsitewise::types::Datum) -> Datum {
    let array_value = if datum.array_value().is_empty() {
        None
    } else {
        Some(datum.array_value().iter().map(from_sdk_datum).collect())
    };

    Datum {
        scalar_value: datum.scalar_value().map(str::to_string),
        array_value,
        row_value: datum.row_value().map(from_sdk_row),
        null_value: datum.null_value(),
    }
}
