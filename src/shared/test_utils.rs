//! Test utilities for unit, integration and property-based tests
//!
//! Provides proptest generators for turbine domain values and an in-memory
//! `TelemetryService` that records every call instead of reaching SiteWise.

pub mod generators {
    use proptest::prelude::*;

    /// Generate a valid asset name
    pub fn asset_name() -> impl Strategy<Value = String> {
        prop::string::string_regex("[A-Za-z0-9_.:-]{1,40}").expect("Valid regex for asset name")
    }

    /// Generate a list of distinct asset names
    pub fn asset_names() -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set(asset_name(), 1..8)
            .prop_map(|names| names.into_iter().collect())
    }

    /// Generate a capture time in epoch seconds
    /// Range: 2020-01-01 to 2030-12-31
    pub fn epoch_seconds() -> impl Strategy<Value = i64> {
        1577836800i64..1924991999i64
    }

    /// Generate a finite threshold value
    pub fn threshold() -> impl Strategy<Value = f64> {
        -1_000_000.0f64..1_000_000.0f64
    }

    /// Generate free filter text: empty, long, quotes and control characters included
    pub fn filter_text() -> impl Strategy<Value = String> {
        prop::string::string_regex("[A-Za-z0-9 ',;=()*\\t\\n-]{0,300}")
            .expect("Valid regex for filter")
    }
}

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::domain::{BatchPutReport, PropertyEntry, QueryResult, RejectedEntry, TurbineProperty};
use crate::error::TelemetryError;
use crate::telemetry::TelemetryService;

/// In-memory TelemetryService that records calls and can inject failures
#[derive(Debug, Default)]
pub struct RecordingService {
    batches: Mutex<Vec<Vec<PropertyEntry>>>,
    queries: Mutex<Vec<String>>,
    failing_assets: HashSet<String>,
    rejected_property: Option<TurbineProperty>,
    query_result: QueryResult,
    query_failure: Option<String>,
}

impl RecordingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every batch write addressed to this asset
    pub fn failing_asset(mut self, asset_name: &str) -> Self {
        self.failing_assets.insert(asset_name.to_string());
        self
    }

    /// Report entries for this property as rejected in every batch
    pub fn rejecting_property(mut self, property: TurbineProperty) -> Self {
        self.rejected_property = Some(property);
        self
    }

    pub fn with_query_result(mut self, result: QueryResult) -> Self {
        self.query_result = result;
        self
    }

    pub fn failing_queries(mut self, message: &str) -> Self {
        self.query_failure = Some(message.to_string());
        self
    }

    /// Batches received so far, in call order
    pub fn batches(&self) -> Vec<Vec<PropertyEntry>> {
        self.batches.lock().unwrap().clone()
    }

    /// Statements received so far, in call order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

/// Asset segment of a `/<asset>/<property>` alias
fn asset_of(entry: &PropertyEntry) -> Option<&str> {
    entry.property_alias.split('/').nth(1)
}

#[async_trait]
impl TelemetryService for RecordingService {
    async fn batch_put(&self, entries: &[PropertyEntry]) -> Result<BatchPutReport, TelemetryError> {
        self.batches.lock().unwrap().push(entries.to_vec());

        if let Some(asset) = entries.first().and_then(asset_of) {
            if self.failing_assets.contains(asset) {
                return Err(TelemetryError::Service(format!(
                    "ResourceNotFoundException: no asset named {}",
                    asset
                )));
            }
        }

        let rejected_entries = match self.rejected_property {
            Some(property) => entries
                .iter()
                .filter(|e| e.property_alias.ends_with(&format!("/{}", property.alias_suffix())))
                .map(|e| RejectedEntry {
                    entry_id: e.entry_id.clone(),
                    error_code: "InvalidRequestException".to_string(),
                    error_message: "Property is not a measurement".to_string(),
                })
                .collect(),
            None => Vec::new(),
        };

        Ok(BatchPutReport { rejected_entries })
    }

    async fn execute_query(&self, statement: &str) -> Result<QueryResult, TelemetryError> {
        self.queries.lock().unwrap().push(statement.to_string());

        match &self.query_failure {
            Some(message) => Err(TelemetryError::Service(message.clone())),
            None => Ok(self.query_result.clone()),
        }
    }
}
