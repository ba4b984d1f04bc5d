use tracing::{error, info};

use crate::domain::QueryResult;
use crate::error::{QueryEnvelope, QueryError};
use crate::query::{build_turbine_query, QueryParameters};
use crate::telemetry::TelemetryService;

/// Run the turbine query for an invocation payload
///
/// Never fails: any error becomes a 500 envelope carrying its message.
pub async fn execute_turbine_query(
    service: &dyn TelemetryService,
    payload: serde_json::Value,
) -> QueryEnvelope {
    match run_query(service, payload).await {
        Ok(result) => {
            info!(rows = result.rows.len(), "Query completed");
            QueryEnvelope::ok(&result)
        }
        Err(e) => {
            error!(error = %e, "Error executing query");
            QueryEnvelope::error(e.to_string())
        }
    }
}

async fn run_query(
    service: &dyn TelemetryService,
    payload: serde_json::Value,
) -> Result<QueryResult, QueryError> {
    let params = QueryParameters::from_payload(payload)?;
    let statement = build_turbine_query(&params)?;

    info!(
        make = %params.make,
        location = %params.location,
        rpm_threshold = params.rpm_threshold,
        torque_threshold = params.torque_threshold,
        wind_speed_threshold = params.wind_speed_threshold,
        wind_direction_threshold = params.wind_direction_threshold,
        "Executing query"
    );

    Ok(service.execute_query(&statement).await?)
}
