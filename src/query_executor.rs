// Query executor Lambda: finds turbines whose latest readings cross thresholds

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

use wind_turbine::{
    execute_turbine_query, sitewise_client, QueryEnvelope, SiteWiseService, TelemetryService,
};

async fn function_handler(
    event: LambdaEvent<Value>,
    service: &dyn TelemetryService,
) -> Result<QueryEnvelope, Error> {
    let request_id = event.context.request_id.clone();

    info!(request_id = %request_id, "Query executor invoked");

    let envelope = execute_turbine_query(service, event.payload).await;

    info!(
        request_id = %request_id,
        status = envelope.status_code,
        "Invocation completed"
    );

    Ok(envelope)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    info!("Query executor Lambda starting");

    let service = SiteWiseService::new(sitewise_client().await);
    let service = &service;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        function_handler(event, service).await
    }))
    .await
}
