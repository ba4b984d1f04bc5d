// Measurement sender Lambda: writes one batch of synthetic readings per turbine

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use wind_turbine::{
    send_measurements, sitewise_client, Clock, MeasurementSampler, RandomSampler, SenderConfig,
    SiteWiseService, SystemClock, TelemetryService,
};

async fn function_handler(
    event: LambdaEvent<Value>,
    service: &dyn TelemetryService,
    config: &SenderConfig,
    clock: &dyn Clock,
    sampler: &dyn MeasurementSampler,
) -> Result<Value, Error> {
    let request_id = event.context.request_id.clone();

    info!(
        request_id = %request_id,
        assets = config.asset_names.len(),
        captured_at = %clock.now_rfc3339(),
        "Measurement sender invoked"
    );

    match send_measurements(
        service,
        &config.asset_names,
        clock,
        sampler,
        config.failure_policy,
    )
    .await
    {
        Ok(summary) => {
            info!(
                request_id = %request_id,
                assets = summary.assets,
                entries = summary.entries,
                rejected = summary.rejected_entries,
                "Invocation completed successfully"
            );
            Ok(serde_json::to_value(summary)?)
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Invocation failed");
            Err(e.into())
        }
    }
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

    info!("Measurement sender Lambda starting");

    // Malformed configuration fails the cold start before any write
    let config = SenderConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    let service = SiteWiseService::new(sitewise_client().await);
    let clock = SystemClock::new();
    let sampler = RandomSampler::new();

    let service = &service;
    let config = &config;
    let clock = &clock;
    let sampler = &sampler;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        function_handler(event, service, config, clock, sampler).await
    }))
    .await
}
