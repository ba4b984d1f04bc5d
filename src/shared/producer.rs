use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::FailurePolicy;
use crate::error::ProducerError;
use crate::measurements::build_entries;
use crate::sampler::MeasurementSampler;
use crate::telemetry::TelemetryService;
use crate::time::Clock;

/// Summary returned by one producer invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSummary {
    /// Assets whose batch reached the service
    pub assets: usize,
    /// Entries submitted across those batches
    pub entries: usize,
    /// Entries the service reported back as not stored
    pub rejected_entries: usize,
}

/// Synthesize and send one batch of measurements per asset
///
/// Every asset gets exactly one batch write stamped with the same capture
/// second. There is no retry: a failed batch is lost for this tick.
pub async fn send_measurements(
    service: &dyn TelemetryService,
    asset_names: &[String],
    clock: &dyn Clock,
    sampler: &dyn MeasurementSampler,
    policy: FailurePolicy,
) -> Result<SendSummary, ProducerError> {
    let timestamp = clock.now_epoch_seconds();
    let mut summary = SendSummary::default();
    let mut failed_assets = Vec::new();

    for asset_name in asset_names {
        let entries = build_entries(asset_name, timestamp, sampler);

        match service.batch_put(&entries).await {
            Ok(report) => {
                for rejected in &report.rejected_entries {
                    warn!(
                        asset = %asset_name,
                        entry_id = %rejected.entry_id,
                        error_code = %rejected.error_code,
                        "Entry rejected: {}",
                        rejected.error_message
                    );
                }

                info!(
                    asset = %asset_name,
                    entries = entries.len(),
                    rejected = report.rejected_entries.len(),
                    "Successfully sent measurements"
                );

                summary.assets += 1;
                summary.entries += entries.len();
                summary.rejected_entries += report.rejected_entries.len();
            }
            Err(e) => {
                error!(asset = %asset_name, error = %e, "Failed to send measurements");

                match policy {
                    FailurePolicy::Abort => {
                        return Err(ProducerError::Asset {
                            asset: asset_name.clone(),
                            source: e,
                        });
                    }
                    FailurePolicy::Continue => failed_assets.push(asset_name.clone()),
                }
            }
        }
    }

    if !failed_assets.is_empty() {
        return Err(ProducerError::Assets(failed_assets));
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PropertyValue, TurbineProperty};
    use crate::error::TelemetryError;
    use crate::sampler::{FixedSampler, RandomSampler};
    use crate::test_utils::RecordingService;
    use crate::time::FixedClock;

    fn assets(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_one_batch_per_asset() {
        let service = RecordingService::new();
        let clock = FixedClock::from_epoch_seconds(1700000000);

        let summary = send_measurements(
            &service,
            &assets(&["Turbine-001", "Turbine-002", "Turbine-003"]),
            &clock,
            &RandomSampler::new(),
            FailurePolicy::Abort,
        )
        .await
        .unwrap();

        let batches = service.batches();
        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.len() == 6));
        assert_eq!(batches[1][0].property_alias, "/Turbine-002/make");
        assert_eq!(
            summary,
            SendSummary {
                assets: 3,
                entries: 18,
                rejected_entries: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_batches_share_capture_second() {
        let service = RecordingService::new();
        let clock = FixedClock::from_epoch_seconds(1700000000);

        send_measurements(
            &service,
            &assets(&["T1", "T2"]),
            &clock,
            &FixedSampler::single(0.0),
            FailurePolicy::Abort,
        )
        .await
        .unwrap();

        for batch in service.batches() {
            assert!(batch.iter().all(|e| e.time_in_seconds == 1700000000));
        }
        let first = &service.batches()[0];
        assert_eq!(first[1].entry_id, "T1-location-1700000000");
        assert_eq!(first[2].value, PropertyValue::DoubleValue(100.0));
    }

    #[tokio::test]
    async fn test_abort_policy_stops_at_first_failure() {
        let service = RecordingService::new().failing_asset("T2");
        let clock = FixedClock::from_epoch_seconds(1700000000);

        let result = send_measurements(
            &service,
            &assets(&["T1", "T2", "T3"]),
            &clock,
            &RandomSampler::new(),
            FailurePolicy::Abort,
        )
        .await;

        match result {
            Err(ProducerError::Asset { asset, source }) => {
                assert_eq!(asset, "T2");
                assert!(matches!(source, TelemetryError::Service(_)));
            }
            other => panic!("Expected asset error, got {:?}", other),
        }
        // T3 is never attempted
        assert_eq!(service.batches().len(), 2);
    }

    #[tokio::test]
    async fn test_continue_policy_attempts_every_asset() {
        let service = RecordingService::new()
            .failing_asset("T1")
            .failing_asset("T3");
        let clock = FixedClock::from_epoch_seconds(1700000000);

        let result = send_measurements(
            &service,
            &assets(&["T1", "T2", "T3", "T4"]),
            &clock,
            &RandomSampler::new(),
            FailurePolicy::Continue,
        )
        .await;

        assert_eq!(service.batches().len(), 4);
        match result {
            Err(ProducerError::Assets(failed)) => assert_eq!(failed, vec!["T1", "T3"]),
            other => panic!("Expected assets error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejected_entries_are_counted() {
        let service = RecordingService::new().rejecting_property(TurbineProperty::Rpm);
        let clock = FixedClock::from_epoch_seconds(1700000000);

        let summary = send_measurements(
            &service,
            &assets(&["T1", "T2"]),
            &clock,
            &RandomSampler::new(),
            FailurePolicy::Abort,
        )
        .await
        .unwrap();

        assert_eq!(summary.assets, 2);
        assert_eq!(summary.rejected_entries, 2);
    }

    #[tokio::test]
    async fn test_no_assets_sends_nothing() {
        let service = RecordingService::new();
        let clock = FixedClock::from_epoch_seconds(1700000000);

        let summary = send_measurements(
            &service,
            &[],
            &clock,
            &RandomSampler::new(),
            FailurePolicy::Abort,
        )
        .await
        .unwrap();

        assert_eq!(summary, SendSummary::default());
        assert!(service.batches().is_empty());
    }
}
