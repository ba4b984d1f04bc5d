use aws_sdk_iotsitewise::Client as SiteWiseClient;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::validators::validate_asset_name;

/// JSON array of asset names, e.g. `["Turbine-001","Turbine-002"]`
pub const ASSET_NAMES_VAR: &str = "TURBINE_ASSET_NAMES";

/// Fixed per-turbine variables read when `TURBINE_ASSET_NAMES` is absent
pub const TURBINE_NAME_VARS: [&str; 4] = [
    "TURBINE_001_NAME",
    "TURBINE_002_NAME",
    "TURBINE_003_NAME",
    "TURBINE_004_NAME",
];

/// `abort` or `continue`
pub const FAILURE_POLICY_VAR: &str = "ON_ASSET_FAILURE";

/// What the producer does when one asset's batch write fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and return the error immediately; later assets are skipped
    #[default]
    Abort,
    /// Log, keep going, and fail the invocation at the end
    Continue,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "continue" => Ok(FailurePolicy::Continue),
            _ => Err(ConfigError::InvalidValue {
                name: FAILURE_POLICY_VAR.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration for the measurement sender
#[derive(Debug, Clone, PartialEq)]
pub struct SenderConfig {
    /// Assets to write, in invocation order
    pub asset_names: Vec<String>,
    pub failure_policy: FailurePolicy,
}

impl SenderConfig {
    /// Create a new SenderConfig from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup
    ///
    /// `TURBINE_ASSET_NAMES` wins when set; otherwise all four
    /// `TURBINE_00N_NAME` variables are required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let asset_names = match lookup(ASSET_NAMES_VAR) {
            Some(raw) => parse_asset_names(&raw)?,
            None => TURBINE_NAME_VARS
                .iter()
                .map(|&var| {
                    lookup(var)
                        .map(|v| v.trim().to_string())
                        .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        if asset_names.is_empty() {
            return Err(ConfigError::NoAssets);
        }

        for name in &asset_names {
            validate_asset_name(name)?;
        }

        let failure_policy = match lookup(FAILURE_POLICY_VAR) {
            Some(raw) => raw.parse()?,
            None => FailurePolicy::default(),
        };

        Ok(SenderConfig {
            asset_names,
            failure_policy,
        })
    }
}

/// Parse a JSON-encoded array of asset names
pub fn parse_asset_names(raw: &str) -> Result<Vec<String>, ConfigError> {
    let names: Vec<String> =
        serde_json::from_str(raw).map_err(|e| ConfigError::InvalidAssetList {
            name: ASSET_NAMES_VAR.to_string(),
            reason: e.to_string(),
        })?;

    Ok(names.into_iter().map(|n| n.trim().to_string()).collect())
}

/// Create a SiteWise client from the Lambda environment
///
/// Timeouts leave a buffer under the function timeout.
pub async fn sitewise_client() -> SiteWiseClient {
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;

    let sitewise_config = aws_sdk_iotsitewise::config::Builder::from(&aws_config)
        .timeout_config(
            aws_sdk_iotsitewise::config::timeout::TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(25))
                .operation_attempt_timeout(Duration::from_secs(10))
                .build(),
        )
        .build();

    SiteWiseClient::from_conf(sitewise_config)
}
