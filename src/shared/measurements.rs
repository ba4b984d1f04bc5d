use std::ops::RangeInclusive;

use crate::domain::{PropertyEntry, PropertyValue, TurbineProperty};
use crate::sampler::MeasurementSampler;

/// Static make attribute written for every turbine
pub const TURBINE_MAKE: &str = "Amazon";

/// Static location attribute written for every turbine
pub const TURBINE_LOCATION: &str = "Renton";

/// Torque range in kilonewton-metres
pub const TORQUE_RANGE: RangeInclusive<f64> = 100.0..=500.0;

/// Wind direction range in degrees
pub const WIND_DIRECTION_RANGE: RangeInclusive<f64> = 0.0..=360.0;

/// Rotor speed range in rotations per minute
pub const RPM_RANGE: RangeInclusive<f64> = 10.0..=50.0;

/// Wind speed range in metres per second
pub const WIND_SPEED_RANGE: RangeInclusive<f64> = 5.0..=25.0;

/// Number of entries written per asset per invocation
pub const ENTRIES_PER_ASSET: usize = TurbineProperty::ALL.len();

/// Sampling range of a measurement property, `None` for static attributes
pub fn measurement_range(property: TurbineProperty) -> Option<RangeInclusive<f64>> {
    match property {
        TurbineProperty::Make | TurbineProperty::Location => None,
        TurbineProperty::Torque => Some(TORQUE_RANGE),
        TurbineProperty::WindDirection => Some(WIND_DIRECTION_RANGE),
        TurbineProperty::Rpm => Some(RPM_RANGE),
        TurbineProperty::WindSpeed => Some(WIND_SPEED_RANGE),
    }
}

/// Deterministic entry id: `<asset>-<property>-<epoch seconds>`
///
/// Unique within one batch, but two invocations in the same second reuse ids.
pub fn entry_id(asset_name: &str, property: TurbineProperty, time_in_seconds: i64) -> String {
    format!("{}-{}-{}", asset_name, property.alias_suffix(), time_in_seconds)
}

/// Build one entry for a single property of an asset
pub fn build_entry(
    asset_name: &str,
    property: TurbineProperty,
    time_in_seconds: i64,
    sampler: &dyn MeasurementSampler,
) -> PropertyEntry {
    let value = match property {
        TurbineProperty::Make => PropertyValue::StringValue(TURBINE_MAKE.to_string()),
        TurbineProperty::Location => PropertyValue::StringValue(TURBINE_LOCATION.to_string()),
        TurbineProperty::Torque => PropertyValue::DoubleValue(sampler.sample(TORQUE_RANGE)),
        TurbineProperty::WindDirection => {
            PropertyValue::DoubleValue(sampler.sample(WIND_DIRECTION_RANGE))
        }
        TurbineProperty::Rpm => PropertyValue::DoubleValue(sampler.sample(RPM_RANGE)),
        TurbineProperty::WindSpeed => PropertyValue::DoubleValue(sampler.sample(WIND_SPEED_RANGE)),
    };

    PropertyEntry {
        entry_id: entry_id(asset_name, property, time_in_seconds),
        property_alias: property.alias_for(asset_name),
        value,
        time_in_seconds,
    }
}

/// Build the full batch of six entries for one asset
///
/// All entries share the same capture timestamp.
pub fn build_entries(
    asset_name: &str,
    time_in_seconds: i64,
    sampler: &dyn MeasurementSampler,
) -> Vec<PropertyEntry> {
    TurbineProperty::ALL
        .iter()
        .map(|property| build_entry(asset_name, *property, time_in_seconds, sampler))
        .collect()
}
