use serde::{Deserialize, Serialize};
use std::fmt;

/// Properties defined on the WindTurbine asset model
///
/// The discriminant order is the order entries are written in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurbineProperty {
    Make,
    Location,
    Torque,
    WindDirection,
    Rpm,
    WindSpeed,
}

impl TurbineProperty {
    /// All properties, in batch order
    pub const ALL: [TurbineProperty; 6] = [
        TurbineProperty::Make,
        TurbineProperty::Location,
        TurbineProperty::Torque,
        TurbineProperty::WindDirection,
        TurbineProperty::Rpm,
        TurbineProperty::WindSpeed,
    ];

    /// Final path segment of the property alias (also the model's external id)
    pub fn alias_suffix(&self) -> &'static str {
        match self {
            TurbineProperty::Make => "make",
            TurbineProperty::Location => "location",
            TurbineProperty::Torque => "torque",
            TurbineProperty::WindDirection => "wind_direction",
            TurbineProperty::Rpm => "rpm",
            TurbineProperty::WindSpeed => "wind_speed",
        }
    }

    /// Whether the property is a static string attribute rather than a measurement
    pub fn is_attribute(&self) -> bool {
        matches!(self, TurbineProperty::Make | TurbineProperty::Location)
    }

    /// Build the property alias for an asset, e.g. `/Turbine-001/rpm`
    pub fn alias_for(&self, asset_name: &str) -> String {
        format!("/{}/{}", asset_name, self.alias_suffix())
    }
}

impl fmt::Display for TurbineProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias_suffix())
    }
}

/// Value carried by a property entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyValue {
    StringValue(String),
    DoubleValue(f64),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::StringValue(s) => Some(s),
            PropertyValue::DoubleValue(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::DoubleValue(v) => Some(*v),
            PropertyValue::StringValue(_) => None,
        }
    }
}

/// One timestamped property value addressed by alias
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyEntry {
    pub entry_id: String,
    pub property_alias: String,
    pub value: PropertyValue,
    /// Unix epoch seconds
    pub time_in_seconds: i64,
}

/// Entry the service accepted the batch for but refused to store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedEntry {
    pub entry_id: String,
    pub error_code: String,
    pub error_message: String,
}

/// Outcome of a batch write that reached the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPutReport {
    pub rejected_entries: Vec<RejectedEntry>,
}

/// Column metadata of a query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryColumn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub column_type: Option<QueryColumnType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryColumnType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scalar_type: Option<String>,
}

/// One cell of a query result row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datum {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scalar_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_value: Option<Vec<Datum>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_value: Option<QueryRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_value: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRow {
    pub data: Vec<Datum>,
}

/// Response of an ExecuteQuery call, shaped like the service's JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub columns: Vec<QueryColumn>,
    pub rows: Vec<QueryRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}
