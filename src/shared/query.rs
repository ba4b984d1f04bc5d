use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TurbineProperty;
use crate::error::QueryError;
use crate::validators::{validate_threshold, ValidationError};

pub const DEFAULT_MAKE: &str = "Amazon";
pub const DEFAULT_LOCATION: &str = "Renton";
pub const DEFAULT_RPM_THRESHOLD: f64 = 25.0;
pub const DEFAULT_TORQUE_THRESHOLD: f64 = 300.0;
pub const DEFAULT_WIND_SPEED_THRESHOLD: f64 = 15.0;
pub const DEFAULT_WIND_DIRECTION_THRESHOLD: f64 = 100.0;

/// Invocation payload of the query handler
///
/// Every key is optional; absent or null keys fall back to the defaults.
/// Values are kept raw so type errors can name the offending key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub make: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub rpm_threshold: Option<Value>,
    #[serde(default)]
    pub torque_threshold: Option<Value>,
    #[serde(default)]
    pub wind_speed_threshold: Option<Value>,
    #[serde(default)]
    pub wind_direction_threshold: Option<Value>,
}

/// Coerce a filter to text; numbers are rendered as their JSON text
fn text_filter(field: &str, value: Option<Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(ValidationError::new(
            field,
            format!("expected a string or number, got {}", other),
        )),
    }
}

/// Coerce a threshold from a JSON number or numeric string
fn threshold_filter(field: &str, value: Option<Value>) -> Result<Option<f64>, ValidationError> {
    let value = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.map(Some).ok_or_else(|| {
        ValidationError::new(
            field,
            format!("expected a number or numeric string, got {}", value),
        )
    })
}

/// Resolved filter values used to build the turbine query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameters {
    pub make: String,
    pub location: String,
    pub rpm_threshold: f64,
    pub torque_threshold: f64,
    pub wind_speed_threshold: f64,
    pub wind_direction_threshold: f64,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            make: DEFAULT_MAKE.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            rpm_threshold: DEFAULT_RPM_THRESHOLD,
            torque_threshold: DEFAULT_TORQUE_THRESHOLD,
            wind_speed_threshold: DEFAULT_WIND_SPEED_THRESHOLD,
            wind_direction_threshold: DEFAULT_WIND_DIRECTION_THRESHOLD,
        }
    }
}

impl TryFrom<QueryRequest> for QueryParameters {
    type Error = ValidationError;

    fn try_from(request: QueryRequest) -> Result<Self, Self::Error> {
        let defaults = QueryParameters::default();
        Ok(Self {
            make: text_filter("make", request.make)?.unwrap_or(defaults.make),
            location: text_filter("location", request.location)?.unwrap_or(defaults.location),
            rpm_threshold: threshold_filter("rpm_threshold", request.rpm_threshold)?
                .unwrap_or(defaults.rpm_threshold),
            torque_threshold: threshold_filter("torque_threshold", request.torque_threshold)?
                .unwrap_or(defaults.torque_threshold),
            wind_speed_threshold: threshold_filter(
                "wind_speed_threshold",
                request.wind_speed_threshold,
            )?
            .unwrap_or(defaults.wind_speed_threshold),
            wind_direction_threshold: threshold_filter(
                "wind_direction_threshold",
                request.wind_direction_threshold,
            )?
            .unwrap_or(defaults.wind_direction_threshold),
        })
    }
}

impl QueryParameters {
    /// Parse an invocation payload, applying defaults for missing keys
    pub fn from_payload(payload: Value) -> Result<Self, QueryError> {
        let request: QueryRequest = match payload {
            Value::Null => QueryRequest::default(),
            value @ Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| QueryError::InvalidPayload(e.to_string()))?,
            other => {
                return Err(QueryError::InvalidPayload(format!(
                    "expected an object, got {}",
                    other
                )))
            }
        };

        Ok(QueryParameters::try_from(request)?)
    }

    /// Make and location are free text; only thresholds are checked
    pub fn validate(&self) -> Result<(), QueryError> {
        validate_threshold("rpm_threshold", self.rpm_threshold)?;
        validate_threshold("torque_threshold", self.torque_threshold)?;
        validate_threshold("wind_speed_threshold", self.wind_speed_threshold)?;
        validate_threshold("wind_direction_threshold", self.wind_direction_threshold)?;
        Ok(())
    }
}

/// Predicate over the latest value of a turbine property
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Latest string value equals the given text
    StringEquals(TurbineProperty, String),
    /// Latest double value is strictly greater than the threshold
    DoubleAbove(TurbineProperty, f64),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    fn render(&self, nested: bool) -> String {
        match self {
            Predicate::StringEquals(property, value) => latest_value_subquery(
                *property,
                &format!("string_value = {}", string_literal(value)),
            ),
            Predicate::DoubleAbove(property, threshold) => latest_value_subquery(
                *property,
                &format!("double_value > {}", number_literal(*threshold)),
            ),
            Predicate::All(predicates) => join_predicates(predicates, " AND ", nested),
            Predicate::Any(predicates) => join_predicates(predicates, " OR ", nested),
        }
    }
}

fn join_predicates(predicates: &[Predicate], separator: &str, nested: bool) -> String {
    let joined = predicates
        .iter()
        .map(|p| p.render(true))
        .collect::<Vec<_>>()
        .join(separator);

    if nested && predicates.len() > 1 {
        format!("({})", joined)
    } else {
        joined
    }
}

fn latest_value_subquery(property: TurbineProperty, comparison: &str) -> String {
    format!(
        "asset_id IN (SELECT asset_id FROM latest_value_time_series \
         WHERE SUBSTR(property_alias, '[^/]+$') = {} AND {})",
        string_literal(property.alias_suffix()),
        comparison
    )
}

/// Render text as a single-quoted SQL literal with embedded quotes doubled
pub fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render a finite threshold as a plain decimal literal
pub fn number_literal(value: f64) -> String {
    // f64 Display never uses exponent notation
    format!("{}", value)
}

/// Matching rule: location AND make AND (rpm OR torque OR (wind speed AND direction))
pub fn turbine_predicate(params: &QueryParameters) -> Predicate {
    Predicate::All(vec![
        Predicate::StringEquals(TurbineProperty::Location, params.location.clone()),
        Predicate::StringEquals(TurbineProperty::Make, params.make.clone()),
        Predicate::Any(vec![
            Predicate::DoubleAbove(TurbineProperty::Rpm, params.rpm_threshold),
            Predicate::DoubleAbove(TurbineProperty::Torque, params.torque_threshold),
            Predicate::All(vec![
                Predicate::DoubleAbove(TurbineProperty::WindSpeed, params.wind_speed_threshold),
                Predicate::DoubleAbove(
                    TurbineProperty::WindDirection,
                    params.wind_direction_threshold,
                ),
            ]),
        ]),
    ])
}

/// Build the statement listing turbines that match the parameters
pub fn build_turbine_query(params: &QueryParameters) -> Result<String, QueryError> {
    params.validate()?;

    Ok(format!(
        "SELECT asset_id, asset_name FROM asset WHERE {} ORDER BY asset_name",
        turbine_predicate(params).render(false)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_payload() {
        let params = QueryParameters::from_payload(json!({})).unwrap();
        assert_eq!(params, QueryParameters::default());

        let params = QueryParameters::from_payload(serde_json::Value::Null).unwrap();
        assert_eq!(params, QueryParameters::default());
    }

    #[test]
    fn test_default_query_uses_all_defaults() {
        let query = build_turbine_query(&QueryParameters::default()).unwrap();

        assert!(query.contains("= 'location' AND string_value = 'Renton'"));
        assert!(query.contains("= 'make' AND string_value = 'Amazon'"));
        assert!(query.contains("= 'rpm' AND double_value > 25)"));
        assert!(query.contains("= 'torque' AND double_value > 300)"));
        assert!(query.contains("= 'wind_speed' AND double_value > 15)"));
        assert!(query.contains("= 'wind_direction' AND double_value > 100)"));
        assert!(query.starts_with("SELECT asset_id, asset_name FROM asset WHERE "));
        assert!(query.ends_with(" ORDER BY asset_name"));
    }

    #[test]
    fn test_predicate_grouping() {
        let query = build_turbine_query(&QueryParameters::default()).unwrap();

        let rpm = query.find("'rpm'").unwrap();
        let torque = query.find("'torque'").unwrap();
        let wind_speed = query.find("'wind_speed'").unwrap();
        let or_group = &query[rpm..];

        assert!(rpm < torque && torque < wind_speed);
        assert_eq!(or_group.matches(" OR ").count(), 2);
        // wind speed and direction are ANDed inside their own group
        assert!(query.contains(" OR (asset_id IN (SELECT asset_id FROM latest_value_time_series WHERE SUBSTR(property_alias, '[^/]+$') = 'wind_speed'"));
        assert!(query.contains(" AND (asset_id IN (SELECT asset_id FROM latest_value_time_series WHERE SUBSTR(property_alias, '[^/]+$') = 'rpm'"));
    }

    #[test]
    fn test_overrides_and_numeric_strings() {
        let params = QueryParameters::from_payload(json!({
            "make": "Vestas",
            "location": "Seattle",
            "rpm_threshold": "40",
            "torque_threshold": 450.5,
            "wind_speed_threshold": null,
        }))
        .unwrap();

        assert_eq!(params.make, "Vestas");
        assert_eq!(params.location, "Seattle");
        assert_eq!(params.rpm_threshold, 40.0);
        assert_eq!(params.torque_threshold, 450.5);
        assert_eq!(params.wind_speed_threshold, DEFAULT_WIND_SPEED_THRESHOLD);

        let query = build_turbine_query(&params).unwrap();
        assert!(query.contains("double_value > 40)"));
        assert!(query.contains("double_value > 450.5)"));
    }

    #[test]
    fn test_string_filters_are_escaped() {
        let params = QueryParameters {
            location: "x' OR '1'='1".to_string(),
            ..Default::default()
        };

        let query = build_turbine_query(&params).unwrap();
        assert!(query.contains("string_value = 'x'' OR ''1''=''1'"));
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let params = QueryParameters {
            rpm_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            build_turbine_query(&params),
            Err(QueryError::Validation(_))
        ));

        let params = QueryParameters::from_payload(json!({"torque_threshold": "inf"})).unwrap();
        assert!(build_turbine_query(&params).is_err());
    }

    #[test]
    fn test_free_text_filters_accepted() {
        let params = QueryParameters {
            make: String::new(),
            location: "R".repeat(300),
            ..Default::default()
        };

        let query = build_turbine_query(&params).unwrap();
        assert!(query.contains("= 'make' AND string_value = '')"));
        assert!(query.contains(&format!("string_value = '{}'", "R".repeat(300))));
    }

    #[test]
    fn test_numeric_text_filters() {
        let params = QueryParameters::from_payload(json!({"make": 7, "location": 2.5})).unwrap();

        assert_eq!(params.make, "7");
        assert_eq!(params.location, "2.5");
    }

    #[test]
    fn test_type_errors_name_the_field() {
        match QueryParameters::from_payload(json!({"rpm_threshold": true})) {
            Err(QueryError::Validation(e)) => {
                assert_eq!(e.field, "rpm_threshold");
                assert!(e.to_string().contains("got true"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }

        match QueryParameters::from_payload(json!({"wind_speed_threshold": "fast"})) {
            Err(QueryError::Validation(e)) => assert_eq!(e.field, "wind_speed_threshold"),
            other => panic!("Expected Validation error, got {:?}", other),
        }

        match QueryParameters::from_payload(json!({"location": ["Renton"]})) {
            Err(QueryError::Validation(e)) => assert_eq!(e.field, "location"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_payload() {
        assert!(matches!(
            QueryParameters::from_payload(json!("Amazon")),
            Err(QueryError::InvalidPayload(_))
        ));
        assert!(matches!(
            QueryParameters::from_payload(json!([1, 2])),
            Err(QueryError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_literals() {
        assert_eq!(string_literal("O'Hare"), "'O''Hare'");
        assert_eq!(number_literal(25.0), "25");
        assert_eq!(number_literal(-0.5), "-0.5");
        assert_eq!(number_literal(1e21), "1000000000000000000000");
    }
}
