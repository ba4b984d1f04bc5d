use regex::Regex;
use std::sync::OnceLock;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Validation error for field '{}': {}",
            self.field, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// Validate an asset name used to build property aliases
///
/// Names become a single path segment of `/<asset>/<property>`, so slashes
/// and whitespace are not allowed.
pub fn validate_asset_name(name: &str) -> Result<(), ValidationError> {
    static ASSET_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = ASSET_NAME_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.:-]{1,256}$").expect("asset name regex is valid")
    });

    if regex.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "asset_name",
            format!(
                "Asset name '{}' must be 1-256 characters of letters, digits, '_', '.', ':' or '-'",
                name
            ),
        ))
    }
}

/// Validate a numeric threshold before it is rendered as a query literal
pub fn validate_threshold(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new(field, "Threshold must be a finite number"))
    }
}
