use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on the number of thresholds in a zone list
pub const MAX_ZONES: usize = 10;

/// Per-user training zone thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub power_zones: Vec<i32>,
    pub heart_rate_zones: Vec<i32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZoneValidationError {
    #[error("{0} zones must not contain negative values")]
    Negative(&'static str),
    #[error("{0} zones must be strictly increasing")]
    NotIncreasing(&'static str),
    #[error("{0} zones may contain at most 10 thresholds")]
    TooMany(&'static str),
}

impl ZoneConfig {
    pub fn validate(&self) -> Result<(), ZoneValidationError> {
        validate_thresholds("power", &self.power_zones)?;
        validate_thresholds("heart rate", &self.heart_rate_zones)?;
        Ok(())
    }
}

fn validate_thresholds(kind: &'static str, thresholds: &[i32]) -> Result<(), ZoneValidationError> {
    if thresholds.len() > MAX_ZONES {
        return Err(ZoneValidationError::TooMany(kind));
    }
    if thresholds.iter().any(|&value| value < 0) {
        return Err(ZoneValidationError::Negative(kind));
    }
    if thresholds.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ZoneValidationError::NotIncreasing(kind));
    }
    Ok(())
}

/// Stored zones, empty when the user never configured them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonesResponse {
    pub power_zones: Vec<i32>,
    pub heart_rate_zones: Vec<i32>,
}

impl ZonesResponse {
    pub fn from_columns(power_zones: Option<Vec<i32>>, heart_rate_zones: Option<Vec<i32>>) -> Self {
        Self {
            power_zones: power_zones.unwrap_or_default(),
            heart_rate_zones: heart_rate_zones.unwrap_or_default(),
        }
    }
}
