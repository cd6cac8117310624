//! Validation helper functions for configuration types.

use crate::core::errors::{Result, SimilarityError};

/// Validate that a usize value is greater than zero.
pub fn validate_positive_usize(value: usize, field: &str) -> Result<()> {
    if value == 0 {
        return Err(SimilarityError::config_field(
            format!("{field} must be greater than 0"),
            field,
        ));
    }
    Ok(())
}

/// Validate that an f64 value is greater than zero.
pub fn validate_positive_f64(value: f64, field: &str) -> Result<()> {
    if value <= 0.0 {
        return Err(SimilarityError::config_field(
            format!("{field} must be greater than 0.0"),
            field,
        ));
    }
    Ok(())
}

/// Validate that an f64 value is in the unit range [0.0, 1.0].
pub fn validate_unit_range(value: f64, field: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimilarityError::config_field(
            format!("{field} must be between 0.0 and 1.0"),
            field,
        ));
    }
    Ok(())
}

/// Validate that a u32 value is greater than zero.
pub fn validate_positive_u32(value: u32, field: &str) -> Result<()> {
    if value == 0 {
        return Err(SimilarityError::config_field(
            format!("{field} must be greater than 0"),
            field,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_usize() {
        assert!(validate_positive_usize(0, "region_length").is_err());
        assert!(validate_positive_usize(1, "region_length").is_ok());
    }

    #[test]
    fn rejects_out_of_range_unit() {
        assert!(validate_unit_range(1.5, "candidate_threshold").is_err());
        assert!(validate_unit_range(-0.1, "candidate_threshold").is_err());
        assert!(validate_unit_range(0.8, "candidate_threshold").is_ok());
    }
}
