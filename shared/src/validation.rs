//! Validation utilities for farm, zone and tree input

use rust_decimal::Decimal;

/// Exclusive upper bound on lengths and offsets, in meters (NUMERIC(12, 2) columns)
pub const MAX_LENGTH_METERS: i64 = 10_000_000_000;

/// Decimal places kept for lengths and offsets (centimeters)
pub const LENGTH_SCALE: u32 = 2;

/// Shared bounds of dimensions and offsets: storable without rounding
fn validate_storable(value: Decimal) -> Result<(), &'static str> {
    if value >= Decimal::from(MAX_LENGTH_METERS) {
        return Err("Value must be below 10000000000 m");
    }
    if value.normalize().scale() > LENGTH_SCALE {
        return Err("Value cannot have more than 2 decimal places");
    }
    Ok(())
}

/// Validate a farm or zone dimension (meters, strictly positive)
pub fn validate_dimension(value: Decimal) -> Result<(), &'static str> {
    if value <= Decimal::ZERO {
        return Err("Dimension must be greater than zero");
    }
    validate_storable(value)
}

/// Validate a zone offset inside the farm frame
pub fn validate_offset(value: Decimal) -> Result<(), &'static str> {
    if value < Decimal::ZERO {
        return Err("Offset cannot be negative");
    }
    validate_storable(value)
}

/// Validate a soil moisture threshold percentage
pub fn validate_moisture_threshold(threshold: i32) -> Result<(), &'static str> {
    if !(0..=100).contains(&threshold) {
        return Err("Moisture threshold must be between 0 and 100");
    }
    Ok(())
}

/// Validate a display name (farm or zone)
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    Ok(())
}

/// Validate a tree code label
pub fn validate_tree_code(code: &str) -> Result<(), &'static str> {
    if code.trim().is_empty() {
        return Err("Tree code cannot be empty");
    }
    Ok(())
}

/// Validate a grid row or column index
pub fn validate_grid_index(value: i32) -> Result<(), &'static str> {
    if value < 0 {
        return Err("Grid index cannot be negative");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_dimension() {
        assert!(validate_dimension(Decimal::from(1)).is_ok());
        assert!(validate_dimension(Decimal::from_str("0.5").unwrap()).is_ok());
        assert!(validate_dimension(Decimal::ZERO).is_err());
        assert!(validate_dimension(Decimal::from(-3)).is_err());
    }

    #[test]
    fn test_dimension_must_be_storable() {
        assert!(validate_dimension(Decimal::from_str("9999999999.99").unwrap()).is_ok());
        assert!(validate_dimension(Decimal::from(MAX_LENGTH_METERS)).is_err());
        assert!(validate_dimension(Decimal::from(1_000_000_000_000_000i64)).is_err());
        assert!(validate_dimension(Decimal::from_str("40.005").unwrap()).is_err());
        assert!(validate_dimension(Decimal::from_str("0.004").unwrap()).is_err());
        assert!(validate_dimension(Decimal::from_str("40.500").unwrap()).is_ok());
        assert!(validate_offset(Decimal::from_str("12.345").unwrap()).is_err());
        assert!(validate_offset(Decimal::from(MAX_LENGTH_METERS)).is_err());
    }

    #[test]
    fn test_validate_offset() {
        assert!(validate_offset(Decimal::ZERO).is_ok());
        assert!(validate_offset(Decimal::from(12)).is_ok());
        assert!(validate_offset(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_moisture_threshold() {
        assert!(validate_moisture_threshold(0).is_ok());
        assert!(validate_moisture_threshold(45).is_ok());
        assert!(validate_moisture_threshold(100).is_ok());
        assert!(validate_moisture_threshold(-1).is_err());
        assert!(validate_moisture_threshold(101).is_err());
    }

    #[test]
    fn test_validate_name_and_code() {
        assert!(validate_name("Parcelle Nord").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_tree_code("T001").is_ok());
        assert!(validate_tree_code("").is_err());
    }

    #[test]
    fn test_validate_grid_index() {
        assert!(validate_grid_index(0).is_ok());
        assert!(validate_grid_index(7).is_ok());
        assert!(validate_grid_index(-1).is_err());
    }
}
