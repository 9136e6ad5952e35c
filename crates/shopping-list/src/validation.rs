//! Input validation for new and merged items.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Amount outside `0..=MAX_AMOUNT`.
    AmountOutOfRange(i64),
    /// Unknown sort mode name.
    InvalidSortMode(String),
    /// Unknown list name.
    InvalidListType(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::AmountOutOfRange(amount) => {
                write!(f, "amount {} is out of range (0..={})", amount, MAX_AMOUNT)
            }
            ValidationError::InvalidSortMode(mode) => {
                write!(f, "unknown sort mode '{}' (expected Alphabetical or Custom)", mode)
            }
            ValidationError::InvalidListType(list) => {
                write!(f, "unknown list '{}' (expected ToBuy or PrevBought)", list)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for item names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Largest amount a single item may carry, including after merges.
pub const MAX_AMOUNT: i64 = 1_000_000;

/// Validate and normalize an item name.
///
/// Surrounding whitespace is dropped; matching on the result stays
/// case-sensitive.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Empty("name".to_string()));
    }

    let chars = name.chars().count();
    if chars > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
            actual: chars,
        });
    }

    Ok(name.to_string())
}

/// Validate an amount.
pub fn validate_amount(amount: i64) -> Result<i64, ValidationError> {
    if !(0..=MAX_AMOUNT).contains(&amount) {
        return Err(ValidationError::AmountOutOfRange(amount));
    }
    Ok(amount)
}

/// Add `extra` to an existing amount, rejecting totals above the maximum.
pub fn merged_amount(current: i64, extra: i64) -> Result<i64, ValidationError> {
    let total = current
        .checked_add(extra)
        .ok_or(ValidationError::AmountOutOfRange(i64::MAX))?;
    validate_amount(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Milk").unwrap(), "Milk");
        assert_eq!(validate_name("  Oat milk ").unwrap(), "Oat milk");

        assert!(matches!(validate_name(""), Err(ValidationError::Empty(_))));
        assert!(matches!(validate_name("   "), Err(ValidationError::Empty(_))));

        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            validate_name(&long),
            Err(ValidationError::TooLong { actual, .. }) if actual == MAX_NAME_LENGTH + 1
        ));
        assert!(validate_name(&"é".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount(0), Ok(0));
        assert_eq!(validate_amount(MAX_AMOUNT), Ok(MAX_AMOUNT));
        assert_eq!(validate_amount(-1), Err(ValidationError::AmountOutOfRange(-1)));
        assert!(validate_amount(MAX_AMOUNT + 1).is_err());
    }

    #[test]
    fn test_merged_amount() {
        assert_eq!(merged_amount(2, 3), Ok(5));
        assert!(merged_amount(MAX_AMOUNT, 1).is_err());
        assert!(merged_amount(i64::MAX, 1).is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::Empty("name".to_string());
        assert_eq!(err.to_string(), "name cannot be empty");

        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
            actual: 250,
        };
        assert_eq!(err.to_string(), "name is too long (250 chars, max 200)");
    }
}
