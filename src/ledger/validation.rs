use crate::errors::ValidationError;

/// Descriptions must carry at least one non-whitespace character.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    Ok(())
}

/// Amounts must be finite and strictly positive.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::NonFiniteAmount);
    }
    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}

/// Parses raw form input into a valid amount. The whole trimmed string must be
/// a number; trailing garbage such as `"12abc"` is rejected.
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let amount = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::UnparsableAmount(trimmed.to_string()))?;
    validate_amount(amount)?;
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_descriptions() {
        assert_eq!(
            validate_description(""),
            Err(ValidationError::MissingDescription)
        );
        assert_eq!(
            validate_description(" \t\n"),
            Err(ValidationError::MissingDescription)
        );
        assert!(validate_description(" Rent ").is_ok());
    }

    #[test]
    fn rejects_non_positive_and_non_finite_amounts() {
        assert_eq!(
            validate_amount(0.0),
            Err(ValidationError::NonPositiveAmount(0.0))
        );
        assert_eq!(
            validate_amount(-5.0),
            Err(ValidationError::NonPositiveAmount(-5.0))
        );
        assert_eq!(validate_amount(f64::NAN), Err(ValidationError::NonFiniteAmount));
        assert_eq!(
            validate_amount(f64::INFINITY),
            Err(ValidationError::NonFiniteAmount)
        );
        assert!(validate_amount(0.01).is_ok());
    }

    #[test]
    fn parse_amount_is_strict() {
        assert_eq!(parse_amount(" 12.50 "), Ok(12.5));
        assert_eq!(parse_amount("1e3"), Ok(1000.0));
        assert_eq!(
            parse_amount("12abc"),
            Err(ValidationError::UnparsableAmount("12abc".into()))
        );
        assert_eq!(
            parse_amount(""),
            Err(ValidationError::UnparsableAmount(String::new()))
        );
        assert_eq!(parse_amount("NaN"), Err(ValidationError::NonFiniteAmount));
        assert_eq!(
            parse_amount("-3"),
            Err(ValidationError::NonPositiveAmount(-3.0))
        );
    }
}
