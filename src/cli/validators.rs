//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

/// Parse and validate a bounded float value.
///
/// # Arguments
///
/// * `s` - The string to parse
/// * `min` - Minimum allowed value (inclusive)
/// * `max` - Maximum allowed value (inclusive)
/// * `name` - Name of the parameter for error messages
pub fn parse_bounded_float(s: &str, min: f64, max: f64, name: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(min..=max).contains(&value) {
        return Err(format!(
            "{name} must be between {min} and {max}, got {value}"
        ));
    }

    Ok(value)
}

/// Parse a duration in milliseconds that may be zero (fades).
pub fn parse_duration_ms(s: &str) -> Result<f64, String> {
    parse_bounded_float(s, 0.0, f64::MAX, "duration")
}

/// Parse a clip length in milliseconds, which must be positive.
pub fn parse_clip_length_ms(s: &str) -> Result<f64, String> {
    let value = parse_duration_ms(s)?;
    if value == 0.0 {
        return Err("clip length must be greater than 0".to_string());
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounded_float_valid() {
        assert_eq!(
            parse_bounded_float("50.0", -100.0, 100.0, "test").ok(),
            Some(50.0)
        );
        assert_eq!(
            parse_bounded_float("-100.0", -100.0, 100.0, "test").ok(),
            Some(-100.0)
        );
    }

    #[test]
    fn test_parse_bounded_float_invalid() {
        assert!(parse_bounded_float("101.0", -100.0, 100.0, "test").is_err());
        assert!(parse_bounded_float("abc", -100.0, 100.0, "test").is_err());
    }

    #[test]
    fn test_parse_duration_ms() {
        assert_eq!(parse_duration_ms("0").ok(), Some(0.0));
        assert_eq!(parse_duration_ms("250.5").ok(), Some(250.5));
        assert!(parse_duration_ms("-1").is_err());
        assert!(parse_duration_ms("NaN").is_err());
    }

    #[test]
    fn test_parse_clip_length_ms() {
        assert_eq!(parse_clip_length_ms("3000").ok(), Some(3000.0));
        assert!(parse_clip_length_ms("0").is_err());
    }
}
