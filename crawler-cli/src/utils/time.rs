use std::fmt::Write;
use std::time::Duration;

use crate::error::AppError;

/// Parses a time with an optional unit (`s`, `m`, `h`) into seconds.
pub fn parse_time(time_str: &str) -> Result<f64, AppError> {
    let time_str = time_str.trim();
    if time_str.is_empty() {
        return Err(AppError::ParseError("Invalid format: empty string".to_string()));
    }

    if let Ok(seconds) = time_str.parse::<f64>() {
        return Ok(seconds);
    }

    // Split between the numeric part and the unit
    let split_index = time_str
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(time_str.len());

    let numeric_part = &time_str[..split_index];
    let unit_part = time_str[split_index..].trim().to_lowercase();

    let value = numeric_part
        .parse::<f64>()
        .map_err(|_| AppError::ParseError(format!("Invalid number in '{time_str}'")))?;

    match unit_part.as_str() {
        "s" => Ok(value),
        "m" => Ok(value * 60.0),
        "h" => Ok(value * 3600.0),
        _ => Err(AppError::ParseError(format!(
            "Invalid unit '{unit_part}', expected s, m or h"
        ))),
    }
}

/// Like [`parse_time`], but rejects negative values and returns a `Duration`.
pub fn parse_delay(time_str: &str) -> Result<Duration, AppError> {
    let seconds = parse_time(time_str)?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| AppError::ParseError(format!("Invalid delay '{time_str}': {e}")))
}

/// Convert a duration to a human-readable format
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs_f64();
    let mut result = String::with_capacity(10);

    // writing into a String cannot fail
    if seconds >= 3600.0 {
        let _ = write!(result, "{:.2}h", seconds / 3600.0);
    } else if seconds >= 60.0 {
        let _ = write!(result, "{:.2}m", seconds / 60.0);
    } else {
        let _ = write!(result, "{seconds:.2}s");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_units() {
        assert_eq!(parse_time("300").unwrap(), 300.0);
        assert_eq!(parse_time("0.8").unwrap(), 0.8);
        assert_eq!(parse_time("30s").unwrap(), 30.0);
        assert_eq!(parse_time("5m").unwrap(), 300.0);
        assert_eq!(parse_time("1.5h").unwrap(), 5400.0);
        assert_eq!(parse_time(" 2 M ").unwrap(), 120.0);
    }

    #[test]
    fn test_parse_time_errors() {
        assert!(parse_time("").is_err());
        assert!(parse_time("5d").is_err());
        assert!(parse_time("m").is_err());
    }

    #[test]
    fn test_parse_delay() {
        assert_eq!(parse_delay("0.8").unwrap(), Duration::from_millis(800));
        assert_eq!(parse_delay("5m").unwrap(), Duration::from_secs(300));
        assert!(parse_delay("-1").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(800)), "0.80s");
        assert_eq!(format_duration(Duration::from_secs(300)), "5.00m");
        assert_eq!(format_duration(Duration::from_secs(5400)), "1.50h");
    }
}
