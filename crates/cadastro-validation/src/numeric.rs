//! Numeric validation and coercion functions

/// Outcome of coercing raw text into a number
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    Number(f64),
    NotANumber,
}

/// Coerces user text into a number.
///
/// Surrounding whitespace is ignored and blank input coerces to `0`.
/// Non-finite results (`NaN`, `inf`) are rejected.
pub fn coerce_number(raw: &str) -> Coerced {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Coerced::Number(0.0);
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Coerced::Number(n),
        _ => Coerced::NotANumber,
    }
}

/// Validates minimum value for numeric types
pub fn validate_min<T: PartialOrd + std::fmt::Display>(value: T, min: T) -> Result<(), String> {
    if value >= min {
        Ok(())
    } else {
        Err(format!("Must be at least {}", min))
    }
}

/// Validates maximum value for numeric types
pub fn validate_max<T: PartialOrd + std::fmt::Display>(value: T, max: T) -> Result<(), String> {
    if value <= max {
        Ok(())
    } else {
        Err(format!("Must be at most {}", max))
    }
}

/// Formats a number without a trailing `.0` for integral values
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
