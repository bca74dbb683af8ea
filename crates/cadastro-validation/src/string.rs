//! String validation functions
//!
//! Lengths are counted in characters, so accented names such as "João"
//! measure the way a user would count them.

use regex::Regex;

/// Number of characters in `s`
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Validates minimum string length
pub fn validate_min_length(s: &str, min: usize) -> Result<(), String> {
    if char_len(s) >= min {
        Ok(())
    } else {
        Err(format!("Must be at least {} characters", min))
    }
}

pub fn validate_max_length(s: &str, max: usize) -> Result<(), String> {
    if char_len(s) <= max {
        Ok(())
    } else {
        Err(format!("Must be at most {} characters", max))
    }
}

/// Validates that `value` matches an already compiled pattern
pub fn validate_pattern(value: &str, pattern: &Regex) -> Result<(), String> {
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err("Invalid format".to_string())
    }
}
