//! Collection validation functions

/// Validates minimum number of items in a collection
pub fn validate_min_items(len: usize, min: usize) -> Result<(), String> {
    if len >= min {
        Ok(())
    } else {
        Err(format!("Must have at least {} items", min))
    }
}
