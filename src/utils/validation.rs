use crate::utils::error::{DedupError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DedupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DedupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DedupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// A compound suffix must have exactly two non-empty labels, e.g. `co.uk`.
pub fn validate_compound_suffix(field_name: &str, suffix: &str) -> Result<()> {
    let labels: Vec<&str> = suffix.split('.').collect();
    if labels.len() != 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(DedupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: suffix.to_string(),
            reason: "Compound suffix must have exactly two labels".to_string(),
        });
    }
    Ok(())
}

pub fn validate_unique_values(field_name: &str, values: &[usize]) -> Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(DedupError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.to_string(),
                reason: "Column index is used by more than one role".to_string(),
            });
        }
    }
    Ok(())
}
