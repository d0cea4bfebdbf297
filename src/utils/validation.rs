use crate::utils::error::{LibraryError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Data file names must be plain file names; directories come from `data_dir`.
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;

    let path = Path::new(name);
    if path.file_name().map(|f| f == path.as_os_str()) != Some(true) {
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Expected a file name without directory components".to_string(),
        });
    }

    Ok(())
}

pub fn validate_distinct(field_name: &str, first: &str, second: &str) -> Result<()> {
    if first == second {
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: first.to_string(),
            reason: "Books and members must be stored in different files".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LibraryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.data_dir", "./data").is_ok());
        assert!(validate_path("storage.data_dir", "").is_err());
        assert!(validate_path("storage.data_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("storage.books_file", "books.txt").is_ok());
        assert!(validate_file_name("storage.books_file", "data/books.txt").is_err());
        assert!(validate_file_name("storage.books_file", "..").is_err());
    }

    #[test]
    fn test_validate_distinct_and_non_empty() {
        assert!(validate_distinct("storage", "books.txt", "members.txt").is_ok());
        assert!(validate_distinct("storage", "data.txt", "data.txt").is_err());
        assert!(validate_non_empty_string("Title", "  ").is_err());
        assert!(validate_non_empty_string("Title", "Dune").is_ok());
    }
}
