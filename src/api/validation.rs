use super::ApiError;

/// Parses `?page=`. Missing or blank means the first page.
pub fn validate_page(raw: Option<&str>) -> Result<u64, ApiError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(1);
    }

    match raw.parse::<u64>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(ApiError::validation(format!(
            "Invalid page: {}. Page must be a positive integer",
            raw
        ))),
    }
}

pub fn validate_comment_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid comment ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_page() {
        assert_eq!(validate_page(None).unwrap(), 1);
        assert_eq!(validate_page(Some("")).unwrap(), 1);
        assert_eq!(validate_page(Some("3")).unwrap(), 3);
        assert!(validate_page(Some("0")).is_err());
        assert!(validate_page(Some("-2")).is_err());
        assert!(validate_page(Some("abc")).is_err());
    }

    #[test]
    fn test_validate_comment_id() {
        assert!(validate_comment_id(1).is_ok());
        assert!(validate_comment_id(0).is_err());
    }
}
