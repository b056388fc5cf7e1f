use crate::utils::error::{ResolverError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid_value(field: &str, value: impl ToString, reason: impl Into<String>) -> ResolverError {
    ResolverError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 目錄服務端點只接受 http/https
pub fn validate_endpoint(field: &str, endpoint: &str) -> Result<Url> {
    if endpoint.trim().is_empty() {
        return Err(invalid_value(field, endpoint, "endpoint cannot be empty"));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| invalid_value(field, endpoint, format!("not a valid URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        let reason = format!("scheme '{}' is not http or https", url.scheme());
        return Err(invalid_value(field, endpoint, reason));
    }
    Ok(url)
}

/// 逾時秒數至少 1 秒；0 會讓每個請求立刻失敗
pub fn validate_timeout_seconds(field: &str, seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(invalid_value(field, seconds, "timeout must be at least 1 second"));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ResolverError::MissingConfigError {
        field: field.to_string(),
    })
}

pub fn validate_not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid_value(field, value, "value cannot be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_endpoint() {
        let url = validate_endpoint("service.endpoint", "https://example.com/api/search/address").unwrap();
        assert_eq!(url.path(), "/api/search/address");
        assert!(validate_endpoint("service.endpoint", "http://127.0.0.1:8080").is_ok());

        for bad in ["", "   ", "invalid-url", "ftp://example.com"] {
            let err = validate_endpoint("service.endpoint", bad).unwrap_err();
            assert!(err.to_string().contains("service.endpoint"), "{}", bad);
        }
    }

    #[test]
    fn test_validate_timeout_seconds() {
        assert!(validate_timeout_seconds("service.timeout_seconds", 5).is_ok());
        assert!(validate_timeout_seconds("service.timeout_seconds", 1).is_ok());
        assert!(matches!(
            validate_timeout_seconds("service.timeout_seconds", 0),
            Err(ResolverError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("fallback[0].match_key", "新宿区").is_ok());
        assert!(validate_not_blank("fallback[0].match_key", " \t　").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3u64);
        let missing: Option<u64> = None;
        assert_eq!(*validate_required_field("endpoint", &present).unwrap(), 3);
        assert!(matches!(
            validate_required_field("endpoint", &missing),
            Err(ResolverError::MissingConfigError { .. })
        ));
    }
}
