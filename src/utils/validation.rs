use crate::utils::error::{CartMatchError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> CartMatchError {
    CartMatchError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// A catalog service URL: http or https, with a host.
pub fn validate_endpoint_url(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| invalid(field, endpoint, format!("not a catalog URL ({})", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            endpoint,
            format!("catalog endpoint must use http or https, not {}", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field, endpoint, "catalog endpoint has no host"));
    }
    Ok(())
}

/// Catalog or ingredient file path. Existence is checked when the file is read.
pub fn validate_file_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "no file path given"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path.escape_default(), "file path contains a NUL byte"));
    }
    Ok(())
}

pub fn validate_at_least(field: &str, value: u64, min: u64) -> Result<()> {
    if value < min {
        return Err(invalid(field, value, format!("must be at least {}", min)));
    }
    Ok(())
}

pub fn validate_not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "must not be blank"));
    }
    Ok(())
}

/// Inclusive range check; NaN is always out of range.
pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value.partial_cmp(&min).is_none() || value < min || value > max {
        return Err(invalid(field, value, format!("must lie within {}..={}", min, max)));
    }
    Ok(())
}

/// Case-insensitive membership in a fixed set of spellings.
pub fn validate_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    let wanted = value.trim();
    if allowed.iter().any(|a| a.eq_ignore_ascii_case(wanted)) {
        return Ok(());
    }
    Err(invalid(field, value, format!("expected one of {}", allowed.join(", "))))
}
