use crate::utils::error::{DeployError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(DeployError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

fn unit_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("static regex"))
}

fn path_segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("static regex"))
}

/// A single URL path segment that needs no percent-encoding, e.g. a GitHub
/// repository name.
pub fn validate_path_segment(field_name: &str, segment: &str) -> Result<()> {
    if segment == "." || segment == ".." || !path_segment_pattern().is_match(segment) {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: segment.to_string(),
            reason: "Must be a single path segment of letters, digits, '.', '_' or '-'"
                .to_string(),
        });
    }
    Ok(())
}

/// Unit names become URL path segments and build-tool project names.
pub fn validate_unit_name(field_name: &str, name: &str) -> Result<()> {
    if !unit_name_pattern().is_match(name) {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Must start with a lowercase letter and contain only a-z, 0-9 and '-'"
                .to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_unique<T, I>(field_name: &str, values: I) -> Result<()>
where
    T: Eq + Hash + std::fmt::Display,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    for value in values {
        if seen.contains(&value) {
            return Err(DeployError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.to_string(),
                reason: "Duplicate entry".to_string(),
            });
        }
        seen.insert(value);
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("site_origin", "https://example.org/app/").is_ok());
        assert!(validate_url("site_origin", "http://example.org").is_ok());
        assert!(validate_url("site_origin", "").is_err());
        assert!(validate_url("site_origin", "invalid-url").is_err());
        assert!(validate_url("site_origin", "ftp://example.org").is_err());
    }

    #[test]
    fn test_validate_unit_name() {
        assert!(validate_unit_name("units", "products").is_ok());
        assert!(validate_unit_name("units", "user-profile2").is_ok());
        assert!(validate_unit_name("units", "Products").is_err());
        assert!(validate_unit_name("units", "2cart").is_err());
        assert!(validate_unit_name("units", "cart/../x").is_err());
        assert!(validate_unit_name("units", "").is_err());
    }

    #[test]
    fn test_validate_path_segment() {
        assert!(validate_path_segment("repo_name", "mfedemos").is_ok());
        assert!(validate_path_segment("repo_name", "My_Repo.v2").is_ok());
        assert!(validate_path_segment("repo_name", "").is_err());
        assert!(validate_path_segment("repo_name", "..").is_err());
        assert!(validate_path_segment("repo_name", "a/b").is_err());
        assert!(validate_path_segment("repo_name", "my repo").is_err());
    }

    #[test]
    fn test_validate_unique() {
        assert!(validate_unique("units.dev_port", [4201u16, 4202, 4203]).is_ok());
        let err = validate_unique("units.name", ["cart", "products", "cart"]).unwrap_err();
        assert!(err.to_string().contains("cart"));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("port", 8080u16, 1, u16::MAX).is_ok());
        assert!(validate_range("port", 0u16, 1, u16::MAX).is_err());
    }
}
