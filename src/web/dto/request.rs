//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Default page size for listings.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest accepted page size.
pub const MAX_PER_PAGE: u32 = 100;

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

/// Pagination query parameters.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page number, starting at 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (1-100).
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationQuery {
    /// Clamp out-of-range values.
    pub fn normalized(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Offset and limit for the (normalized) page.
    pub fn to_offset_limit(&self) -> (usize, usize) {
        let p = self.normalized();
        let offset = (p.page as usize - 1) * p.per_page as usize;
        (offset, p.per_page as usize)
    }
}

/// Multipart upload form (documentation only; the handler reads the
/// stream field by field).
#[derive(ToSchema)]
pub struct UploadForm {
    /// The file.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Demo login request.
///
/// No password: demo sessions only record who the visitor says they are.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Display name (defaults to the email's local part).
    #[serde(default)]
    #[validate(length(max = 64, message = "Name must be at most 64 characters"))]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let q: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, DEFAULT_PER_PAGE);
        assert_eq!(q.to_offset_limit(), (0, 20));
    }

    #[test]
    fn test_pagination_offset() {
        let q = PaginationQuery {
            page: 3,
            per_page: 10,
        };
        assert_eq!(q.to_offset_limit(), (20, 10));
    }

    #[test]
    fn test_pagination_clamps() {
        let q = PaginationQuery {
            page: 0,
            per_page: 1000,
        };
        let n = q.normalized();
        assert_eq!(n.page, 1);
        assert_eq!(n.per_page, MAX_PER_PAGE);
        assert_eq!(q.to_offset_limit(), (0, 100));
    }

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            email: "ada@example.com".to_string(),
            name: Some("Ada".to_string()),
        };
        assert!(ok.validate().is_ok());

        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            name: None,
        };
        assert!(bad_email.validate().is_err());

        let long_name = LoginRequest {
            email: "ada@example.com".to_string(),
            name: Some("a".repeat(65)),
        };
        assert!(long_name.validate().is_err());
    }
}
