//! Request extractors.

use std::str::FromStr;

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, NaiveDate};

use khata_shared::types::OrganizationId;

use crate::error::ApiError;

/// Header carrying the tenant of every ledger request.
pub const ORGANIZATION_HEADER: &str = "x-organization-id";

/// Organization scope taken from the `x-organization-id` header.
///
/// Missing or malformed values are rejected with 400 before any handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgScope(pub OrganizationId);

impl<S> FromRequestParts<S> for OrgScope
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ORGANIZATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ApiError::bad_request(
                    "MISSING_ORGANIZATION",
                    format!("The {ORGANIZATION_HEADER} header is required"),
                )
            })?;

        OrganizationId::from_str(raw).map(Self).map_err(|_| {
            ApiError::bad_request("INVALID_ID", format!("Invalid organization id: {raw}"))
        })
    }
}

/// Parses a typed id from a path segment or body field.
pub fn parse_id<T: FromStr>(field: &str, raw: &str) -> Result<T, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request("INVALID_ID", format!("Invalid {field}: {raw}")))
}

/// Parses `YYYY-MM-DD`, or an RFC 3339 timestamp truncated to its date.
pub fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|dt| dt.date_naive()))
        .map(Some)
        .map_err(|_| ApiError::bad_request("INVALID_DATE", format!("Invalid {field}: {text}")))
}
