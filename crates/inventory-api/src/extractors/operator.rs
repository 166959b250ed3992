//! Operator identity extractor
//!
//! The upstream gateway authenticates callers and forwards who they are in
//! two headers. The name travels as raw UTF-8 bytes, so it is decoded from
//! the byte value rather than through `HeaderValue::to_str`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use inventory_core::{Operator, Snowflake};

use crate::response::ApiError;

pub const OPERATOR_ID_HEADER: &str = "x-operator-id";
pub const OPERATOR_NAME_HEADER: &str = "x-operator-name";

const MAX_OPERATOR_NAME_LEN: usize = 100;

/// Operator performing the request
#[derive(Debug, Clone)]
pub struct CurrentOperator(pub Operator);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentOperator
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_id = parts
            .headers
            .get(OPERATOR_ID_HEADER)
            .map(|v| v.as_bytes())
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::MissingOperator)?;
        let raw_name = parts
            .headers
            .get(OPERATOR_NAME_HEADER)
            .map(|v| v.as_bytes())
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::MissingOperator)?;

        let id = std::str::from_utf8(raw_id)
            .ok()
            .and_then(|s| s.parse::<Snowflake>().ok())
            .ok_or_else(|| ApiError::InvalidOperator(format!("{OPERATOR_ID_HEADER} is not a valid id")))?;

        let name = String::from_utf8(raw_name.to_vec())
            .map_err(|_| ApiError::InvalidOperator(format!("{OPERATOR_NAME_HEADER} is not valid UTF-8")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::MissingOperator);
        }
        if name.chars().count() > MAX_OPERATOR_NAME_LEN {
            return Err(ApiError::InvalidOperator(format!(
                "{OPERATOR_NAME_HEADER} exceeds {MAX_OPERATOR_NAME_LEN} characters"
            )));
        }

        Ok(CurrentOperator(Operator::new(id, name)))
    }
}
