//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use inventory_core::Snowflake;

use crate::response::ApiError;

/// Material id taken from `/inventory/:material_id`
#[derive(Debug, Clone, Copy)]
pub struct MaterialIdPath(pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for MaterialIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        raw.parse()
            .map(MaterialIdPath)
            .map_err(|_| ApiError::invalid_path("Invalid material_id format"))
    }
}
