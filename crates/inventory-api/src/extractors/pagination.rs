//! Pagination extractor
//!
//! Extracts page/page-size parameters from query strings.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use inventory_service::PageParams;
use validator::Validate;

use crate::response::ApiError;

/// Validated page selection (`page` from 1, `pageSize` 1-100)
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination(pub PageParams);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        params.validate()?;
        Ok(Pagination(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str) -> Result<Pagination, ApiError> {
        let (mut parts, ()) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        Pagination::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_defaults_when_absent() {
        let Pagination(page) = extract("/inventory").await.unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
    }

    #[tokio::test]
    async fn test_explicit_page() {
        let Pagination(page) = extract("/inventory?page=3&pageSize=25").await.unwrap();
        assert_eq!(page.offset(), 50);
        assert_eq!(page.limit(), 25);
    }

    #[tokio::test]
    async fn test_out_of_range_rejected() {
        assert!(matches!(
            extract("/inventory?pageSize=500").await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            extract("/inventory?page=zero").await,
            Err(ApiError::InvalidQuery(_))
        ));
    }
}
