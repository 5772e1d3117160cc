use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::{query_params::RequestParams, server::api_entities::api_error::ApiError};

/// Extractor for query parameters with bracket notation support
///
/// Usage:
/// ```rust,ignore
/// async fn handler(
///     QueryParamsExtractor(params): QueryParamsExtractor,
/// ) -> Result<Response, ApiError> {
///     let query = ListQuery::from_params(&params, &args, &scopes, "index")?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct QueryParamsExtractor(pub RequestParams);

impl<S> FromRequestParts<S> for QueryParamsExtractor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query_string = parts.uri.query().unwrap_or("");
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(query_string).map_err(|e| {
                warn!("Failed to decode query string {:?}: {}", query_string, e);
                ApiError::BadRequest(format!("Invalid query string: {}", e))
            })?;

        Ok(QueryParamsExtractor(RequestParams::from_query_pairs(pairs)))
    }
}
