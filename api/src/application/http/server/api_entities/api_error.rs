use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sortscope_core::domain::{
    common::entities::app_errors::CoreError, params::errors::ParseError,
};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InternalServerError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "E_BAD_REQUEST",
            ApiError::NotFound(_) => "E_NOT_FOUND",
            ApiError::InternalServerError(_) => "E_INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound => ApiError::NotFound("Not found".to_string()),
            CoreError::InvalidParams(e) => ApiError::from(e),
            CoreError::InvalidPagination(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }

        let body = ApiErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortscope_core::domain::params::value_objects::ParamValue;

    #[test]
    fn test_parse_error_is_bad_request() {
        let err = ApiError::from(ParseError::new(
            "invalid digit found in string",
            ParamValue::scalar("x"),
        ));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            r#"Error while parsing: "x" (invalid digit found in string)"#
        );
    }

    #[test]
    fn test_core_error_mapping() {
        assert_eq!(
            ApiError::from(CoreError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(CoreError::InvalidPagination("bad".to_string())),
            ApiError::BadRequest("bad".to_string())
        );
        assert_eq!(
            ApiError::from(CoreError::InvalidParams(ParseError::for_value(
                ParamValue::scalar("y")
            )))
            .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::NotFound("Project not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::BadRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_body_is_json() {
        let response = ApiError::BadRequest("bad".to_string()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            ApiErrorBody {
                code: "E_BAD_REQUEST".to_string(),
                message: "bad".to_string(),
            }
        );
    }
}
