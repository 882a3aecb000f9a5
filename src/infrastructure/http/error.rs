//! HTTP Error Handling
//!
//! 与流水线失败相关的错误使用真实的 HTTP 状态码，`errno` 字段与状态码一致。

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;
use crate::domain::pipeline::{Stage, StageError, StageErrorKind};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            errno: status.as_u16(),
            error: error.into(),
            stage: None,
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    /// 音频定位符不存在、已过期或格式非法
    ArtifactNotFound(String),
    StageFailed(StageError),
    Internal(String),
}

impl ApiError {
    /// 读取 multipart 表单失败；超出请求体限制时返回 413
    pub fn multipart(err: MultipartError) -> Self {
        let message = format!("Failed to read multipart field: {}", err.body_text());
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(message)
        } else {
            ApiError::BadRequest(message)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ArtifactNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StageFailed(err) => match err.kind {
                StageErrorKind::StageTimeout => StatusCode::GATEWAY_TIMEOUT,
                StageErrorKind::StageUnreachable | StageErrorKind::StageRejected => {
                    StatusCode::BAD_GATEWAY
                }
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let response = match self {
            ApiError::BadRequest(msg) | ApiError::PayloadTooLarge(msg) => {
                tracing::warn!(errno = status.as_u16(), error = %msg, "Bad request");
                ErrorResponse::new(status, msg)
            }
            ApiError::ArtifactNotFound(locator) => {
                tracing::warn!(errno = status.as_u16(), locator = %locator, "Audio file not found");
                ErrorResponse::new(status, "Audio file not found").with_kind("ArtifactNotFound")
            }
            ApiError::StageFailed(err) => {
                tracing::error!(
                    errno = status.as_u16(),
                    stage = %err.stage,
                    kind = %err.kind,
                    transient = err.transient,
                    cause = %err.cause,
                    "Voice query failed"
                );
                ErrorResponse::new(status, err.to_string())
                    .with_stage(err.stage)
                    .with_kind(err.kind.as_str())
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = status.as_u16(), error = %msg, "Internal server error");
                ErrorResponse::new(status, msg)
            }
        };

        (status, Json(response)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::Stage(err) => ApiError::StageFailed(err),
            ApplicationError::ArtifactNotFound(locator) => ApiError::ArtifactNotFound(locator),
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::StorageError(msg) => ApiError::Internal(msg),
        }
    }
}
