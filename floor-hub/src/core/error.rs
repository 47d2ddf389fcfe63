use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("端口绑定失败: {0}")]
    Bind(#[source] std::io::Error),

    #[error("{0}")]
    Hub(#[from] AppError),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ServerError::Hub(err) => (
                StatusCode::SERVICE_UNAVAILABLE,
                err.code.kind().to_string(),
                err.message.clone(),
            ),
            ServerError::Bind(_) | ServerError::Internal(_) => {
                // 记录内部错误但不暴露详细信息
                tracing::error!(error = ?self, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error".to_string(),
                    "An internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error_type,
                message,
            }),
        )
            .into_response()
    }
}

/// 处理器的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
