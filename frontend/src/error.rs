//! 错误类型模块
//!
//! - `HttpError`: 传输层错误（请求未得到响应）
//! - `ApiError`: 客户端层错误，视图据此渲染固定文案

use thiserror::Error;

/// HTTP 传输错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// 请求构建失败
    #[error("request build failed: {0}")]
    RequestBuildFailed(String),
    /// 网络请求失败
    #[error("network error: {0}")]
    NetworkError(String),
    /// 响应读取失败
    #[error("response read failed: {0}")]
    ResponseParseFailed(String),
}

/// API 客户端错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 没有收到响应
    #[error("network failure: {0}")]
    Network(String),
    /// HTTP 401，已由客户端统一处理（注销并跳转登录页）
    #[error("session expired")]
    Unauthorized,
    /// 登录失败
    #[error("invalid credentials")]
    InvalidCredentials,
    /// 其他非 2xx 响应
    #[error("request failed with status {0}")]
    Status(u16),
    /// 2xx 响应体与预期结构不符
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// 面向用户的固定文案，不包含字段级细节
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Unable to reach the server. Check your connection.",
            ApiError::Unauthorized => "Your session has expired. Please log in again.",
            ApiError::InvalidCredentials => "Invalid credentials. Please try again.",
            ApiError::Status(404) => "The requested item was not found.",
            ApiError::Status(status) if *status >= 500 => {
                "The server ran into a problem. Please try again."
            }
            ApiError::Status(_) => "The request was rejected. Please check your input.",
            ApiError::Decode(_) => "Received an unexpected response from the server.",
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        ApiError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
