use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(DbErr),

    /// 兑奖码不存在或已使用，刻意不区分，避免被枚举
    #[error("Invalid or already used code")]
    InvalidOrConsumedCode,

    #[error("No active prizes available")]
    NoPrizesAvailable,

    #[error("Prize {0} does not exist")]
    InvalidPrizeReference(i64),

    #[error("Code not found")]
    CodeNotFound,

    #[error("Code has not been redeemed yet")]
    CodeNotRedeemed,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<DbErr> for AppError {
    /// 唯一约束冲突归为 InternalError，其余数据库错误均为 StoreUnavailable
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                AppError::InternalError(format!("Unique constraint violated: {msg}"))
            }
            _ => AppError::StoreUnavailable(err),
        }
    }
}

impl AppError {
    /// 对外暴露的稳定错误码
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::InvalidOrConsumedCode => "INVALID_OR_CONSUMED_CODE",
            AppError::NoPrizesAvailable => "NO_PRIZES_AVAILABLE",
            AppError::InvalidPrizeReference(_) => "INVALID_PRIZE_REFERENCE",
            AppError::CodeNotFound => "CODE_NOT_FOUND",
            AppError::CodeNotRedeemed => "CODE_NOT_REDEEMED",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidOrConsumedCode | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NoPrizesAvailable | AppError::CodeNotRedeemed => StatusCode::CONFLICT,
            AppError::InvalidPrizeReference(_) | AppError::CodeNotFound | AppError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::StoreUnavailable(err) => {
                log::error!("Store error: {err}");
                "Service temporarily unavailable".to_string()
            }
            AppError::InvalidOrConsumedCode => {
                log::warn!("Rejected prize code");
                "Invalid or already used code, please try again".to_string()
            }
            AppError::NoPrizesAvailable => {
                log::warn!("Draw attempted with no active prizes configured");
                self.to_string()
            }
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                msg.clone()
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                msg.clone()
            }
            AppError::InvalidPrizeReference(_)
            | AppError::CodeNotFound
            | AppError::CodeNotRedeemed
            | AppError::NotFound(_) => self.to_string(),
            AppError::InternalError(_) => {
                log::error!("Internal error: {self}");
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": {
                "code": self.error_code(),
                "message": message
            }
        }))
    }
}
