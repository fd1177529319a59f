// ==========================================
// 咖啡配比 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把引擎/仓储错误转换为用户可读的错误消息
// 约束: 任何错误都不终止进程
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与状态错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidTransition { from: String, to: String },

    /// 表单校验失败（带逐项原因）
    #[error("数据验证失败: {reason}")]
    ValidationError {
        reason: String,
        violations: Vec<FieldViolation>,
    },

    // ==========================================
    // 权限错误
    // ==========================================
    /// 保存/添加/分享需要高级版
    #[error("需要高级版: {0}")]
    PremiumRequired(String),

    // ==========================================
    // 数据错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据解析失败: {0}")]
    DecodeError(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("文件读写失败: {0}")]
    IoError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DecodeError {
                source_name,
                message,
            } => ApiError::DecodeError(format!("{}: {}", source_name, message)),
            RepositoryError::EncodeError(msg) => ApiError::InternalError(msg),

            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DuplicateId(id) => {
                ApiError::InvalidInput(format!("食谱 id 已存在: {}", id))
            }
            RepositoryError::IndexOutOfRange { index, len } => {
                ApiError::InvalidInput(format!("位置 {} 越界（共 {} 项）", index, len))
            }

            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),

            RepositoryError::IoError(msg) => ApiError::IoError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidInput { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            EngineError::InvalidTransition { from, to } => ApiError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            },
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 校验违规详情
// ==========================================

/// 单个字段的校验违规
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// 字段名（name / coffeeAmount / waterAmount / brewSeconds / waterTemperature）
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
