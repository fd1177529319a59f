// ==========================================
// 咖啡配比 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::SessionState;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// 杯数/粉水比等超出冲煮方式支持的范围
    #[error("无效输入 (field={field}): {message}")]
    InvalidInput { field: String, message: String },

    /// 计时状态机不允许的转换
    #[error("无效的状态转换: from={from} to={to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },
}

impl EngineError {
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
