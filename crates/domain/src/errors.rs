//! 领域模型错误定义
//!
//! 定义了在线状态与消息模型中可能出现的错误类型，提供清晰的错误上下文。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 验证错误
    #[error("验证失败: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// 连接已经注册过参与者
    #[error("连接已注册: {connection_id}")]
    AlreadyRegistered { connection_id: String },
}

impl DomainError {
    /// 创建验证错误
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建重复注册错误
    pub fn already_registered(connection_id: impl ToString) -> Self {
        Self::AlreadyRegistered {
            connection_id: connection_id.to_string(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;
