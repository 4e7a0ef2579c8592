use domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("intent rejected: {0}")]
    Rejected(&'static str),
    #[error("chat hub is unavailable")]
    HubUnavailable,
}

impl ApplicationError {
    /// 创建意图被拒绝的错误
    pub fn rejected(reason: &'static str) -> Self {
        ApplicationError::Rejected(reason)
    }
}
