use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// 显示名称允许的最大字符数。
pub const MAX_DISPLAY_NAME_CHARS: usize = 64;

/// 连接唯一标识，在连接的整个生命周期内保持不变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// 为新打开的连接分配一个随机标识。
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ConnectionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<ConnectionId> for Uuid {
    fn from(value: ConnectionId) -> Self {
        value.0
    }
}

/// 消息唯一标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for MessageId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<MessageId> for Uuid {
    fn from(value: MessageId) -> Self {
        value.0
    }
}

/// 经过验证的显示名称：去除首尾空白后非空，不要求唯一。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_owned();
        if value.is_empty() {
            return Err(DomainError::validation_error("name", "cannot be empty"));
        }
        if value.chars().count() > MAX_DISPLAY_NAME_CHARS {
            return Err(DomainError::validation_error("name", "too long"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

/// 经过验证的消息正文：去除首尾空白后非空。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageBody(String);

impl MessageBody {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_owned();
        if value.is_empty() {
            return Err(DomainError::validation_error("message", "cannot be empty"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MessageBody {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<MessageBody> for String {
    fn from(value: MessageBody) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_trimmed() {
        let name = DisplayName::parse("  Ann  ").unwrap();
        assert_eq!(name.as_str(), "Ann");
    }

    #[test]
    fn blank_display_name_is_rejected() {
        assert!(DisplayName::parse("").is_err());
        assert!(DisplayName::parse(" \t\n ").is_err());
    }

    #[test]
    fn overlong_display_name_is_rejected() {
        let long = "x".repeat(MAX_DISPLAY_NAME_CHARS + 1);
        assert_eq!(
            DisplayName::parse(long),
            Err(DomainError::validation_error("name", "too long"))
        );
        assert!(DisplayName::parse("x".repeat(MAX_DISPLAY_NAME_CHARS)).is_ok());
    }

    #[test]
    fn blank_message_body_is_rejected() {
        assert!(MessageBody::parse("   ").is_err());
        assert_eq!(MessageBody::parse(" hi ").unwrap().as_str(), "hi");
    }

    #[test]
    fn display_name_deserialization_validates() {
        let err = serde_json::from_str::<DisplayName>("\"  \"");
        assert!(err.is_err());
        let ok: DisplayName = serde_json::from_str("\"Bo\"").unwrap();
        assert_eq!(ok.as_str(), "Bo");
    }
}
