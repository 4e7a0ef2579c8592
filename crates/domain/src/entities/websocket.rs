//! WebSocket 线路协议
//!
//! 每个文本帧承载一个 `{"event": "...", "data": ...}` 信封。

use serde::{Deserialize, Serialize};

use crate::entities::message::ChatMessage;
use crate::entities::participant::{Participant, ParticipantRole};

/// 客户端到服务器的意图
///
/// 字段保持原始字符串，由协调器负责校验。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientIntent {
    /// 以指定名称和角色加入
    Join(JoinPayload),
    /// 发送聊天消息
    SendMessage(SendMessagePayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinPayload {
    pub name: String,
    pub role: ParticipantRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    pub message: String,
    pub timestamp: String,
}

impl ClientIntent {
    pub fn join(name: impl Into<String>, role: ParticipantRole) -> Self {
        ClientIntent::Join(JoinPayload {
            name: name.into(),
            role,
        })
    }

    pub fn send_message(message: impl Into<String>, timestamp: impl Into<String>) -> Self {
        ClientIntent::SendMessage(SendMessagePayload {
            message: message.into(),
            timestamp: timestamp.into(),
        })
    }

    /// 解析一个文本帧
    pub fn from_frame(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// 在线状态变化通知的负载
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceNotice {
    pub message: String,
    pub user: Participant,
}

/// 服务器到客户端的事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// 有人加入（不发给加入者本人）
    UserJoined(PresenceNotice),
    /// 完整名单快照
    ActiveUsers(Vec<Participant>),
    /// 聊天消息（包括发送者在内的所有人）
    ReceiveMessage(ChatMessage),
    /// 有人离开
    UserLeft(PresenceNotice),
}

impl ServerEvent {
    /// 线路上的事件名
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::UserJoined(_) => "user-joined",
            ServerEvent::ActiveUsers(_) => "active-users",
            ServerEvent::ReceiveMessage(_) => "receive-message",
            ServerEvent::UserLeft(_) => "user-left",
        }
    }

    pub fn from_frame(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
