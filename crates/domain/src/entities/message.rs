use serde::{Deserialize, Serialize};

use crate::entities::participant::{Participant, ParticipantRole};
use crate::value_objects::{DisplayName, MessageBody, MessageId};

/// 已受理的聊天消息
///
/// 消息不做持久化，只存在于广播流和各客户端本地日志中。
/// `sent_at` 为客户端提供的时间戳，原样回显。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    #[serde(rename = "message")]
    pub body: MessageBody,
    #[serde(rename = "sender")]
    pub sender_name: DisplayName,
    #[serde(rename = "senderType")]
    pub sender_role: ParticipantRole,
    #[serde(rename = "timestamp")]
    pub sent_at: String,
}

impl ChatMessage {
    pub fn compose(
        id: MessageId,
        sender: &Participant,
        body: MessageBody,
        sent_at: impl Into<String>,
    ) -> Self {
        Self {
            id,
            body,
            sender_name: sender.name.clone(),
            sender_role: sender.role,
            sent_at: sent_at.into(),
        }
    }
}
