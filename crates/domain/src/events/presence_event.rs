//! 在线状态领域事件

use serde::{Deserialize, Serialize};

use crate::entities::participant::Participant;
use crate::entities::websocket::{PresenceNotice, ServerEvent};

/// 在线状态变化类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceKind {
    Joined,
    Left,
}

/// 在线状态事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEvent {
    pub kind: PresenceKind,
    pub participant: Participant,
    /// 可读描述，例如 `Ann joined as client.`
    pub text: String,
}

impl PresenceEvent {
    /// 创建加入事件
    pub fn joined(participant: Participant) -> Self {
        let text = format!("{} joined as {}.", participant.name, participant.role);
        Self {
            kind: PresenceKind::Joined,
            participant,
            text,
        }
    }

    /// 创建离开事件
    pub fn left(participant: Participant) -> Self {
        let text = format!("{} left.", participant.name);
        Self {
            kind: PresenceKind::Left,
            participant,
            text,
        }
    }
}

impl From<PresenceEvent> for ServerEvent {
    fn from(event: PresenceEvent) -> Self {
        let notice = PresenceNotice {
            message: event.text,
            user: event.participant,
        };
        match event.kind {
            PresenceKind::Joined => ServerEvent::UserJoined(notice),
            PresenceKind::Left => ServerEvent::UserLeft(notice),
        }
    }
}
