//! 领域实体定义
//!
//! 包含系统的核心实体：参与者、聊天消息，以及 WebSocket 线路协议。

pub mod message;
pub mod participant;
pub mod websocket;

// 重新导出核心实体
pub use message::ChatMessage;
pub use participant::{Participant, ParticipantRole};
pub use websocket::{ClientIntent, JoinPayload, PresenceNotice, SendMessagePayload, ServerEvent};
