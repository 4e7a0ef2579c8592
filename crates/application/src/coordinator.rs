//! 会话协调器
//!
//! 每个连接一个状态机：`Connected` -> `Joined` -> `Closed`。
//! 协调器独占注册表，消费入站事件，返回需要分发的出站事件；
//! 它本身不接触任何传输层发送端。

use std::collections::HashMap;
use std::sync::Arc;

use domain::{
    ChatMessage, ClientIntent, ConnectionId, DisplayName, JoinPayload, MessageBody,
    PresenceEvent, SendMessagePayload, ServerEvent,
};

use crate::error::ApplicationError;
use crate::id_generator::MessageIdGenerator;
use crate::registry::ConnectionRegistry;

/// 单个连接的会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 已连接，尚未加入
    Connected,
    /// 已注册为参与者
    Joined,
    /// 终态；未知连接也视为已关闭
    Closed,
}

/// 入站事件
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// 传输层打开了新连接
    Opened(ConnectionId),
    /// 客户端发来的意图
    Intent {
        connection_id: ConnectionId,
        intent: ClientIntent,
    },
    /// 传输层报告连接断开
    Disconnected(ConnectionId),
}

/// 出站事件的接收者集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipients {
    All,
    AllExcept(ConnectionId),
}

impl Recipients {
    pub fn includes(&self, connection_id: ConnectionId) -> bool {
        match self {
            Recipients::All => true,
            Recipients::AllExcept(excluded) => *excluded != connection_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub recipients: Recipients,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn to_all(event: impl Into<ServerEvent>) -> Self {
        Self {
            recipients: Recipients::All,
            event: event.into(),
        }
    }

    pub fn to_all_except(connection_id: ConnectionId, event: impl Into<ServerEvent>) -> Self {
        Self {
            recipients: Recipients::AllExcept(connection_id),
            event: event.into(),
        }
    }
}

pub struct SessionCoordinator {
    registry: ConnectionRegistry,
    sessions: HashMap<ConnectionId, SessionState>,
    ids: Arc<dyn MessageIdGenerator>,
}

impl SessionCoordinator {
    pub fn new(ids: Arc<dyn MessageIdGenerator>) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            sessions: HashMap::new(),
            ids,
        }
    }

    /// 处理一个入站事件，返回按发出顺序排列的出站事件
    ///
    /// 被拒绝的意图只记录日志，不会产生任何出站事件。
    pub fn handle(&mut self, event: InboundEvent) -> Vec<Outbound> {
        match event {
            InboundEvent::Opened(connection_id) => {
                self.open(connection_id);
                Vec::new()
            }
            InboundEvent::Intent {
                connection_id,
                intent,
            } => match self.apply_intent(connection_id, intent) {
                Ok(outbound) => outbound,
                Err(err) => {
                    tracing::debug!(connection_id = %connection_id, error = %err, "intent dropped");
                    Vec::new()
                }
            },
            InboundEvent::Disconnected(connection_id) => self.disconnect(connection_id),
        }
    }

    pub fn session_state(&self, connection_id: ConnectionId) -> SessionState {
        self.sessions
            .get(&connection_id)
            .copied()
            .unwrap_or(SessionState::Closed)
    }

    /// 只读访问注册表
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    fn open(&mut self, connection_id: ConnectionId) {
        if self.sessions.contains_key(&connection_id) {
            tracing::warn!(connection_id = %connection_id, "connection opened twice");
            return;
        }
        self.sessions.insert(connection_id, SessionState::Connected);
        tracing::info!(connection_id = %connection_id, "连接已打开");
    }

    fn apply_intent(
        &mut self,
        connection_id: ConnectionId,
        intent: ClientIntent,
    ) -> Result<Vec<Outbound>, ApplicationError> {
        match intent {
            ClientIntent::Join(payload) => self.join(connection_id, payload),
            ClientIntent::SendMessage(payload) => self.send_message(connection_id, payload),
        }
    }

    fn join(
        &mut self,
        connection_id: ConnectionId,
        payload: JoinPayload,
    ) -> Result<Vec<Outbound>, ApplicationError> {
        match self.session_state(connection_id) {
            SessionState::Connected => {}
            SessionState::Joined => return Err(ApplicationError::rejected("already joined")),
            SessionState::Closed => return Err(ApplicationError::rejected("connection closed")),
        }

        let name = DisplayName::parse(payload.name)?;
        let participant = self.registry.register(connection_id, name, payload.role)?;
        self.sessions.insert(connection_id, SessionState::Joined);

        tracing::info!(
            connection_id = %connection_id,
            name = %participant.name,
            role = %participant.role,
            "参与者已加入"
        );

        Ok(vec![
            Outbound::to_all_except(connection_id, PresenceEvent::joined(participant)),
            Outbound::to_all(self.roster()),
        ])
    }

    fn send_message(
        &mut self,
        connection_id: ConnectionId,
        payload: SendMessagePayload,
    ) -> Result<Vec<Outbound>, ApplicationError> {
        if self.session_state(connection_id) != SessionState::Joined {
            return Err(ApplicationError::rejected("not joined"));
        }
        let sender = self
            .registry
            .lookup(connection_id)
            .ok_or(ApplicationError::rejected("not joined"))?;
        let body = MessageBody::parse(payload.message)?;

        let message = ChatMessage::compose(self.ids.next_id(), sender, body, payload.timestamp);
        tracing::debug!(connection_id = %connection_id, message_id = %message.id, "message accepted");

        Ok(vec![Outbound::to_all(ServerEvent::ReceiveMessage(message))])
    }

    fn disconnect(&mut self, connection_id: ConnectionId) -> Vec<Outbound> {
        let Some(state) = self.sessions.remove(&connection_id) else {
            tracing::debug!(connection_id = %connection_id, "duplicate disconnect ignored");
            return Vec::new();
        };

        if state != SessionState::Joined {
            tracing::info!(connection_id = %connection_id, "未加入的连接已关闭");
            return Vec::new();
        }

        let Some(participant) = self.registry.unregister(connection_id) else {
            tracing::warn!(connection_id = %connection_id, "joined session without registry entry");
            return Vec::new();
        };

        tracing::info!(connection_id = %connection_id, name = %participant.name, "参与者已离开");

        vec![
            Outbound::to_all_except(connection_id, PresenceEvent::left(participant)),
            Outbound::to_all_except(connection_id, self.roster()),
        ]
    }

    fn roster(&self) -> ServerEvent {
        ServerEvent::ActiveUsers(self.registry.snapshot())
    }
}
