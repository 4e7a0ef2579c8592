//! 应用层实现。
//!
//! 这里提供在线状态协调的核心：连接注册表、会话协调器、广播分发器，
//! 以及把它们串成单一事件序列的 `ChatHub`。客户端侧的状态折叠见 `reconciler`。

pub mod broadcaster;
pub mod coordinator;
pub mod error;
pub mod hub;
pub mod id_generator;
pub mod local_broadcast;
pub mod reconciler;
pub mod registry;

pub use broadcaster::BroadcastDispatcher;
pub use coordinator::{InboundEvent, Outbound, Recipients, SessionCoordinator, SessionState};
pub use error::ApplicationError;
pub use hub::{ChatHub, HubHandle};
pub use id_generator::{MessageIdGenerator, UuidMessageIdGenerator};
pub use local_broadcast::{event_channel, EventSender, EventStream};
pub use reconciler::{ClientView, LogEntry, SystemNotice};
pub use registry::ConnectionRegistry;
