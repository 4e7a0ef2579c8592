//! 聊天室在线状态核心领域模型
//!
//! 包含参与者、聊天消息、在线状态事件，以及客户端与服务端之间的线路协议。

pub mod entities;
pub mod errors;
pub mod events;
pub mod value_objects;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
pub use events::*;
pub use value_objects::*;
