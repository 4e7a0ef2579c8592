//! 领域事件定义
//!
//! 在线状态变化（加入/离开）事件，与名单快照相互独立。

pub mod presence_event;

// 重新导出事件类型
pub use presence_event::*;
