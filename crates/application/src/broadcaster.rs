//! 广播分发器
//!
//! 把协调器产生的出站事件投递给当前打开的连接。投递只是把事件放入
//! 各连接的无界队列，由连接自己的写任务发送，慢连接不会拖住其他连接。
//! 对同一个接收者，事件顺序与 `dispatch` 的调用顺序一致。

use std::collections::HashMap;

use domain::ConnectionId;

use crate::coordinator::Outbound;
use crate::local_broadcast::EventSender;

#[derive(Default)]
pub struct BroadcastDispatcher {
    connections: HashMap<ConnectionId, EventSender>,
}

impl BroadcastDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个打开的连接
    pub fn attach(&mut self, connection_id: ConnectionId, sender: EventSender) {
        if self.connections.insert(connection_id, sender).is_some() {
            tracing::warn!(connection_id = %connection_id, "replaced existing connection sink");
        }
    }

    /// 移除连接，之后的事件不再投递给它
    pub fn detach(&mut self, connection_id: ConnectionId) -> bool {
        self.connections.remove(&connection_id).is_some()
    }

    /// 投递一个出站事件，返回成功入队的接收者数量
    pub fn dispatch(&self, outbound: &Outbound) -> usize {
        let mut delivered = 0;
        for (connection_id, sender) in &self.connections {
            if !outbound.recipients.includes(*connection_id) {
                continue;
            }
            if sender.send(outbound.event.clone()).is_err() {
                tracing::debug!(
                    connection_id = %connection_id,
                    event = outbound.event.name(),
                    "recipient queue closed, event skipped"
                );
                continue;
            }
            delivered += 1;
        }
        tracing::trace!(event = outbound.event.name(), delivered, "event dispatched");
        delivered
    }

    pub fn open_connections(&self) -> usize {
        self.connections.len()
    }
}
