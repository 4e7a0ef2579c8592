//! 聊天中枢
//!
//! 单个 tokio 任务独占协调器和分发器，按到达顺序逐条处理命令：
//! 一个事件的注册表变更与全部出站事件入队完成之后，才会开始下一个事件。
//! 因此注册表不需要任何锁。

use std::sync::Arc;

use config::HubConfig;
use domain::{ClientIntent, ConnectionId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::broadcaster::BroadcastDispatcher;
use crate::coordinator::{InboundEvent, SessionCoordinator};
use crate::error::ApplicationError;
use crate::id_generator::MessageIdGenerator;
use crate::local_broadcast::{event_channel, EventSender, EventStream};

/// 传输层提交给中枢的命令
#[derive(Debug)]
enum HubCommand {
    Open {
        connection_id: ConnectionId,
        sender: EventSender,
    },
    Intent {
        connection_id: ConnectionId,
        intent: ClientIntent,
    },
    Disconnect {
        connection_id: ConnectionId,
    },
}

pub struct ChatHub {
    coordinator: SessionCoordinator,
    dispatcher: BroadcastDispatcher,
    commands: mpsc::Receiver<HubCommand>,
}

impl ChatHub {
    pub fn new(config: &HubConfig, ids: Arc<dyn MessageIdGenerator>) -> (Self, HubHandle) {
        let (tx, rx) = mpsc::channel(config.command_capacity);
        let hub = Self {
            coordinator: SessionCoordinator::new(ids),
            dispatcher: BroadcastDispatcher::new(),
            commands: rx,
        };
        (hub, HubHandle { commands: tx })
    }

    /// 创建并在后台运行中枢
    pub fn spawn(config: &HubConfig, ids: Arc<dyn MessageIdGenerator>) -> (HubHandle, JoinHandle<()>) {
        let (hub, handle) = Self::new(config, ids);
        let task = tokio::spawn(hub.run());
        (handle, task)
    }

    /// 事件循环；所有 `HubHandle` 被丢弃后结束
    pub async fn run(mut self) {
        tracing::info!("chat hub started");
        while let Some(command) = self.commands.recv().await {
            self.process(command);
        }
        tracing::info!(
            open_connections = self.dispatcher.open_connections(),
            "chat hub stopped"
        );
    }

    fn process(&mut self, command: HubCommand) {
        let event = match command {
            HubCommand::Open {
                connection_id,
                sender,
            } => {
                self.dispatcher.attach(connection_id, sender);
                InboundEvent::Opened(connection_id)
            }
            HubCommand::Intent {
                connection_id,
                intent,
            } => InboundEvent::Intent {
                connection_id,
                intent,
            },
            HubCommand::Disconnect { connection_id } => {
                self.dispatcher.detach(connection_id);
                InboundEvent::Disconnected(connection_id)
            }
        };

        for outbound in self.coordinator.handle(event) {
            self.dispatcher.dispatch(&outbound);
        }
    }
}

/// 提交命令的句柄，可在各连接任务间克隆
#[derive(Clone, Debug)]
pub struct HubHandle {
    commands: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// 打开一个新连接，返回它的标识和事件流
    pub async fn connect(&self) -> Result<(ConnectionId, EventStream), ApplicationError> {
        let connection_id = ConnectionId::generate();
        let (sender, stream) = event_channel();
        self.send(HubCommand::Open {
            connection_id,
            sender,
        })
        .await?;
        Ok((connection_id, stream))
    }

    pub async fn submit(
        &self,
        connection_id: ConnectionId,
        intent: ClientIntent,
    ) -> Result<(), ApplicationError> {
        self.send(HubCommand::Intent {
            connection_id,
            intent,
        })
        .await
    }

    /// 报告连接断开；重复调用是安全的
    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<(), ApplicationError> {
        self.send(HubCommand::Disconnect { connection_id }).await
    }

    /// 中枢任务是否已经停止
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn send(&self, command: HubCommand) -> Result<(), ApplicationError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ApplicationError::HubUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_generator::UuidMessageIdGenerator;
    use domain::{ParticipantRole, ServerEvent};
    use std::time::Duration;
    use tokio::time::timeout;

    fn spawn_hub() -> (HubHandle, JoinHandle<()>) {
        ChatHub::spawn(&HubConfig::default(), Arc::new(UuidMessageIdGenerator))
    }

    async fn next(stream: &mut EventStream) -> ServerEvent {
        timeout(Duration::from_secs(1), stream.recv())
            .await
            .expect("event in time")
            .expect("stream open")
    }

    fn names(event: &ServerEvent) -> Vec<String> {
        match event {
            ServerEvent::ActiveUsers(users) => users.iter().map(|u| u.name.to_string()).collect(),
            other => panic!("expected active-users, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let (hub, _task) = spawn_hub();

        let (a, mut a_events) = hub.connect().await.unwrap();
        hub.submit(a, ClientIntent::join("Ann", ParticipantRole::Requester))
            .await
            .unwrap();
        assert_eq!(names(&next(&mut a_events).await), vec!["Ann"]);

        let (b, mut b_events) = hub.connect().await.unwrap();
        hub.submit(b, ClientIntent::join("Bo", ParticipantRole::Provider))
            .await
            .unwrap();

        match next(&mut a_events).await {
            ServerEvent::UserJoined(notice) => assert_eq!(notice.user.name.as_str(), "Bo"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(names(&next(&mut a_events).await), vec!["Ann", "Bo"]);
        assert_eq!(names(&next(&mut b_events).await), vec!["Ann", "Bo"]);

        hub.submit(a, ClientIntent::send_message("hi", "2024-01-01T00:00:00Z"))
            .await
            .unwrap();
        for events in [&mut a_events, &mut b_events] {
            match next(events).await {
                ServerEvent::ReceiveMessage(message) => {
                    assert_eq!(message.sender_name.as_str(), "Ann");
                    assert_eq!(message.body.as_str(), "hi");
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }

        hub.disconnect(b).await.unwrap();
        hub.disconnect(b).await.unwrap();
        match next(&mut a_events).await {
            ServerEvent::UserLeft(notice) => assert_eq!(notice.user.id, b),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(names(&next(&mut a_events).await), vec!["Ann"]);

        // 断开的连接的事件流已关闭，且没有收到重复的离开通知
        assert!(b_events.recv().await.is_none());
        hub.submit(a, ClientIntent::send_message("still here", "t"))
            .await
            .unwrap();
        assert!(matches!(next(&mut a_events).await, ServerEvent::ReceiveMessage(_)));
    }

    #[tokio::test]
    async fn test_unjoined_connections_still_receive_broadcasts() {
        let (hub, _task) = spawn_hub();
        let (_watcher, mut watcher_events) = hub.connect().await.unwrap();
        let (ann, _ann_events) = hub.connect().await.unwrap();

        hub.submit(ann, ClientIntent::join("Ann", ParticipantRole::Requester))
            .await
            .unwrap();

        assert!(matches!(next(&mut watcher_events).await, ServerEvent::UserJoined(_)));
        assert_eq!(names(&next(&mut watcher_events).await), vec!["Ann"]);
    }

    #[tokio::test]
    async fn test_hub_stops_when_handles_dropped() {
        let (hub, task) = spawn_hub();
        drop(hub);
        timeout(Duration::from_secs(1), task)
            .await
            .expect("hub stopped in time")
            .expect("hub task");
    }

    #[tokio::test]
    async fn test_handle_reports_stopped_hub() {
        let (hub, task) = spawn_hub();
        task.abort();
        let _ = task.await;

        assert!(hub.is_closed());
        assert!(matches!(
            hub.connect().await,
            Err(ApplicationError::HubUnavailable)
        ));
    }
}
