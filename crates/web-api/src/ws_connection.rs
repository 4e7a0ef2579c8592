use application::{EventStream, HubHandle};
use axum::extract::ws::{Message as WsMessage, WebSocket};
use domain::{ClientIntent, ConnectionId};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::error::ApiError;

/// WebSocket 连接管理器
///
/// 封装单个 WebSocket 连接的所有状态和逻辑，包括：
/// - 把客户端文本帧解析为意图并提交给中枢
/// - 把中枢分发的事件写回客户端
/// - Ping/Pong 心跳
/// - 断开时通知中枢
pub struct WebSocketConnection {
    socket: WebSocket,
    hub: HubHandle,
    connection_id: ConnectionId,
    events: EventStream,
}

impl WebSocketConnection {
    /// 在中枢登记新连接并取得它的事件流
    pub async fn new(socket: WebSocket, hub: HubHandle) -> Result<Self, ApiError> {
        let (connection_id, events) = hub.connect().await.map_err(|err| {
            tracing::error!(error = %err, "Failed to register connection");
            ApiError::from(err)
        })?;

        tracing::info!(connection_id = %connection_id, "WebSocket 连接已建立");

        Ok(Self {
            socket,
            hub,
            connection_id,
            events,
        })
    }

    /// 运行 WebSocket 连接的主循环
    ///
    /// 读写各一个任务，任意一个结束即视为连接断开。
    pub async fn run(self) {
        let Self {
            socket,
            hub,
            connection_id,
            mut events,
        } = self;
        let (mut sender, mut incoming) = socket.split();

        // 创建 mpsc channel 来解耦对 sender 的访问
        let (cmd_tx, mut cmd_rx) = mpsc::channel::<WsCommand>(32);

        // 发送任务：统一处理所有对 WebSocket sender 的写操作
        let mut send_task = tokio::spawn(async move {
            loop {
                let frame = tokio::select! {
                    Some(cmd) = cmd_rx.recv() => match cmd {
                        WsCommand::SendPong(data) => WsMessage::Pong(data.into()),
                    },
                    Some(event) = events.recv() => match event.to_frame() {
                        Ok(json) => WsMessage::Text(json.into()),
                        Err(err) => {
                            tracing::warn!(error = %err, "failed to serialize websocket payload");
                            continue;
                        }
                    },
                    else => break,
                };
                if sender.send(frame).await.is_err() {
                    tracing::warn!(connection_id = %connection_id, "Failed to write websocket frame");
                    break;
                }
            }
            tracing::debug!(connection_id = %connection_id, "WebSocket发送任务结束");
        });

        // 接收任务：处理来自WebSocket客户端的消息
        let recv_hub = hub.clone();
        let mut recv_task = tokio::spawn(async move {
            while let Some(Ok(message)) = incoming.next().await {
                if Self::handle_incoming(message, connection_id, &recv_hub, &cmd_tx)
                    .await
                    .is_err()
                {
                    break;
                }
            }
            tracing::debug!(connection_id = %connection_id, "WebSocket接收任务结束");
        });

        // 等待任意一个任务完成（连接断开）
        tokio::select! {
            _ = &mut send_task => recv_task.abort(),
            _ = &mut recv_task => send_task.abort(),
        }

        if let Err(err) = hub.disconnect(connection_id).await {
            tracing::error!(error = %err, connection_id = %connection_id, "Failed to report disconnect");
        }

        tracing::info!(connection_id = %connection_id, "WebSocket连接已断开");
    }

    /// 处理来自客户端的消息
    async fn handle_incoming(
        message: WsMessage,
        connection_id: ConnectionId,
        hub: &HubHandle,
        cmd_tx: &mpsc::Sender<WsCommand>,
    ) -> Result<(), ()> {
        match message {
            WsMessage::Close(_) => {
                tracing::info!(connection_id = %connection_id, "WebSocket收到关闭消息");
                return Err(());
            }
            WsMessage::Ping(data) => {
                tracing::debug!("收到ping消息，发送pong回应");
                if cmd_tx
                    .send(WsCommand::SendPong(data.to_vec()))
                    .await
                    .is_err()
                {
                    tracing::warn!("Failed to send pong command");
                    return Err(());
                }
            }
            WsMessage::Pong(_) => {
                tracing::debug!("收到pong消息");
            }
            WsMessage::Text(text) => match ClientIntent::from_frame(text.as_str()) {
                Ok(intent) => {
                    if let Err(err) = hub.submit(connection_id, intent).await {
                        tracing::warn!(error = %err, connection_id = %connection_id, "Failed to submit intent");
                        return Err(());
                    }
                }
                Err(err) => {
                    tracing::debug!(error = %err, connection_id = %connection_id, "ignoring undecodable frame");
                }
            },
            WsMessage::Binary(_) => {
                tracing::debug!(connection_id = %connection_id, "ignoring binary frame");
            }
        }
        Ok(())
    }
}

/// WebSocket 写操作命令
#[derive(Debug)]
enum WsCommand {
    SendPong(Vec<u8>),
}
