#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use application::{ChatHub, UuidMessageIdGenerator};
use config::AppConfig;
use domain::ServerEvent;
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpListener, net::TcpStream, sync::oneshot, time::timeout};
use tokio_tungstenite::{
    connect_async, tungstenite::Message as TungsteniteMessage, MaybeTlsStream, WebSocketStream,
};
use web_api::{router, AppState};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn connect(&self) -> WsClient {
        let (ws, _) = connect_async(format!("ws://{}/ws", self.addr))
            .await
            .expect("ws connect");
        ws
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// 在随机端口上启动完整的路由和中枢
pub async fn spawn_server() -> TestServer {
    let config = AppConfig::default();
    let (hub, _hub_task) = ChatHub::spawn(&config.hub, Arc::new(UuidMessageIdGenerator));
    let router = router(AppState::new(hub, config.server));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .ok();
    });

    TestServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    }
}

pub async fn send_json(ws: &mut WsClient, value: serde_json::Value) {
    ws.send(TungsteniteMessage::Text(value.to_string().into()))
        .await
        .expect("ws send");
}

/// 读取下一个服务端事件，跳过控制帧
pub async fn next_event(ws: &mut WsClient) -> ServerEvent {
    loop {
        let frame = timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("event in time")
            .expect("stream open")
            .expect("ws frame");
        if let TungsteniteMessage::Text(text) = frame {
            return ServerEvent::from_frame(text.as_str()).expect("server event");
        }
    }
}

/// 断言在给定时间内没有收到任何事件
pub async fn expect_silence(ws: &mut WsClient, wait: Duration) {
    if let Ok(Some(Ok(TungsteniteMessage::Text(text)))) = timeout(wait, ws.next()).await {
        panic!("unexpected event: {}", text.as_str());
    }
}

pub fn roster_names(event: &ServerEvent) -> Vec<String> {
    match event {
        ServerEvent::ActiveUsers(users) => users.iter().map(|u| u.name.to_string()).collect(),
        other => panic!("expected active-users, got {other:?}"),
    }
}
