//! 主应用程序入口
//!
//! 启动聊天中枢和 Axum Web 服务。

use std::{sync::Arc, time::Duration};

use application::{ChatHub, UuidMessageIdGenerator};
use config::{AppConfig, LoggingConfig};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // 初始化日志
    init_tracing(&config.logging);

    // 中枢在后台独占在线状态，所有连接通过句柄提交事件
    let (hub, hub_task) = ChatHub::spawn(&config.hub, Arc::new(UuidMessageIdGenerator));

    let state = AppState::new(hub, config.server.clone());
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;

    tracing::info!("聊天服务器启动在 http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 句柄全部释放后中枢退出；仍有连接未关闭时不再等待
    match tokio::time::timeout(Duration::from_secs(5), hub_task).await {
        Ok(Ok(())) => tracing::info!("服务器已停止"),
        Ok(Err(err)) => tracing::error!(error = %err, "chat hub task failed"),
        Err(_) => tracing::warn!("chat hub still has open connections, exiting anyway"),
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("收到关闭信号");
}
