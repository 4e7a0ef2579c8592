//! Web API 层。
//!
//! 提供 Axum 路由：健康检查和 WebSocket 传输，把连接事件委托给应用层的 `ChatHub`。

mod error;
mod routes;
mod state;
mod ws_connection;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
