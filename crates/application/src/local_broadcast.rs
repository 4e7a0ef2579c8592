// 每个连接一条本地事件通道
use domain::ServerEvent;
use tokio::sync::mpsc;

/// 分发器持有的发送端；无界队列，入队永不阻塞
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// 创建一条连接专属的事件通道
pub fn event_channel() -> (EventSender, EventStream) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (sender, EventStream::new(receiver))
}

// 连接写任务消费的事件流
pub struct EventStream {
    receiver: mpsc::UnboundedReceiver<ServerEvent>,
}

impl EventStream {
    pub fn new(receiver: mpsc::UnboundedReceiver<ServerEvent>) -> Self {
        Self { receiver }
    }

    /// 等待下一个事件；分发器移除该连接后返回 `None`
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        self.receiver.recv().await
    }

    /// 非阻塞地取出一个已到达的事件
    pub fn try_recv(&mut self) -> Option<ServerEvent> {
        self.receiver.try_recv().ok()
    }
}
