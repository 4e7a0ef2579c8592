//! 客户端状态折叠
//!
//! 每个客户端把收到的事件流折叠成本地视图：消息日志加最新名单。
//! `ClientView::apply` 是纯函数，不依赖任何渲染或 I/O。

use domain::{
    ChatMessage, ClientIntent, Participant, ParticipantRole, PresenceKind, PresenceNotice,
    ServerEvent,
};

/// 本地合成的系统提示，不会被重新广播
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemNotice {
    pub kind: PresenceKind,
    pub text: String,
}

/// 消息日志中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Chat(ChatMessage),
    Notice(SystemNotice),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientView {
    log: Vec<LogEntry>,
    roster: Vec<Participant>,
}

impl ClientView {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按到达顺序应用一个事件，不做去重
    pub fn apply(mut self, event: ServerEvent) -> Self {
        match event {
            ServerEvent::ReceiveMessage(message) => self.log.push(LogEntry::Chat(message)),
            ServerEvent::ActiveUsers(users) => self.roster = users,
            ServerEvent::UserJoined(notice) => self.push_notice(PresenceKind::Joined, notice),
            ServerEvent::UserLeft(notice) => self.push_notice(PresenceKind::Left, notice),
        }
        self
    }

    /// 依次应用一串事件
    pub fn replay(self, events: impl IntoIterator<Item = ServerEvent>) -> Self {
        events.into_iter().fold(self, ClientView::apply)
    }

    fn push_notice(&mut self, kind: PresenceKind, notice: PresenceNotice) {
        self.log.push(LogEntry::Notice(SystemNotice {
            kind,
            text: notice.message,
        }));
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// 只包含聊天消息
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.log.iter().filter_map(|entry| match entry {
            LogEntry::Chat(message) => Some(message),
            LogEntry::Notice(_) => None,
        })
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub fn online_count(&self) -> usize {
        self.roster.len()
    }

    /// 加入意图
    pub fn request_join(name: impl Into<String>, role: ParticipantRole) -> ClientIntent {
        ClientIntent::join(name, role)
    }

    /// 发送意图；正文为空白时不产生意图。未加入时发出的消息由协调器丢弃。
    pub fn send_message(body: &str, timestamp: impl Into<String>) -> Option<ClientIntent> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }
        Some(ClientIntent::send_message(body, timestamp))
    }
}
