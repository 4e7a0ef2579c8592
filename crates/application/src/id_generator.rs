use domain::MessageId;
use uuid::Uuid;

/// 消息标识生成器
///
/// 生成的标识在并发快速发送时也不能冲突。
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait MessageIdGenerator: Send + Sync {
    fn next_id(&self) -> MessageId;
}

#[derive(Debug, Default)]
pub struct UuidMessageIdGenerator;

impl MessageIdGenerator for UuidMessageIdGenerator {
    fn next_id(&self) -> MessageId {
        MessageId::new(Uuid::new_v4())
    }
}
