//! 连接注册表
//!
//! 内存中的 connectionId -> Participant 映射。没有内部同步，
//! 只能由协调器在单一事件序列中访问。

use std::collections::HashMap;

use domain::{ConnectionId, DisplayName, DomainError, DomainResult, Participant, ParticipantRole};

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: HashMap<ConnectionId, Entry>,
    next_seq: u64,
}

#[derive(Debug)]
struct Entry {
    joined_seq: u64,
    participant: Participant,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册参与者；同一连接重复注册返回错误，原有记录保持不变
    pub fn register(
        &mut self,
        connection_id: ConnectionId,
        name: DisplayName,
        role: ParticipantRole,
    ) -> DomainResult<Participant> {
        if self.entries.contains_key(&connection_id) {
            return Err(DomainError::already_registered(connection_id));
        }

        let participant = Participant::new(connection_id, name, role);
        self.entries.insert(
            connection_id,
            Entry {
                joined_seq: self.next_seq,
                participant: participant.clone(),
            },
        );
        self.next_seq += 1;
        Ok(participant)
    }

    /// 移除参与者，幂等
    pub fn unregister(&mut self, connection_id: ConnectionId) -> Option<Participant> {
        self.entries
            .remove(&connection_id)
            .map(|entry| entry.participant)
    }

    pub fn lookup(&self, connection_id: ConnectionId) -> Option<&Participant> {
        self.entries
            .get(&connection_id)
            .map(|entry| &entry.participant)
    }

    /// 按加入顺序排列的完整名单
    pub fn snapshot(&self) -> Vec<Participant> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by_key(|entry| entry.joined_seq);
        entries
            .into_iter()
            .map(|entry| entry.participant.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &str) -> DisplayName {
        DisplayName::parse(value).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionId::generate();

        let participant = registry
            .register(id, name("Ann"), ParticipantRole::Requester)
            .unwrap();

        assert_eq!(registry.lookup(id), Some(&participant));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_register_is_rejected() {
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionId::generate();
        registry
            .register(id, name("Ann"), ParticipantRole::Requester)
            .unwrap();

        let err = registry
            .register(id, name("Annie"), ParticipantRole::Provider)
            .unwrap_err();

        assert_eq!(err, DomainError::already_registered(id));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup(id).unwrap().name.as_str(), "Ann");
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut registry = ConnectionRegistry::new();
        let id = ConnectionId::generate();
        registry
            .register(id, name("Ann"), ParticipantRole::Requester)
            .unwrap();

        assert!(registry.unregister(id).is_some());
        assert!(registry.unregister(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_keeps_join_order() {
        let mut registry = ConnectionRegistry::new();
        let ids: Vec<_> = (0..5).map(|_| ConnectionId::generate()).collect();
        for (i, id) in ids.iter().enumerate() {
            registry
                .register(*id, name(&format!("user{i}")), ParticipantRole::Provider)
                .unwrap();
        }
        registry.unregister(ids[1]);

        let names: Vec<_> = registry
            .snapshot()
            .into_iter()
            .map(|p| p.name.to_string())
            .collect();
        assert_eq!(names, vec!["user0", "user2", "user3", "user4"]);
    }

    #[test]
    fn test_same_display_name_is_allowed() {
        let mut registry = ConnectionRegistry::new();
        registry
            .register(ConnectionId::generate(), name("Ann"), ParticipantRole::Requester)
            .unwrap();
        registry
            .register(ConnectionId::generate(), name("Ann"), ParticipantRole::Requester)
            .unwrap();
        assert_eq!(registry.len(), 2);
    }
}
