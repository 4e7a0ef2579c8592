//! 参与者实体
//!
//! 一个完成了 join 的连接，带有自选的显示名称和角色。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::{ConnectionId, DisplayName};

/// 参与者角色
///
/// 线路上分别表示为 `"client"` 和 `"artist"`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantRole {
    /// 需求方
    #[serde(rename = "client")]
    Requester,
    /// 提供方
    #[serde(rename = "artist")]
    Provider,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Requester => "client",
            ParticipantRole::Provider => "artist",
        }
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ConnectionId,
    pub name: DisplayName,
    pub role: ParticipantRole,
}

impl Participant {
    pub fn new(id: ConnectionId, name: DisplayName, role: ParticipantRole) -> Self {
        Self { id, name, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_participant_wire_shape() {
        let id = ConnectionId::new(Uuid::nil());
        let participant = Participant::new(
            id,
            DisplayName::parse("Ann").unwrap(),
            ParticipantRole::Requester,
        );

        let value = serde_json::to_value(&participant).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "name": "Ann",
                "role": "client"
            })
        );
    }

    #[test]
    fn test_role_names() {
        assert_eq!(ParticipantRole::Provider.to_string(), "artist");
        let role: ParticipantRole = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(role, ParticipantRole::Requester);
        assert!(serde_json::from_str::<ParticipantRole>("\"admin\"").is_err());
    }
}
