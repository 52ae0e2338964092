// safeshield-backend/src/domain/actor.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// SafeShieldのユーザーロール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Admin,
    Analyst,
    Observer,
}

impl ActorRole {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "analyst" => Some(Self::Analyst),
            "observer" => Some(Self::Observer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Analyst => "analyst",
            Self::Observer => "observer",
        }
    }

    /// 管理者かチェック
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// インシデント対応の状態を変更できるロールかチェック
    ///
    /// Observerは閲覧のみ。変更系の操作はAdmin/Analystに限る。
    pub fn can_manage_response(&self) -> bool {
        matches!(self, Self::Admin | Self::Analyst)
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("Invalid role: '{}'", s))
    }
}

/// 操作主体のコンテキスト
///
/// 認証は上流のIDプロバイダに委譲しており、本体は検証済みの
/// id/name/roleだけを受け取る。全操作に明示的に引き渡し、
/// グローバルな「現在のユーザー」状態は持たない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: Uuid, name: impl Into<String>, role: ActorRole) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!(ActorRole::from_str("admin"), Some(ActorRole::Admin));
        assert_eq!(ActorRole::from_str("Analyst"), Some(ActorRole::Analyst));
        assert_eq!(ActorRole::from_str("OBSERVER"), Some(ActorRole::Observer));
        assert_eq!(ActorRole::from_str("root"), None);
    }

    #[test]
    fn test_can_manage_response() {
        assert!(ActorRole::Admin.can_manage_response());
        assert!(ActorRole::Analyst.can_manage_response());
        assert!(!ActorRole::Observer.can_manage_response());
    }

    #[test]
    fn test_is_admin() {
        assert!(ActorRole::Admin.is_admin());
        assert!(!ActorRole::Analyst.is_admin());
    }
}
