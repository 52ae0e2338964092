// safeshield-backend/src/domain/step_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 対応ステップの状態を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
}

impl StepStatus {
    /// 文字列からStepStatusに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// StepStatusを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// すべての有効なステータスを取得
    pub fn all() -> Vec<Self> {
        vec![Self::Pending, Self::InProgress, Self::Completed]
    }

    /// ステータスが完了状態かチェック
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// ステータスが未着手かチェック
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// 完了状態からの巻き戻し（再オープン）かチェック
    ///
    /// ステップの遷移は呼び出し側主導で、巻き戻しも許可される。
    /// 巻き戻しはアクティビティログ上で区別して記録する。
    pub fn is_reopened_from(&self, previous: Self) -> bool {
        previous == Self::Completed && !self.is_completed()
    }

    /// ステータスの表示名を取得
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl Default for StepStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Invalid step status: '{}'. Valid statuses are: {}",
                s,
                Self::all()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

// データベースとの変換用
impl From<StepStatus> for String {
    fn from(status: StepStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<String> for StepStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for StepStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(StepStatus::from_str("pending"), Some(StepStatus::Pending));
        assert_eq!(StepStatus::from_str("PENDING"), Some(StepStatus::Pending));
        assert_eq!(
            StepStatus::from_str("in_progress"),
            Some(StepStatus::InProgress)
        );
        assert_eq!(
            StepStatus::from_str("completed"),
            Some(StepStatus::Completed)
        );
        assert_eq!(StepStatus::from_str("invalid"), None);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(StepStatus::Pending.to_string(), "pending");
        assert_eq!(StepStatus::InProgress.to_string(), "in_progress");
        assert_eq!(StepStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn test_status_checks() {
        assert!(StepStatus::Completed.is_completed());
        assert!(!StepStatus::Pending.is_completed());

        assert!(StepStatus::Pending.is_pending());
        assert!(!StepStatus::InProgress.is_pending());
    }

    #[test]
    fn test_reopened_from() {
        assert!(StepStatus::Pending.is_reopened_from(StepStatus::Completed));
        assert!(StepStatus::InProgress.is_reopened_from(StepStatus::Completed));
        assert!(!StepStatus::Completed.is_reopened_from(StepStatus::Completed));
        assert!(!StepStatus::InProgress.is_reopened_from(StepStatus::Pending));
    }

    #[test]
    fn test_default() {
        assert_eq!(StepStatus::default(), StepStatus::Pending);
    }

    #[test]
    fn test_serde() {
        let status = StepStatus::InProgress;
        let serialized = serde_json::to_string(&status).unwrap();
        assert_eq!(serialized, r#""in_progress""#);

        let deserialized: StepStatus = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, StepStatus::InProgress);
    }

    #[test]
    fn test_conversions() {
        let status = StepStatus::InProgress;
        let as_string: String = status.into();
        assert_eq!(as_string, "in_progress");

        let back_to_status: StepStatus = as_string.try_into().unwrap();
        assert_eq!(back_to_status, StepStatus::InProgress);
    }
}
