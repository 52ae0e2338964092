// safeshield-backend/src/domain/step_kind.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// インシデント対応ライフサイクルの5つの固定フェーズ
///
/// 順序は正規の並びそのもので、追加・削除・並べ替えは行わない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Detect,
    Contain,
    Eradicate,
    Recover,
    Communicate,
}

/// 1トラッカーあたりのステップ数（固定）
pub const STEP_COUNT: usize = 5;

impl StepKind {
    /// 正規の順序ですべてのステップ種別を取得
    pub fn all() -> [Self; STEP_COUNT] {
        [
            Self::Detect,
            Self::Contain,
            Self::Eradicate,
            Self::Recover,
            Self::Communicate,
        ]
    }

    /// 文字列からStepKindに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "detect" => Some(Self::Detect),
            "contain" => Some(Self::Contain),
            "eradicate" => Some(Self::Eradicate),
            "recover" => Some(Self::Recover),
            "communicate" => Some(Self::Communicate),
            _ => None,
        }
    }

    /// StepKindを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detect => "detect",
            Self::Contain => "contain",
            Self::Eradicate => "eradicate",
            Self::Recover => "recover",
            Self::Communicate => "communicate",
        }
    }

    /// ステップの表示名を取得
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Detect => "Detect",
            Self::Contain => "Contain",
            Self::Eradicate => "Eradicate",
            Self::Recover => "Recover",
            Self::Communicate => "Communicate",
        }
    }

    /// ステップの説明文（テンプレート固定、ストレージからはロードしない）
    pub fn description(&self) -> &'static str {
        match self {
            Self::Detect => "Identify and confirm the security incident",
            Self::Contain => "Limit the scope and impact of the incident",
            Self::Eradicate => "Remove the threat from affected systems",
            Self::Recover => "Restore systems and services to normal operation",
            Self::Communicate => "Notify stakeholders and document lessons learned",
        }
    }

    /// ステップの実施ガイダンス（テンプレート固定）
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Detect => {
                "Review alerts and telemetry, confirm the incident is genuine, \
                 establish the initial timeline, and record how the incident was detected."
            }
            Self::Contain => {
                "Isolate affected hosts and accounts, block malicious indicators, \
                 and preserve volatile evidence before it is lost."
            }
            Self::Eradicate => {
                "Remove malware and unauthorized access, patch exploited \
                 vulnerabilities, and verify no persistence mechanisms remain."
            }
            Self::Recover => {
                "Restore from known-good backups, re-enable services gradually, \
                 and monitor for signs of reinfection."
            }
            Self::Communicate => {
                "Brief stakeholders, fulfil notification obligations, and capture \
                 lessons learned in the post-incident review."
            }
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Invalid response step: '{}'. Valid steps are: {}",
                s,
                Self::all()
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

// データベースとの変換用
impl From<StepKind> for String {
    fn from(kind: StepKind) -> Self {
        kind.as_str().to_string()
    }
}

impl TryFrom<String> for StepKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for StepKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let all = StepKind::all();
        assert_eq!(all.len(), STEP_COUNT);
        assert_eq!(
            all,
            [
                StepKind::Detect,
                StepKind::Contain,
                StepKind::Eradicate,
                StepKind::Recover,
                StepKind::Communicate,
            ]
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(StepKind::from_str("detect"), Some(StepKind::Detect));
        assert_eq!(StepKind::from_str("DETECT"), Some(StepKind::Detect));
        assert_eq!(StepKind::from_str("contain"), Some(StepKind::Contain));
        assert_eq!(StepKind::from_str("eradicate"), Some(StepKind::Eradicate));
        assert_eq!(StepKind::from_str("recover"), Some(StepKind::Recover));
        assert_eq!(
            StepKind::from_str("communicate"),
            Some(StepKind::Communicate)
        );
        assert_eq!(StepKind::from_str("triage"), None);
    }

    #[test]
    fn test_round_trip() {
        for kind in StepKind::all() {
            assert_eq!(kind.as_str().parse::<StepKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_templates_present() {
        for kind in StepKind::all() {
            assert!(!kind.display_name().is_empty());
            assert!(!kind.description().is_empty());
            assert!(!kind.guidance().is_empty());
        }
    }

    #[test]
    fn test_serde() {
        let serialized = serde_json::to_string(&StepKind::Eradicate).unwrap();
        assert_eq!(serialized, r#""eradicate""#);

        let deserialized: StepKind = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, StepKind::Eradicate);
    }
}
