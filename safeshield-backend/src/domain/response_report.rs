// safeshield-backend/src/domain/response_report.rs

//! 対応トラッカーの読み取り専用サマリ／レポート生成
//!
//! トラッカーの状態を一切変更しない純粋な集計。エクスポートされた
//! レポートを下流ツールがパースできるよう、フィールド名と入れ子構造は
//! 安定している（構造体の宣言順でシリアライズされる）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::response_step::{ResponseAction, ResponseLog, ResponseStep};
use super::response_tracker::ResponseTracker;
use super::step_kind::StepKind;
use super::step_status::StepStatus;

/// 完了ステップが1つもないときのduration表示
pub const DURATION_NOT_AVAILABLE: &str = "N/A";

/// エクスポート可能なインシデント対応レポート
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseReport {
    pub incident_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub steps: Vec<ReportStep>,
}

/// レポートのサマリカウンタ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// 最初の完了から最後の完了までの幅（"<hours>h <minutes>m"）。
    /// 真のインシデント経過時間ではなく、完了タイムスタンプの
    /// min/maxの差であることに注意。
    pub total_duration: String,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub completed_actions: usize,
    pub total_actions: usize,
    pub evidence_files: usize,
}

/// ステップごとの内訳
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStep {
    pub id: StepKind,
    pub name: String,
    pub status: StepStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: String,
    pub actions: Vec<ResponseAction>,
    pub evidence_files: Vec<String>,
    pub logs: Vec<ResponseLog>,
}

impl From<&ResponseStep> for ReportStep {
    fn from(step: &ResponseStep) -> Self {
        Self {
            id: step.kind,
            name: step.name().to_string(),
            status: step.status,
            completed_at: step.completed_at,
            notes: step.notes.clone(),
            actions: step.actions.clone(),
            evidence_files: step.evidence.iter().map(|e| e.filename.clone()).collect(),
            logs: step.logs.clone(),
        }
    }
}

impl ResponseReport {
    /// トラッカーの現在状態からレポートを組み立てる
    pub fn generate(tracker: &ResponseTracker) -> Self {
        Self {
            incident_id: tracker.incident_id,
            generated_at: Utc::now(),
            summary: ReportSummary {
                total_duration: calculate_total_duration(tracker),
                completed_steps: tracker.completed_step_count(),
                total_steps: tracker.steps().len(),
                completed_actions: tracker.completed_action_count(),
                total_actions: tracker.total_action_count(),
                evidence_files: tracker.total_evidence_count(),
            },
            steps: tracker.steps().iter().map(ReportStep::from).collect(),
        }
    }

    /// ダウンロード用のファイル名
    pub fn filename(&self) -> String {
        format!(
            "incident_response_report_{}_{}.json",
            self.incident_id,
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }
}

/// 完了タイムスタンプの最小と最大の差を"<hours>h <minutes>m"で返す
///
/// 完了ステップが0件ならN/A。ステップが順不同で完了した場合でも
/// min/maxの幅を測る。
pub fn calculate_total_duration(tracker: &ResponseTracker) -> String {
    let completed: Vec<DateTime<Utc>> = tracker
        .steps()
        .iter()
        .filter_map(|s| s.completed_at)
        .collect();

    let (first, last) = match (completed.iter().min(), completed.iter().max()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return DURATION_NOT_AVAILABLE.to_string(),
    };

    let elapsed = last - first;
    format!("{}h {}m", elapsed.num_hours(), elapsed.num_minutes() % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::{Actor, ActorRole};
    use crate::domain::response_step::ResponseEvidence;
    use chrono::Duration;

    fn analyst() -> Actor {
        Actor::new(Uuid::new_v4(), "Alice Chen", ActorRole::Analyst)
    }

    #[test]
    fn test_duration_na_when_nothing_completed() {
        let tracker = ResponseTracker::new(Uuid::new_v4());
        assert_eq!(calculate_total_duration(&tracker), DURATION_NOT_AVAILABLE);

        let report = ResponseReport::generate(&tracker);
        assert_eq!(report.summary.total_duration, DURATION_NOT_AVAILABLE);
        assert_eq!(report.summary.completed_steps, 0);
    }

    #[test]
    fn test_duration_spread_between_first_and_last_completion() {
        let actor = analyst();
        let mut tracker = ResponseTracker::new(Uuid::new_v4());

        tracker
            .step_mut(StepKind::Detect)
            .set_status(StepStatus::Completed, &actor);
        tracker
            .step_mut(StepKind::Contain)
            .set_status(StepStatus::Completed, &actor);

        // 完了時刻を固定して幅を検証
        let base = Utc::now();
        tracker.step_mut(StepKind::Detect).completed_at = Some(base);
        tracker.step_mut(StepKind::Contain).completed_at =
            Some(base + Duration::hours(2) + Duration::minutes(35));

        assert_eq!(calculate_total_duration(&tracker), "2h 35m");
    }

    #[test]
    fn test_duration_single_completion_is_zero() {
        let actor = analyst();
        let mut tracker = ResponseTracker::new(Uuid::new_v4());
        tracker
            .step_mut(StepKind::Detect)
            .set_status(StepStatus::Completed, &actor);

        assert_eq!(calculate_total_duration(&tracker), "0h 0m");
    }

    #[test]
    fn test_report_counters() {
        let actor = analyst();
        let mut tracker = ResponseTracker::new(Uuid::new_v4());

        let detect = tracker.step_mut(StepKind::Detect);
        let action_id = detect.add_action("Verify scope", &actor).unwrap().id;
        detect.toggle_action(action_id, &actor);
        detect.set_status(StepStatus::Completed, &actor);

        tracker.step_mut(StepKind::Contain).attach_evidence(
            ResponseEvidence {
                id: Uuid::new_v4(),
                filename: "network_logs.txt".to_string(),
                file_url: "evidence/x".to_string(),
                file_type: "text/plain".to_string(),
                file_size: 1024,
                uploaded_at: Utc::now(),
                uploaded_by: actor.name.clone(),
            },
            &actor,
        );

        let report = ResponseReport::generate(&tracker);
        assert_eq!(report.summary.completed_steps, 1);
        assert_eq!(report.summary.total_steps, 5);
        assert_eq!(report.summary.completed_actions, 1);
        assert_eq!(report.summary.total_actions, 1);
        assert_eq!(report.summary.evidence_files, 1);
        assert_eq!(report.steps.len(), 5);
    }

    #[test]
    fn test_report_round_trip_is_lossless() {
        let actor = analyst();
        let mut tracker = ResponseTracker::new(Uuid::new_v4());

        let detect = tracker.step_mut(StepKind::Detect);
        let action_id = detect.add_action("Verify scope", &actor).unwrap().id;
        detect.toggle_action(action_id, &actor);
        detect.update_notes("Confirmed phishing origin", &actor);
        detect.set_status(StepStatus::Completed, &actor);

        tracker.step_mut(StepKind::Contain).attach_evidence(
            ResponseEvidence {
                id: Uuid::new_v4(),
                filename: "network_logs.txt".to_string(),
                file_url: "evidence/x".to_string(),
                file_type: "text/plain".to_string(),
                file_size: 1024,
                uploaded_at: Utc::now(),
                uploaded_by: actor.name.clone(),
            },
            &actor,
        );

        let report = ResponseReport::generate(&tracker);
        let json = serde_json::to_string_pretty(&report).unwrap();
        let restored: ResponseReport = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, report);

        // ステップの状態・アクションの完了状態・証跡ファイル名が
        // 元のトラッカーと一致する
        for (restored_step, source) in restored.steps.iter().zip(tracker.steps()) {
            assert_eq!(restored_step.id, source.kind);
            assert_eq!(restored_step.status, source.status);
            assert_eq!(restored_step.actions, source.actions);
            assert_eq!(
                restored_step.evidence_files,
                source
                    .evidence
                    .iter()
                    .map(|e| e.filename.clone())
                    .collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_stable_field_order() {
        let tracker = ResponseTracker::new(Uuid::new_v4());
        let report = ResponseReport::generate(&tracker);
        let json = serde_json::to_string(&report).unwrap();

        let incident_pos = json.find("incident_id").unwrap();
        let generated_pos = json.find("generated_at").unwrap();
        let summary_pos = json.find("summary").unwrap();
        let steps_pos = json.find("\"steps\"").unwrap();
        assert!(incident_pos < generated_pos);
        assert!(generated_pos < summary_pos);
        assert!(summary_pos < steps_pos);
    }

    #[test]
    fn test_report_filename() {
        let tracker = ResponseTracker::new(Uuid::new_v4());
        let report = ResponseReport::generate(&tracker);
        let filename = report.filename();
        assert!(filename.starts_with("incident_response_report_"));
        assert!(filename.ends_with(".json"));
    }
}
