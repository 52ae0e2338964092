// safeshield-backend/src/domain/response_tracker.rs

use uuid::Uuid;

use super::response_step::ResponseStep;
use super::step_kind::{StepKind, STEP_COUNT};
use super::step_status::StepStatus;

/// 1インシデント分の対応ワークフロー全体を束ねるアグリゲート
///
/// 5つの固定ステップを正規の順序で排他的に所有する。ステップは
/// 常に5つ存在し、追加・削除・並べ替えは行わない。トラッカー自体は
/// 監査・レポート履歴のため削除されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTracker {
    pub incident_id: Uuid,
    steps: Vec<ResponseStep>,
}

impl ResponseTracker {
    /// 全ステップpendingの新規トラッカーを作成
    pub fn new(incident_id: Uuid) -> Self {
        Self {
            incident_id,
            steps: StepKind::all().into_iter().map(ResponseStep::new).collect(),
        }
    }

    /// 永続化されたステップ状態を正規のテンプレートにマージする
    ///
    /// ストレージに行がないステップはデフォルト（pending、空コレクション）の
    /// まま残る。同じ入力に対して常に同じトラッカーを生成する（冪等）。
    pub fn from_loaded_steps(incident_id: Uuid, loaded: Vec<ResponseStep>) -> Self {
        let mut tracker = Self::new(incident_id);
        for step in loaded {
            if let Some(slot) = tracker.steps.iter_mut().find(|s| s.kind == step.kind) {
                *slot = step;
            }
        }
        tracker
    }

    /// 正規の順序でステップを参照
    pub fn steps(&self) -> &[ResponseStep] {
        &self.steps
    }

    /// 種別でステップを参照
    pub fn step(&self, kind: StepKind) -> &ResponseStep {
        // 5種は常に存在する
        self.steps
            .iter()
            .find(|s| s.kind == kind)
            .unwrap_or_else(|| unreachable!("tracker always holds all five steps"))
    }

    /// 種別でステップを可変参照
    pub fn step_mut(&mut self, kind: StepKind) -> &mut ResponseStep {
        self.steps
            .iter_mut()
            .find(|s| s.kind == kind)
            .unwrap_or_else(|| unreachable!("tracker always holds all five steps"))
    }

    /// 完了済みステップ数
    pub fn completed_step_count(&self) -> usize {
        self.steps.iter().filter(|s| s.status.is_completed()).count()
    }

    /// 進捗率（0〜100、20刻み）
    ///
    /// 現在のメモリ上の状態のみから導出する純関数。
    pub fn calculate_progress(&self) -> u8 {
        (self.completed_step_count() * 100 / STEP_COUNT) as u8
    }

    /// トラッカー全体のステータス（導出値、保存はしない）
    ///
    /// 全ステップ完了ならcompleted、どれかが進行中または一部（全部では
    /// ない）完了ならin_progress、それ以外はpending。読み出しのたびに
    /// 再計算する。
    pub fn overall_status(&self) -> StepStatus {
        let completed = self.completed_step_count();
        if completed == STEP_COUNT {
            return StepStatus::Completed;
        }
        let any_in_progress = self
            .steps
            .iter()
            .any(|s| s.status == StepStatus::InProgress);
        if any_in_progress || completed > 0 {
            StepStatus::InProgress
        } else {
            StepStatus::Pending
        }
    }

    /// 全ステップ合計のアクション数
    pub fn total_action_count(&self) -> usize {
        self.steps.iter().map(|s| s.actions.len()).sum()
    }

    /// 全ステップ合計の完了済みアクション数
    pub fn completed_action_count(&self) -> usize {
        self.steps.iter().map(|s| s.completed_action_count()).sum()
    }

    /// 全ステップ合計の証跡ファイル数
    pub fn total_evidence_count(&self) -> usize {
        self.steps.iter().map(|s| s.evidence.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::{Actor, ActorRole};

    fn analyst() -> Actor {
        Actor::new(Uuid::new_v4(), "Alice Chen", ActorRole::Analyst)
    }

    #[test]
    fn test_new_tracker_has_five_pending_steps_in_order() {
        let tracker = ResponseTracker::new(Uuid::new_v4());

        let kinds: Vec<StepKind> = tracker.steps().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, StepKind::all().to_vec());

        for step in tracker.steps() {
            assert_eq!(step.status, StepStatus::Pending);
            assert!(step.actions.is_empty());
            assert!(step.evidence.is_empty());
            assert!(step.logs.is_empty());
        }
    }

    #[test]
    fn test_from_loaded_steps_merges_onto_templates() {
        let incident_id = Uuid::new_v4();
        let actor = analyst();

        let mut contain = ResponseStep::new(StepKind::Contain);
        contain.set_status(StepStatus::InProgress, &actor);

        let tracker = ResponseTracker::from_loaded_steps(incident_id, vec![contain.clone()]);

        assert_eq!(tracker.step(StepKind::Contain).status, StepStatus::InProgress);
        assert_eq!(tracker.step(StepKind::Detect).status, StepStatus::Pending);
        assert_eq!(tracker.steps().len(), 5);

        // 同じ入力からのロードは同じ状態を生む（冪等）
        let again = ResponseTracker::from_loaded_steps(incident_id, vec![contain]);
        assert_eq!(tracker, again);
    }

    #[test]
    fn test_progress_boundaries() {
        let actor = analyst();
        let mut tracker = ResponseTracker::new(Uuid::new_v4());
        assert_eq!(tracker.calculate_progress(), 0);

        let mut expected = 0;
        for kind in StepKind::all() {
            tracker.step_mut(kind).set_status(StepStatus::Completed, &actor);
            expected += 20;
            assert_eq!(tracker.calculate_progress(), expected);
        }
        assert_eq!(tracker.calculate_progress(), 100);
    }

    #[test]
    fn test_in_progress_step_does_not_move_progress() {
        let actor = analyst();
        let mut tracker = ResponseTracker::new(Uuid::new_v4());

        tracker
            .step_mut(StepKind::Detect)
            .set_status(StepStatus::InProgress, &actor);
        assert_eq!(tracker.calculate_progress(), 0);
        assert_eq!(tracker.overall_status(), StepStatus::InProgress);
    }

    #[test]
    fn test_overall_status_derivation() {
        let actor = analyst();
        let mut tracker = ResponseTracker::new(Uuid::new_v4());
        assert_eq!(tracker.overall_status(), StepStatus::Pending);

        // 一部完了（進行中なし）でもin_progress
        tracker
            .step_mut(StepKind::Detect)
            .set_status(StepStatus::Completed, &actor);
        assert_eq!(tracker.overall_status(), StepStatus::InProgress);

        for kind in StepKind::all() {
            tracker.step_mut(kind).set_status(StepStatus::Completed, &actor);
        }
        assert_eq!(tracker.overall_status(), StepStatus::Completed);
    }

    #[test]
    fn test_aggregate_counts() {
        let actor = analyst();
        let mut tracker = ResponseTracker::new(Uuid::new_v4());

        let detect = tracker.step_mut(StepKind::Detect);
        let first = detect.add_action("Verify scope", &actor).unwrap().id;
        detect.add_action("Review alerts", &actor);
        detect.toggle_action(first, &actor);

        tracker
            .step_mut(StepKind::Contain)
            .add_action("Isolate host", &actor);

        assert_eq!(tracker.total_action_count(), 3);
        assert_eq!(tracker.completed_action_count(), 1);
        assert_eq!(tracker.total_evidence_count(), 0);
    }
}
