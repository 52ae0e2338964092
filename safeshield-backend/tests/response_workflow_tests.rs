// tests/response_workflow_tests.rs
use safeshield_backend::domain::{
    actor::{Actor, ActorRole},
    response_report::ResponseReport,
    response_step::{ResponseEvidence, LOG_EVIDENCE_UPLOADED},
    response_tracker::ResponseTracker,
    step_kind::StepKind,
    step_status::StepStatus,
};
use chrono::Utc;
use uuid::Uuid;

fn analyst() -> Actor {
    Actor::new(Uuid::new_v4(), "Alice Chen", ActorRole::Analyst)
}

#[test]
fn test_fresh_tracker_shape() {
    // 新規ロードしたトラッカーは固定順の5ステップ、全pending、全コレクション空
    let tracker = ResponseTracker::new(Uuid::new_v4());

    let kinds: Vec<StepKind> = tracker.steps().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            StepKind::Detect,
            StepKind::Contain,
            StepKind::Eradicate,
            StepKind::Recover,
            StepKind::Communicate,
        ]
    );

    for step in tracker.steps() {
        assert_eq!(step.status, StepStatus::Pending);
        assert!(step.actions.is_empty());
        assert!(step.evidence.is_empty());
        assert!(step.logs.is_empty());
        assert!(step.completed_at.is_none());
    }

    assert_eq!(tracker.calculate_progress(), 0);
    assert_eq!(tracker.overall_status(), StepStatus::Pending);
}

#[test]
fn test_progress_is_multiple_of_twenty() {
    let actor = analyst();
    let mut tracker = ResponseTracker::new(Uuid::new_v4());

    for (i, kind) in StepKind::all().into_iter().enumerate() {
        tracker
            .step_mut(kind)
            .set_status(StepStatus::Completed, &actor);
        let progress = tracker.calculate_progress();
        assert_eq!(progress as usize, (i + 1) * 20);
        assert!(progress % 20 == 0);
    }
}

#[test]
fn test_incident_walkthrough() {
    // インシデントINC-100相当のシナリオ全体を通す
    let actor = analyst();
    let mut tracker = ResponseTracker::new(Uuid::new_v4());

    // 初期ロード → 進捗0、ステータスpending
    assert_eq!(tracker.calculate_progress(), 0);
    assert_eq!(tracker.overall_status(), StepStatus::Pending);

    // detectをin_progressに → 進捗は0のまま、全体はin_progress
    tracker
        .step_mut(StepKind::Detect)
        .set_status(StepStatus::InProgress, &actor);
    assert_eq!(tracker.calculate_progress(), 0);
    assert_eq!(tracker.overall_status(), StepStatus::InProgress);

    // detectに"Verify scope"を追加して完了にし、detect自体も完了へ
    {
        let detect = tracker.step_mut(StepKind::Detect);
        let id = detect.add_action("Verify scope", &actor).unwrap().id;
        detect.toggle_action(id, &actor);
        detect.set_status(StepStatus::Completed, &actor);
    }
    assert_eq!(tracker.calculate_progress(), 20);
    assert!(tracker.step(StepKind::Detect).completed_at.is_some());
    assert!(tracker.step(StepKind::Detect).actions[0].completed);

    // 残り4ステップも同様に完了させる
    for kind in [
        StepKind::Contain,
        StepKind::Eradicate,
        StepKind::Recover,
        StepKind::Communicate,
    ] {
        let step = tracker.step_mut(kind);
        let id = step.add_action("Work the phase", &actor).unwrap().id;
        step.toggle_action(id, &actor);
        step.set_status(StepStatus::Completed, &actor);
    }

    assert_eq!(tracker.calculate_progress(), 100);
    assert_eq!(tracker.overall_status(), StepStatus::Completed);

    let report = ResponseReport::generate(&tracker);
    assert_eq!(report.summary.completed_steps, 5);
    assert_eq!(report.summary.total_steps, 5);
    assert_eq!(report.summary.completed_actions, 5);
}

#[test]
fn test_evidence_attachment_scenario() {
    // containステップにnetwork_logs.txt (1024バイト)を添付する
    let actor = analyst();
    let mut tracker = ResponseTracker::new(Uuid::new_v4());

    tracker.step_mut(StepKind::Contain).attach_evidence(
        ResponseEvidence {
            id: Uuid::new_v4(),
            filename: "network_logs.txt".to_string(),
            file_url: "evidence/incident/contain/file".to_string(),
            file_type: "text/plain".to_string(),
            file_size: 1024,
            uploaded_at: Utc::now(),
            uploaded_by: actor.name.clone(),
        },
        &actor,
    );

    assert_eq!(tracker.total_evidence_count(), 1);

    let contain = tracker.step(StepKind::Contain);
    let log = contain
        .logs
        .iter()
        .find(|l| l.action == LOG_EVIDENCE_UPLOADED)
        .expect("evidence upload should be logged");
    assert!(log.details.contains("network_logs.txt"));
}

#[test]
fn test_regression_from_completed_is_logged_as_reopen() {
    let actor = analyst();
    let mut tracker = ResponseTracker::new(Uuid::new_v4());

    let step = tracker.step_mut(StepKind::Eradicate);
    step.set_status(StepStatus::Completed, &actor);
    step.set_status(StepStatus::Pending, &actor);

    assert_eq!(step.status, StepStatus::Pending);
    assert!(step.completed_at.is_none());
    assert_eq!(step.logs.len(), 2);
    assert!(step.logs[1].details.contains("reopened"));

    // 完了が取り消されたので進捗も戻る
    assert_eq!(tracker.calculate_progress(), 0);
}

#[test]
fn test_merge_is_idempotent_across_loads() {
    let incident_id = Uuid::new_v4();
    let actor = analyst();

    let mut detect = safeshield_backend::domain::response_step::ResponseStep::new(StepKind::Detect);
    detect.set_status(StepStatus::Completed, &actor);
    detect.add_action("Verify scope", &actor);

    let first = ResponseTracker::from_loaded_steps(incident_id, vec![detect.clone()]);
    let second = ResponseTracker::from_loaded_steps(incident_id, vec![detect]);

    assert_eq!(first, second);
    assert_eq!(first.calculate_progress(), 20);
}
