// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Soft-delete repository contract tests: lifecycle flags, default
//! filtering, idempotence and patch semantics.

use chrono::Duration;
use lifetrack_core::error::AppError;
use lifetrack_core::models::{SeriesPatch, SessionPatch};

mod common;
use common::{make_series, make_session, test_now, test_state};

#[tokio::test]
async fn test_soft_delete_restore_round_trip() {
    let (state, _clock) = test_state();
    let session = make_session(&state, test_now(), 3600).await;

    // Default list includes the fresh row.
    let all = state.store.sessions.get_all_by_date_desc().await.unwrap();
    assert_eq!(all.len(), 1);

    state.store.sessions.soft_delete(&session.meta.id).await.unwrap();

    // Default reads exclude it; explicit history read still sees it.
    assert!(state.store.sessions.get_all_by_date_desc().await.unwrap().is_empty());
    assert!(state.store.sessions.get_by_id(&session.meta.id).await.unwrap().is_none());
    let hidden = state
        .store
        .sessions
        .get_by_id_any(&session.meta.id)
        .await
        .unwrap()
        .expect("row must remain in storage");
    assert!(hidden.meta.is_deleted);
    assert!(hidden.meta.deleted_at.is_some());

    state.store.sessions.restore(&session.meta.id).await.unwrap();

    let restored = state
        .store
        .sessions
        .get_by_id(&session.meta.id)
        .await
        .unwrap()
        .expect("restored row must be visible again");
    assert!(!restored.meta.is_deleted);
    assert!(restored.meta.deleted_at.is_none());
    // Non-lifecycle fields unchanged.
    assert_eq!(restored.duration_secs, session.duration_secs);
    assert_eq!(restored.started_at, session.started_at);
}

#[tokio::test]
async fn test_soft_delete_is_idempotent() {
    let (state, clock) = test_state();
    let session = make_session(&state, test_now(), 1800).await;

    state.store.sessions.soft_delete(&session.meta.id).await.unwrap();
    let first = state
        .store
        .sessions
        .get_by_id_any(&session.meta.id)
        .await
        .unwrap()
        .unwrap();

    // A second delete later must not error or move deleted_at.
    clock.advance(Duration::hours(1));
    state.store.sessions.soft_delete(&session.meta.id).await.unwrap();
    let second = state
        .store
        .sessions
        .get_by_id_any(&session.meta.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.meta.deleted_at, second.meta.deleted_at);

    // Deleting or restoring a missing id is a tolerated no-op.
    state.store.sessions.soft_delete("no-such-id").await.unwrap();
    state.store.sessions.restore("no-such-id").await.unwrap();
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let (state, _clock) = test_state();
    let err = state
        .store
        .sessions
        .update("no-such-id", SessionPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_update_bumps_updated_at() {
    let (state, clock) = test_state();
    let session = make_session(&state, test_now(), 3600).await;
    assert_eq!(session.meta.created_at, session.meta.updated_at);

    clock.advance(Duration::minutes(5));
    let updated = state
        .store
        .sessions
        .update(
            &session.meta.id,
            SessionPatch {
                duration_secs: Some(5400),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.duration_secs, 5400);
    assert_eq!(updated.meta.created_at, session.meta.created_at);
    assert_eq!(
        updated.meta.updated_at - updated.meta.created_at,
        Duration::minutes(5)
    );
}

#[tokio::test]
async fn test_patch_can_clear_optional_fields() {
    let (state, _clock) = test_state();
    let session = make_session(&state, test_now(), 3600).await;

    let rated = state
        .store
        .sessions
        .update(
            &session.meta.id,
            SessionPatch {
                productivity: Some(Some(8)),
                distance_meters: Some(Some(5000.0)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(rated.productivity, Some(8));
    assert_eq!(rated.distance_meters, Some(5000.0));

    // The inner None clears a previously set value.
    let cleared = state
        .store
        .sessions
        .update(
            &session.meta.id,
            SessionPatch {
                productivity: Some(None),
                distance_meters: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.productivity, None);
    assert_eq!(cleared.distance_meters, None);

    // An absent field leaves the current value alone.
    let untouched = state
        .store
        .sessions
        .update(
            &session.meta.id,
            SessionPatch {
                productivity: Some(Some(6)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(untouched.productivity, Some(6));
    assert_eq!(untouched.distance_meters, None);
}

#[tokio::test]
async fn test_invalid_patch_is_rejected_before_merge() {
    let (state, _clock) = test_state();
    let session = make_session(&state, test_now(), 3600).await;

    let err = state
        .store
        .sessions
        .update(
            &session.meta.id,
            SessionPatch {
                duration_secs: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // The row is untouched.
    let row = state
        .store
        .sessions
        .get_by_id(&session.meta.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.duration_secs, 3600);
}

#[tokio::test]
async fn test_completed_series_requires_unlock() {
    let (state, _clock) = test_state();
    let session = make_session(&state, test_now(), 3600).await;
    let series = make_series(&state, &session.meta.id, "squat", 0, 8, Some(80.0), true).await;

    // Editing a completed set without unlocking is rejected.
    let err = state
        .store
        .series
        .update(
            &series.meta.id,
            SeriesPatch {
                reps: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Unlock-and-edit in one patch is allowed.
    let updated = state
        .store
        .series
        .update(
            &series.meta.id,
            SeriesPatch {
                reps: Some(10),
                completed: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.reps, 10);
    assert!(!updated.completed);
}

#[tokio::test]
async fn test_reads_observe_prior_writes_in_program_order() {
    let (state, _clock) = test_state();
    for i in 0i64..3 {
        make_session(&state, test_now() + Duration::hours(i), 600).await;
        // Each read within the operation sees every prior write.
        let count = state.store.sessions.get_all_by_date_desc().await.unwrap().len();
        assert_eq!(count, (i + 1) as usize);
    }

    let all = state.store.sessions.get_all_by_date_desc().await.unwrap();
    // Most recent first.
    assert!(all[0].started_at > all[1].started_at);
    assert!(all[1].started_at > all[2].started_at);
}

#[tokio::test]
async fn test_pain_note_deletes_independently_of_its_series() {
    let (state, _clock) = test_state();
    let session = make_session(&state, test_now(), 3600).await;
    let series = make_series(&state, &session.meta.id, "squat", 0, 8, Some(80.0), false).await;

    let note = state
        .store
        .pain_notes
        .create(common::USER, |meta| {
            let note = lifetrack_core::models::PainNote {
                meta,
                session_id: session.meta.id.clone(),
                exercise_id: "squat".to_string(),
                zone: lifetrack_core::models::BodyZone::Knee,
                intensity: 6,
                note: Some("sharp on the way down".to_string()),
            };
            note.validate()?;
            Ok(note)
        })
        .await
        .unwrap();

    state.store.pain_notes.soft_delete(&note.meta.id).await.unwrap();

    // The parent series is untouched.
    assert!(state
        .store
        .series
        .get_by_id(&series.meta.id)
        .await
        .unwrap()
        .is_some());
    assert!(state
        .store
        .pain_notes
        .get_by_id(&note.meta.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_pain_note_rejects_out_of_range_intensity() {
    let (state, _clock) = test_state();
    let session = make_session(&state, test_now(), 3600).await;

    let result = state
        .store
        .pain_notes
        .create(common::USER, |meta| {
            let note = lifetrack_core::models::PainNote {
                meta,
                session_id: session.meta.id.clone(),
                exercise_id: "squat".to_string(),
                zone: lifetrack_core::models::BodyZone::Knee,
                intensity: 11,
                note: None,
            };
            note.validate()?;
            Ok(note)
        })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(state.store.pain_notes.get_all_by_date_desc().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pain_note_text_limit_is_500_chars() {
    let (state, _clock) = test_state();
    let session = make_session(&state, test_now(), 3600).await;

    let note_of = |len: usize| {
        let meta_session = session.meta.id.clone();
        move |meta| {
            let note = lifetrack_core::models::PainNote {
                meta,
                session_id: meta_session.clone(),
                exercise_id: "squat".to_string(),
                zone: lifetrack_core::models::BodyZone::Knee,
                intensity: 4,
                note: Some("x".repeat(len)),
            };
            note.validate()?;
            Ok(note)
        }
    };

    // Exactly at the limit is accepted.
    state
        .store
        .pain_notes
        .create(common::USER, note_of(500))
        .await
        .unwrap();

    // One character over is rejected.
    let result = state
        .store
        .pain_notes
        .create(common::USER, note_of(501))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(state.store.pain_notes.get_all_by_date_desc().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_date_range_read_is_inclusive_and_ascending() {
    let (state, _clock) = test_state();
    let base = test_now();
    let s1 = make_session(&state, base, 600).await;
    let s2 = make_session(&state, base + Duration::days(1), 600).await;
    let _s3 = make_session(&state, base + Duration::days(5), 600).await;

    let rows = state
        .store
        .sessions
        .get_in_date_range(base, base + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].meta.id, s1.meta.id);
    assert_eq!(rows[1].meta.id, s2.meta.id);
}
