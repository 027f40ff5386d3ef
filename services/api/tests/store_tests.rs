//! Contract tests for the in-memory store adapter.

use api_lib::adapters::store::MemStore;
use symptom_core::domain::{HealthAssessment, SubmissionKind, UrgencyLevel};
use symptom_core::ports::{PortError, StorageService};

fn assessment(urgency: UrgencyLevel) -> HealthAssessment {
    HealthAssessment {
        analysis: "Likely mild dehydration.".to_string(),
        urgency_level: urgency,
        possible_causes: vec!["dehydration".to_string()],
        health_tips: vec!["drink water".to_string()],
        seek_immediate_care: false,
    }
}

#[tokio::test]
async fn users_get_sequential_ids_and_are_found_by_username() {
    let store = MemStore::new();

    let alice = store.create_user("alice", "hash-a").await.unwrap();
    let bob = store.create_user("bob", "hash-b").await.unwrap();
    assert_eq!(alice.id, 1);
    assert_eq!(bob.id, 2);

    let found = store.get_user_by_username("bob").await.unwrap().unwrap();
    assert_eq!(found.id, bob.id);
    assert_eq!(found.password_hash, "hash-b");

    let by_id = store.get_user(1).await.unwrap().unwrap();
    assert_eq!(by_id.username, "alice");
}

#[tokio::test]
async fn duplicate_username_is_rejected_without_overwriting() {
    let store = MemStore::new();

    let alice = store.create_user("alice", "p1").await.unwrap();
    assert_eq!(alice.id, 1);

    let err = store.create_user("alice", "p2").await.unwrap_err();
    assert!(matches!(err, PortError::Conflict(_)));

    // The original record is untouched.
    let kept = store.get_user(1).await.unwrap().unwrap();
    assert_eq!(kept.password_hash, "p1");
    assert!(store.get_user(2).await.unwrap().is_none());
}

#[tokio::test]
async fn submission_round_trips_with_normalized_filename() {
    let store = MemStore::new();

    let created = store
        .create_submission("s1", SubmissionKind::Text, "headache", None)
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.kind, SubmissionKind::Text);
    assert!(created.original_filename.is_none());

    let fetched = store.get_submission(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.session_id, created.session_id);
    assert_eq!(fetched.content, created.content);
    assert_eq!(fetched.created_at, created.created_at);

    let with_file = store
        .create_submission("s1", SubmissionKind::Photo, "data:image/png;base64,AAAA", Some("rash.png"))
        .await
        .unwrap();
    assert_eq!(with_file.original_filename.as_deref(), Some("rash.png"));
}

#[tokio::test]
async fn session_scan_returns_exactly_that_session_in_creation_order() {
    let store = MemStore::new();

    for content in ["first", "second", "third"] {
        store
            .create_submission("s1", SubmissionKind::Text, content, None)
            .await
            .unwrap();
    }
    store
        .create_submission("s2", SubmissionKind::Text, "other session", None)
        .await
        .unwrap();

    let history = store.get_submissions_by_session("s1").await.unwrap();
    let contents: Vec<&str> = history.iter().map(|s| s.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
    assert!(history.iter().all(|s| s.session_id == "s1"));

    assert!(store
        .get_submissions_by_session("unknown")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn analysis_lookup_matches_created_record() {
    let store = MemStore::new();

    let submission = store
        .create_submission("s1", SubmissionKind::Text, "headache", None)
        .await
        .unwrap();
    assert_eq!(submission.id, 1);

    let created = store
        .create_analysis(submission.id, &assessment(UrgencyLevel::Low))
        .await
        .unwrap();
    assert_eq!(created.id, 1);

    let fetched = store
        .get_analysis_by_submission(submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.submission_id, submission.id);
    assert_eq!(fetched.urgency_level, UrgencyLevel::Low);
    assert_eq!(fetched.possible_causes, vec!["dehydration"]);
    assert_eq!(fetched.health_tips, vec!["drink water"]);

    // Absent lookups are Ok(None), never errors.
    assert!(store.get_analysis_by_submission(2).await.unwrap().is_none());
    assert!(store.get_submission(99).await.unwrap().is_none());
}

#[tokio::test]
async fn analysis_requires_an_existing_submission() {
    let store = MemStore::new();

    let err = store
        .create_analysis(42, &assessment(UrgencyLevel::Medium))
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}

#[tokio::test]
async fn second_analysis_for_one_submission_is_rejected() {
    let store = MemStore::new();

    let submission = store
        .create_submission("s1", SubmissionKind::Text, "fever", None)
        .await
        .unwrap();
    store
        .create_analysis(submission.id, &assessment(UrgencyLevel::Medium))
        .await
        .unwrap();

    // A retried request must not silently add a second row.
    let err = store
        .create_analysis(submission.id, &assessment(UrgencyLevel::High))
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Conflict(_)));

    let kept = store
        .get_analysis_by_submission(submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.urgency_level, UrgencyLevel::Medium);
}

#[tokio::test]
async fn auth_sessions_validate_until_deleted_or_expired() {
    let store = MemStore::new();
    let user = store.create_user("alice", "hash").await.unwrap();

    let future = chrono::Utc::now() + chrono::Duration::days(1);
    store
        .create_auth_session("tok-1", user.id, future)
        .await
        .unwrap();
    assert_eq!(store.validate_auth_session("tok-1").await.unwrap(), user.id);

    store.delete_auth_session("tok-1").await.unwrap();
    assert!(matches!(
        store.validate_auth_session("tok-1").await.unwrap_err(),
        PortError::Unauthorized
    ));

    let past = chrono::Utc::now() - chrono::Duration::minutes(1);
    store
        .create_auth_session("tok-2", user.id, past)
        .await
        .unwrap();
    assert!(matches!(
        store.validate_auth_session("tok-2").await.unwrap_err(),
        PortError::Unauthorized
    ));
}

#[tokio::test]
async fn concurrent_registrations_admit_exactly_one_winner() {
    let store = std::sync::Arc::new(MemStore::new());

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.create_user("alice", &format!("hash-{}", i)).await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(PortError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);
}
