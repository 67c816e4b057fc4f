//! Integration tests for the Postgres store against a real database.
//!
//! Exercises the transactional paths that the in-memory store cannot prove:
//! - Version numbers allocated under the draft row lock stay dense under concurrency
//! - Restore truncates history and clears `version_id` on resolved submissions
//! - The partial unique index rejects a second pending submission
//! - Compare-and-set review decisions
//! - Unique-constraint violations surface as `Conflict`
//!
//! Run with `DATABASE_URL` set and `cargo test -- --ignored`.

use assert_matches::assert_matches;
use inkwell_core::error::CoreError;
use inkwell_core::roles::Role;
use inkwell_core::submission::SubmissionStatus;
use inkwell_db::models::collaborator::CreateCollaborator;
use inkwell_db::models::draft::{CreateDraft, UpdateDraft};
use inkwell_db::models::submission::{CreateSubmission, DecideSubmission};
use inkwell_db::models::user::{CreateUser, UpdateProfile};
use inkwell_db::models::version::CreateVersion;
use inkwell_db::{DraftStore, PgStore, StoreError};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed(store: &PgStore, email: &str) -> (i64, i64) {
    let user = store
        .create_user(&CreateUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap();
    store
        .update_profile(
            user.id,
            &UpdateProfile {
                display_name: "Ada".to_string(),
                role: Role::Author,
            },
        )
        .await
        .unwrap();
    let draft = store
        .create_draft(&CreateDraft {
            owner_id: user.id,
            title: "Photosynthesis".to_string(),
        })
        .await
        .unwrap();
    (user.id, draft.id)
}

fn version(draft_id: i64, content: &str) -> CreateVersion {
    CreateVersion {
        draft_id,
        content: Some(content.to_string()),
        created_by: None,
    }
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_versions_are_dense(pool: PgPool) {
    let store = PgStore::new(pool);
    let (_, draft_id) = seed(&store, "ada@example.com").await;

    let creates = (0..10).map(|i| {
        let store = store.clone();
        async move {
            store
                .create_version(&version(draft_id, &format!("edit {i}")))
                .await
                .unwrap()
                .version_number
        }
    });
    let mut numbers = futures::future::join_all(creates).await;
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=10).collect::<Vec<_>>());

    let draft = store.find_draft(draft_id).await.unwrap().unwrap();
    assert!(draft.content.starts_with("edit "));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_contentless_version_snapshots_locked_live_content(pool: PgPool) {
    let store = PgStore::new(pool);
    let (_, draft_id) = seed(&store, "ada@example.com").await;
    store
        .create_version(&version(draft_id, "old"))
        .await
        .unwrap();
    store
        .update_draft(
            draft_id,
            &UpdateDraft {
                content: Some("edited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let snapshot = store
        .create_version(&CreateVersion {
            draft_id,
            content: None,
            created_by: None,
        })
        .await
        .unwrap();
    assert_eq!(snapshot.version_number, 2);
    assert_eq!(snapshot.content, "edited");

    let draft = store.find_draft(draft_id).await.unwrap().unwrap();
    assert_eq!(draft.content, "edited");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_restore_truncates_and_detaches_resolved_submissions(pool: PgPool) {
    let store = PgStore::new(pool);
    let (user_id, draft_id) = seed(&store, "ada@example.com").await;
    store
        .create_version(&version(draft_id, "one"))
        .await
        .unwrap();
    store
        .create_version(&version(draft_id, "two"))
        .await
        .unwrap();

    let (submission, _) = store
        .create_submission(&CreateSubmission {
            draft_id,
            submitted_by: user_id,
            version_id: None,
        })
        .await
        .unwrap();
    assert_matches!(
        store.restore_version(draft_id, 1, None).await,
        Err(StoreError::Core(CoreError::Conflict(_)))
    );

    store
        .decide_submission(&DecideSubmission {
            submission_id: submission.id,
            reviewer_id: user_id,
            status: SubmissionStatus::Approved,
            feedback: "Fine".to_string(),
        })
        .await
        .unwrap()
        .unwrap();

    let outcome = store.restore_version(draft_id, 1, Some(2)).await.unwrap();
    assert_eq!(outcome.deleted_count, 2);
    assert_eq!(outcome.draft.content, "one");
    assert_eq!(store.version_numbers(draft_id).await.unwrap(), vec![1]);

    let detached = store.find_submission(submission.id).await.unwrap().unwrap();
    assert_eq!(detached.version_id, None);

    let next = store
        .create_version(&version(draft_id, "again"))
        .await
        .unwrap();
    assert_eq!(next.version_number, 2);
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_one_pending_submission_per_draft(pool: PgPool) {
    let store = PgStore::new(pool);
    let (user_id, draft_id) = seed(&store, "ada@example.com").await;
    let input = CreateSubmission {
        draft_id,
        submitted_by: user_id,
        version_id: None,
    };

    let (first, created) = store.create_submission(&input).await.unwrap();
    assert_eq!(first.status, SubmissionStatus::Pending);
    assert_eq!(created.map(|v| v.version_number), Some(1));

    assert_matches!(
        store.create_submission(&input).await,
        Err(StoreError::Core(CoreError::Conflict(_)))
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_decision_is_compare_and_set(pool: PgPool) {
    let store = PgStore::new(pool);
    let (user_id, draft_id) = seed(&store, "ada@example.com").await;
    let (submission, _) = store
        .create_submission(&CreateSubmission {
            draft_id,
            submitted_by: user_id,
            version_id: None,
        })
        .await
        .unwrap();

    let decide = |status| DecideSubmission {
        submission_id: submission.id,
        reviewer_id: user_id,
        status,
        feedback: "Reviewed".to_string(),
    };
    let approve = decide(SubmissionStatus::Approved);
    let reject = decide(SubmissionStatus::Rejected);
    let (a, b) = tokio::join!(
        store.decide_submission(&approve),
        store.decide_submission(&reject),
    );
    let winners = [a.unwrap(), b.unwrap()]
        .into_iter()
        .filter(Option::is_some)
        .count();
    assert_eq!(winners, 1);

    let queue = store.list_pending_submissions().await.unwrap();
    assert!(queue.is_empty());
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_unique_violations_are_conflicts(pool: PgPool) {
    let store = PgStore::new(pool);
    let (owner_id, draft_id) = seed(&store, "ada@example.com").await;
    let (other_id, _) = seed(&store, "grace@example.com").await;

    assert_matches!(
        store
            .create_user(&CreateUser {
                email: "ada@example.com".to_string(),
                password_hash: "x".to_string(),
            })
            .await,
        Err(StoreError::Core(CoreError::Conflict(_)))
    );

    let grant = CreateCollaborator {
        draft_id,
        user_id: other_id,
        added_by: owner_id,
    };
    store.create_grant(&grant).await.unwrap();
    assert_matches!(
        store.create_grant(&grant).await,
        Err(StoreError::Core(CoreError::Conflict(_)))
    );

    let grants = store.list_grants(draft_id).await.unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].role, Role::Author);

    let shared = store.list_drafts_shared_with(other_id).await.unwrap();
    assert_eq!(
        shared.iter().map(|d| d.id).collect::<Vec<_>>(),
        vec![draft_id]
    );
}
