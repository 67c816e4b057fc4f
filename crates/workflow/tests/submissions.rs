mod common;

use assert_matches::assert_matches;
use common::TestEnv;
use inkwell_core::error::CoreError;
use inkwell_core::submission::{SubmissionStatus, DEFAULT_APPROVAL_FEEDBACK};
use inkwell_db::{DraftStore, StoreError};

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_without_version_then_approve() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let reviewer = env.reviewer("Rex").await;
    let draft = env.draft(&owner, "Ecosystems").await;

    let receipt = env
        .workflow
        .submissions
        .submit(draft.id, &owner, None)
        .await
        .unwrap();
    let version = receipt
        .created_version
        .expect("version 1 should be created");
    assert_eq!(version.version_number, 1);
    assert_eq!(receipt.submission.version_id, Some(version.id));
    assert_eq!(receipt.submission.status, SubmissionStatus::Pending);

    let approved = env
        .workflow
        .submissions
        .approve(receipt.submission.id, &reviewer, Some("Looks good"))
        .await
        .unwrap();
    assert_eq!(approved.status, SubmissionStatus::Approved);
    assert_eq!(approved.feedback.as_deref(), Some("Looks good"));
    assert_eq!(approved.reviewed_by, Some(reviewer.user_id));
    assert!(approved.reviewed_at.is_some());
}

#[tokio::test]
async fn submit_with_explicit_version_reuses_it() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    let v1 = env
        .workflow
        .drafts
        .create_version(draft.id, &owner, Some("first".to_string()))
        .await
        .unwrap();
    env.workflow
        .drafts
        .create_version(draft.id, &owner, Some("second".to_string()))
        .await
        .unwrap();

    let receipt = env
        .workflow
        .submissions
        .submit(draft.id, &owner, Some(v1.id))
        .await
        .unwrap();
    assert!(receipt.created_version.is_none());
    assert_eq!(receipt.submission.version_id, Some(v1.id));
    assert_eq!(
        env.store.latest_version_number(draft.id).await.unwrap(),
        Some(2)
    );
}

#[tokio::test]
async fn only_the_owner_may_submit() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let bea = env.author("Bea").await;
    let cy = env.author("Cy").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    env.workflow
        .access
        .grant(draft.id, &owner, bea.user_id)
        .await
        .unwrap();

    assert_matches!(
        env.workflow.submissions.submit(draft.id, &bea, None).await,
        Err(StoreError::Core(CoreError::Forbidden(_)))
    );
    assert_matches!(
        env.workflow.submissions.submit(draft.id, &cy, None).await,
        Err(StoreError::Core(CoreError::NotFound { .. }))
    );
    assert!(env
        .store
        .list_submissions_for_draft(draft.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn second_pending_submission_conflicts_until_resolved() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let reviewer = env.reviewer("Rex").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    let submissions = &env.workflow.submissions;

    let first = submissions.submit(draft.id, &owner, None).await.unwrap();
    assert_matches!(
        submissions.submit(draft.id, &owner, None).await,
        Err(StoreError::Core(CoreError::Conflict(_)))
    );

    submissions
        .reject(first.submission.id, &reviewer, Some("Add a summary"))
        .await
        .unwrap();

    let second = submissions.submit(draft.id, &owner, None).await.unwrap();
    assert_eq!(second.submission.status, SubmissionStatus::Pending);
    assert_eq!(second.created_version.map(|v| v.version_number), Some(2));

    let history = submissions
        .list_for_draft(draft.id, owner.user_id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.submission.id);
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolved_submission_cannot_be_reviewed_again() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let reviewer = env.reviewer("Rex").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    let submissions = &env.workflow.submissions;
    let receipt = submissions.submit(draft.id, &owner, None).await.unwrap();
    let id = receipt.submission.id;

    submissions.approve(id, &reviewer, None).await.unwrap();

    assert_matches!(
        submissions.approve(id, &reviewer, None).await,
        Err(StoreError::Core(CoreError::InvalidState(_)))
    );
    assert_matches!(
        submissions.reject(id, &reviewer, Some("Too late")).await,
        Err(StoreError::Core(CoreError::InvalidState(_)))
    );
}

#[tokio::test]
async fn approval_without_feedback_gets_default_text() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let reviewer = env.reviewer("Rex").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    let receipt = env
        .workflow
        .submissions
        .submit(draft.id, &owner, None)
        .await
        .unwrap();

    let approved = env
        .workflow
        .submissions
        .approve(receipt.submission.id, &reviewer, Some("   "))
        .await
        .unwrap();
    assert_eq!(
        approved.feedback.as_deref(),
        Some(DEFAULT_APPROVAL_FEEDBACK)
    );
}

#[tokio::test]
async fn rejection_without_feedback_leaves_submission_pending() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let reviewer = env.reviewer("Rex").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    let receipt = env
        .workflow
        .submissions
        .submit(draft.id, &owner, None)
        .await
        .unwrap();
    let id = receipt.submission.id;

    for feedback in [None, Some(""), Some("  \n")] {
        assert_matches!(
            env.workflow
                .submissions
                .reject(id, &reviewer, feedback)
                .await,
            Err(StoreError::Core(CoreError::Validation(_)))
        );
    }
    let stored = env.store.find_submission(id).await.unwrap().unwrap();
    assert_eq!(stored.status, SubmissionStatus::Pending);
    assert_eq!(stored.feedback, None);
}

#[tokio::test]
async fn only_reviewers_review() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    let receipt = env
        .workflow
        .submissions
        .submit(draft.id, &owner, None)
        .await
        .unwrap();

    assert_matches!(
        env.workflow
            .submissions
            .approve(receipt.submission.id, &owner, None)
            .await,
        Err(StoreError::Core(CoreError::Forbidden(_)))
    );
    assert_matches!(
        env.workflow.submissions.list_pending(&owner).await,
        Err(StoreError::Core(CoreError::Forbidden(_)))
    );
}

#[tokio::test]
async fn racing_reviewers_resolve_exactly_once() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let rex = env.reviewer("Rex").await;
    let rae = env.reviewer("Rae").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    let receipt = env
        .workflow
        .submissions
        .submit(draft.id, &owner, None)
        .await
        .unwrap();
    let id = receipt.submission.id;

    let approve = {
        let submissions = env.workflow.submissions.clone();
        tokio::spawn(async move { submissions.approve(id, &rex, Some("Yes")).await })
    };
    let reject = {
        let submissions = env.workflow.submissions.clone();
        tokio::spawn(async move { submissions.reject(id, &rae, Some("No")).await })
    };
    let results = [approve.await.unwrap(), reject.await.unwrap()];

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in &results {
        if let Err(err) = result {
            assert_matches!(err, StoreError::Core(CoreError::InvalidState(_)));
        }
    }

    let stored = env.store.find_submission(id).await.unwrap().unwrap();
    assert!(stored.status.is_terminal());
}

#[tokio::test]
async fn decision_emits_status_changed_event() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let reviewer = env.reviewer("Rex").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    let receipt = env
        .workflow
        .submissions
        .submit(draft.id, &owner, None)
        .await
        .unwrap();
    let mut rx = env.events.subscribe();

    env.workflow
        .submissions
        .reject(receipt.submission.id, &reviewer, Some("Cite sources"))
        .await
        .unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, "submission.status_changed");
    assert_eq!(event.source_entity_id, Some(receipt.submission.id));
    assert_eq!(event.payload["old_status"], "pending");
    assert_eq!(event.payload["new_status"], "rejected");
}

// ---------------------------------------------------------------------------
// Queue, detail and stats
// ---------------------------------------------------------------------------

#[tokio::test]
async fn review_queue_is_enriched() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let reviewer = env.reviewer("Rex").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    env.workflow
        .submissions
        .submit(draft.id, &owner, None)
        .await
        .unwrap();

    let queue = env
        .workflow
        .submissions
        .list_pending(&reviewer)
        .await
        .unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].draft_title, "Ecosystems");
    assert_eq!(queue[0].version_number, Some(1));
    assert_eq!(queue[0].submitter_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn submission_detail_is_hidden_from_strangers() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let reviewer = env.reviewer("Rex").await;
    let stranger = env.author("Cy").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    env.workflow
        .drafts
        .create_version(draft.id, &owner, Some("the text".to_string()))
        .await
        .unwrap();
    let receipt = env
        .workflow
        .submissions
        .submit(draft.id, &owner, None)
        .await
        .unwrap();
    let id = receipt.submission.id;

    let detail = env
        .workflow
        .submissions
        .get_submission(id, &reviewer)
        .await
        .unwrap();
    assert_eq!(detail.draft_title, "Ecosystems");
    assert_eq!(
        detail.version.map(|v| v.content),
        Some("the text".to_string())
    );

    assert!(env
        .workflow
        .submissions
        .get_submission(id, &owner)
        .await
        .is_ok());
    assert_matches!(
        env.workflow.submissions.get_submission(id, &stranger).await,
        Err(StoreError::Core(CoreError::NotFound {
            entity: "Submission",
            ..
        }))
    );
}

#[tokio::test]
async fn stats_count_authors_and_submissions() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let bea = env.author("Bea").await;
    let reviewer = env.reviewer("Rex").await;
    let first = env.draft(&ada, "One").await;
    let second = env.draft(&bea, "Two").await;

    let submissions = &env.workflow.submissions;
    let a = submissions.submit(first.id, &ada, None).await.unwrap();
    submissions.submit(second.id, &bea, None).await.unwrap();
    submissions
        .approve(a.submission.id, &reviewer, None)
        .await
        .unwrap();

    let stats = submissions.stats(&reviewer).await.unwrap();
    assert_eq!(stats.author_count, 2);
    assert_eq!(stats.pending_submissions, 1);
    assert_eq!(stats.approved_submissions, 1);
}

#[tokio::test]
async fn restore_is_blocked_while_submission_is_pending() {
    let env = TestEnv::new();
    let owner = env.author("Ada").await;
    let reviewer = env.reviewer("Rex").await;
    let draft = env.draft(&owner, "Ecosystems").await;
    env.workflow
        .drafts
        .create_version(draft.id, &owner, Some("v1".to_string()))
        .await
        .unwrap();
    let receipt = env
        .workflow
        .submissions
        .submit(draft.id, &owner, None)
        .await
        .unwrap();

    assert_matches!(
        env.workflow
            .drafts
            .restore_version(draft.id, 1, &owner, None)
            .await,
        Err(StoreError::Core(CoreError::Conflict(_)))
    );

    env.workflow
        .submissions
        .approve(receipt.submission.id, &reviewer, None)
        .await
        .unwrap();
    let outcome = env
        .workflow
        .drafts
        .restore_version(draft.id, 1, &owner, None)
        .await
        .unwrap();
    assert_eq!(outcome.deleted_count, 1);

    let kept = env
        .store
        .find_submission(receipt.submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.status, SubmissionStatus::Approved);
    assert_eq!(kept.version_id, None);
}
