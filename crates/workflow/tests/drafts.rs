mod common;

use assert_matches::assert_matches;
use common::TestEnv;
use inkwell_core::error::CoreError;
use inkwell_db::models::draft::UpdateDraft;
use inkwell_db::StoreError;

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn only_onboarded_authors_create_drafts() {
    let env = TestEnv::new();
    let author = env.author("Ada").await;
    let reviewer = env.reviewer("Rex").await;
    let fresh = env.unassigned("fresh@example.com").await;
    let drafts = &env.workflow.drafts;

    let draft = drafts
        .create_draft(&author, "  Plate tectonics ")
        .await
        .unwrap();
    assert_eq!(draft.title, "Plate tectonics");
    assert_eq!(draft.owner_id, author.user_id);
    assert!(draft.content.is_empty());
    assert_eq!(
        drafts
            .latest_version_number(draft.id, author.user_id)
            .await
            .unwrap(),
        None
    );

    assert_matches!(
        drafts.create_draft(&reviewer, "Nope").await,
        Err(StoreError::Core(CoreError::Forbidden(_)))
    );
    assert_matches!(
        drafts.create_draft(&fresh, "Nope").await,
        Err(StoreError::Core(CoreError::Forbidden(msg))) if msg.contains("Profile setup")
    );
}

#[tokio::test]
async fn owned_and_shared_lists_are_separate() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let bea = env.author("Bea").await;
    let mine = env.draft(&ada, "Mine").await;
    let theirs = env.draft(&bea, "Theirs").await;
    env.workflow
        .access
        .grant(theirs.id, &bea, ada.user_id)
        .await
        .unwrap();

    let owned = env.workflow.drafts.list_owned(ada.user_id).await.unwrap();
    let shared = env.workflow.drafts.list_shared(ada.user_id).await.unwrap();
    assert_eq!(
        owned.iter().map(|d| d.id).collect::<Vec<_>>(),
        vec![mine.id]
    );
    assert_eq!(
        shared.iter().map(|d| d.id).collect::<Vec<_>>(),
        vec![theirs.id]
    );
}

#[tokio::test]
async fn collaborators_edit_and_strangers_see_nothing() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let bea = env.author("Bea").await;
    let cy = env.author("Cy").await;
    let draft = env.draft(&ada, "Shared").await;
    env.workflow
        .access
        .grant(draft.id, &ada, bea.user_id)
        .await
        .unwrap();

    let updated = env
        .workflow
        .drafts
        .update_draft(
            draft.id,
            &bea,
            UpdateDraft {
                content: Some("Bea was here".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.content, "Bea was here");
    assert_eq!(updated.title, "Shared");

    assert_matches!(
        env.workflow.drafts.get_draft(draft.id, cy.user_id).await,
        Err(StoreError::Core(CoreError::NotFound {
            entity: "Draft",
            ..
        }))
    );
    assert_matches!(
        env.workflow
            .drafts
            .update_draft(draft.id, &cy, UpdateDraft::default())
            .await,
        Err(StoreError::Core(CoreError::NotFound { .. }))
    );
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sequential_versions_are_one_to_n() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let draft = env.draft(&ada, "History").await;
    let drafts = &env.workflow.drafts;

    for n in 1..=5 {
        let version = drafts
            .create_version(draft.id, &ada, Some(format!("rev {n}")))
            .await
            .unwrap();
        assert_eq!(version.version_number, n);
        assert_eq!(version.created_by, Some(ada.user_id));
    }
    assert_eq!(
        drafts
            .latest_version_number(draft.id, ada.user_id)
            .await
            .unwrap(),
        Some(5)
    );

    let history = drafts.list_versions(draft.id, ada.user_id).await.unwrap();
    let numbers: Vec<_> = history.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![5, 4, 3, 2, 1]);

    let third = drafts.get_version(draft.id, 3, ada.user_id).await.unwrap();
    assert_eq!(third.content, "rev 3");
}

#[tokio::test]
async fn concurrent_checkpoints_never_share_a_number() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let bea = env.author("Bea").await;
    let draft = env.draft(&ada, "Busy").await;
    env.workflow
        .access
        .grant(draft.id, &ada, bea.user_id)
        .await
        .unwrap();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let drafts = env.workflow.drafts.clone();
            let editor = if i % 2 == 0 { ada.clone() } else { bea.clone() };
            let draft_id = draft.id;
            tokio::spawn(async move {
                drafts
                    .create_version(draft_id, &editor, Some(format!("edit {i}")))
                    .await
                    .unwrap()
                    .version_number
            })
        })
        .collect();

    let mut numbers: Vec<i32> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn checkpoint_without_content_snapshots_live_text() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let draft = env.draft(&ada, "Live").await;
    env.workflow
        .drafts
        .update_draft(
            draft.id,
            &ada,
            UpdateDraft {
                content: Some("typed live".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let version = env
        .workflow
        .drafts
        .create_version(draft.id, &ada, None)
        .await
        .unwrap();
    assert_eq!(version.content, "typed live");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn contentless_checkpoints_never_revert_concurrent_edits() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let draft = env.draft(&ada, "Live").await;
    let draft_id = draft.id;

    let editor = {
        let drafts = env.workflow.drafts.clone();
        let ada = ada.clone();
        tokio::spawn(async move {
            for i in 0..50 {
                drafts
                    .update_draft(
                        draft_id,
                        &ada,
                        UpdateDraft {
                            content: Some(format!("edit {i}")),
                            ..Default::default()
                        },
                    )
                    .await
                    .unwrap();
                tokio::task::yield_now().await;
            }
        })
    };
    let checkpointer = {
        let drafts = env.workflow.drafts.clone();
        let ada = ada.clone();
        tokio::spawn(async move {
            let mut snapshots = Vec::new();
            for _ in 0..50 {
                let version = drafts.create_version(draft_id, &ada, None).await.unwrap();
                snapshots.push(version.content);
                tokio::task::yield_now().await;
            }
            snapshots
        })
    };

    editor.await.unwrap();
    let snapshots = checkpointer.await.unwrap();

    let live = env
        .workflow
        .drafts
        .get_draft(draft_id, ada.user_id)
        .await
        .unwrap();
    assert_eq!(live.content, "edit 49");
    assert!(snapshots
        .iter()
        .all(|s| s.is_empty() || s.starts_with("edit ")));
}

#[tokio::test]
async fn checkpoint_sets_live_content() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let draft = env.draft(&ada, "Live").await;

    env.workflow
        .drafts
        .create_version(draft.id, &ada, Some("snapshot".to_string()))
        .await
        .unwrap();
    let live = env
        .workflow
        .drafts
        .get_draft(draft.id, ada.user_id)
        .await
        .unwrap();
    assert_eq!(live.content, "snapshot");
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

#[tokio::test]
async fn restore_to_first_of_three_deletes_two() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let draft = env.draft(&ada, "Restore").await;
    let drafts = &env.workflow.drafts;
    for text in ["v1 text", "v2 text", "v3 text"] {
        drafts
            .create_version(draft.id, &ada, Some(text.to_string()))
            .await
            .unwrap();
    }

    let plan = drafts
        .preview_restore(draft.id, 1, ada.user_id)
        .await
        .unwrap();
    assert_eq!(plan.deleted_count, 2);

    let outcome = drafts
        .restore_version(draft.id, 1, &ada, Some(plan.deleted_count))
        .await
        .unwrap();
    assert_eq!(outcome.deleted_count, 2);
    assert_eq!(outcome.draft.content, "v1 text");

    let remaining: Vec<_> = drafts
        .list_versions(draft.id, ada.user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.version_number)
        .collect();
    assert_eq!(remaining, vec![1]);

    let next = drafts.create_version(draft.id, &ada, None).await.unwrap();
    assert_eq!(next.version_number, 2);
}

#[tokio::test]
async fn restore_postconditions_hold_for_every_target() {
    for n in 1..=5 {
        for k in 1..=n {
            let env = TestEnv::new();
            let ada = env.author("Ada").await;
            let draft = env.draft(&ada, "Prop").await;
            for i in 1..=n {
                env.workflow
                    .drafts
                    .create_version(draft.id, &ada, Some(format!("content {i}")))
                    .await
                    .unwrap();
            }

            let outcome = env
                .workflow
                .drafts
                .restore_version(draft.id, k, &ada, None)
                .await
                .unwrap();
            assert_eq!(outcome.deleted_count, i64::from(n - k));
            assert_eq!(outcome.draft.content, format!("content {k}"));

            let mut numbers: Vec<_> = env
                .workflow
                .drafts
                .list_versions(draft.id, ada.user_id)
                .await
                .unwrap()
                .into_iter()
                .map(|v| v.version_number)
                .collect();
            numbers.sort_unstable();
            assert_eq!(numbers, (1..=k).collect::<Vec<_>>());
        }
    }
}

#[tokio::test]
async fn stale_confirmation_is_rejected() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let draft = env.draft(&ada, "Stale").await;
    let drafts = &env.workflow.drafts;
    for _ in 0..2 {
        drafts.create_version(draft.id, &ada, None).await.unwrap();
    }
    let plan = drafts
        .preview_restore(draft.id, 1, ada.user_id)
        .await
        .unwrap();
    assert_eq!(plan.deleted_count, 1);

    // Someone checkpoints between preview and confirm.
    drafts.create_version(draft.id, &ada, None).await.unwrap();

    assert_matches!(
        drafts
            .restore_version(draft.id, 1, &ada, Some(plan.deleted_count))
            .await,
        Err(StoreError::Core(CoreError::Conflict(_)))
    );
    assert_eq!(
        drafts
            .latest_version_number(draft.id, ada.user_id)
            .await
            .unwrap(),
        Some(3)
    );
}

#[tokio::test]
async fn restore_to_missing_version_is_not_found() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let draft = env.draft(&ada, "Missing").await;
    env.workflow
        .drafts
        .create_version(draft.id, &ada, None)
        .await
        .unwrap();

    assert_matches!(
        env.workflow
            .drafts
            .restore_version(draft.id, 4, &ada, None)
            .await,
        Err(StoreError::Core(CoreError::NotFound {
            entity: "DraftVersion",
            ..
        }))
    );
    assert_matches!(
        env.workflow
            .drafts
            .preview_restore(draft.id, 0, ada.user_id)
            .await,
        Err(StoreError::Core(CoreError::Validation(_)))
    );
}

#[tokio::test]
async fn restore_emits_event_with_deleted_count() {
    let env = TestEnv::new();
    let ada = env.author("Ada").await;
    let draft = env.draft(&ada, "Events").await;
    for _ in 0..3 {
        env.workflow
            .drafts
            .create_version(draft.id, &ada, None)
            .await
            .unwrap();
    }
    let mut rx = env.events.subscribe();

    env.workflow
        .drafts
        .restore_version(draft.id, 2, &ada, None)
        .await
        .unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, "draft.restored");
    assert_eq!(event.payload["deleted_count"], 1);
}
