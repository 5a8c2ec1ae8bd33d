//! Workflow tests against a mocked backend.
//!
//! The mock also enforces call counts, so these pin the contract that
//! every successful mutation triggers exactly one reconciling re-fetch
//! and that client-side guards issue zero network calls.

use crate::api::types::{Notebook, SourceFile};
use crate::api::MockNotebookApi;
use crate::core::prefs::PrefsStore;
use crate::core::workflow::{self, RenameOutcome, UploadFile, WorkflowError};

fn wire(name: &str, size: u64) -> SourceFile {
    SourceFile {
        name: name.to_string(),
        path: None,
        size,
        content_type: None,
    }
}

fn notebook_with(sources: Vec<SourceFile>) -> Notebook {
    Notebook {
        id: 1,
        title: "Curriculum".to_string(),
        date: "Aug 29, 2026".to_string(),
        sources,
        category: None,
        description: None,
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_duplicate_upload_rejected_without_network_call() {
    // No expectations: any API call would panic the mock.
    let api = MockNotebookApi::new();
    let existing = names(&["syllabus.pdf"]);

    let result = workflow::upload_source(
        &api,
        1,
        &existing,
        UploadFile {
            name: "syllabus.pdf".to_string(),
            bytes: vec![1, 2, 3],
        },
    )
    .await;

    match result {
        Err(WorkflowError::Validation(msg)) => assert!(msg.contains("syllabus.pdf")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_triggers_exactly_one_refetch() {
    let mut api = MockNotebookApi::new();
    api.expect_upload_source()
        .withf(|id, name, bytes| *id == 1 && name == "notes.pdf" && !bytes.is_empty())
        .times(1)
        .returning(|_, _, _| Ok(()));
    api.expect_get_notebook()
        .times(1)
        .returning(|_| Ok(notebook_with(vec![wire("notes.pdf", 3)])));

    let fresh = workflow::upload_source(
        &api,
        1,
        &[],
        UploadFile {
            name: "notes.pdf".to_string(),
            bytes: vec![1, 2, 3],
        },
    )
    .await
    .unwrap();

    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].name, "notes.pdf");
}

#[tokio::test]
async fn test_batch_is_best_effort_with_single_refetch() {
    let mut api = MockNotebookApi::new();
    // Only the two distinct names reach the server.
    api.expect_upload_source()
        .times(2)
        .returning(|_, _, _| Ok(()));
    api.expect_get_notebook()
        .times(1)
        .returning(|_| Ok(notebook_with(vec![wire("a.pdf", 1), wire("b.pdf", 1)])));

    let files = vec![
        UploadFile {
            name: "a.pdf".to_string(),
            bytes: vec![1],
        },
        // Duplicates the first file within the same batch.
        UploadFile {
            name: "a.pdf".to_string(),
            bytes: vec![2],
        },
        UploadFile {
            name: "b.pdf".to_string(),
            bytes: vec![3],
        },
    ];
    let report = workflow::upload_batch(&api, 1, &[], files).await.unwrap();

    assert_eq!(report.accepted_count(), 2);
    assert_eq!(report.rejected_count(), 1);
    assert!(report.outcomes[1].result.is_err());
    assert_eq!(report.refreshed.unwrap().len(), 2);
}

#[tokio::test]
async fn test_batch_all_rejected_skips_refetch() {
    // No get_notebook expectation: a re-fetch would panic the mock.
    let api = MockNotebookApi::new();
    let existing = names(&["a.pdf"]);

    let report = workflow::upload_batch(
        &api,
        1,
        &existing,
        vec![UploadFile {
            name: "a.pdf".to_string(),
            bytes: vec![1],
        }],
    )
    .await
    .unwrap();

    assert_eq!(report.accepted_count(), 0);
    assert!(report.refreshed.is_none());
}

#[tokio::test]
async fn test_delete_triggers_exactly_one_refetch() {
    let mut api = MockNotebookApi::new();
    api.expect_delete_source()
        .withf(|id, name| *id == 1 && name == "old.pdf")
        .times(1)
        .returning(|_, _| Ok(()));
    api.expect_get_notebook()
        .times(1)
        .returning(|_| Ok(notebook_with(vec![])));

    let fresh = workflow::delete_source(&api, 1, "old.pdf").await.unwrap();
    assert!(fresh.is_empty());
}

#[tokio::test]
async fn test_rename_noop_issues_no_request() {
    let api = MockNotebookApi::new();

    let unchanged = workflow::rename_source(&api, 1, "a.pdf", "a.pdf").await.unwrap();
    assert!(matches!(unchanged, RenameOutcome::Skipped));

    let empty = workflow::rename_source(&api, 1, "a.pdf", "   ").await.unwrap();
    assert!(matches!(empty, RenameOutcome::Skipped));
}

#[tokio::test]
async fn test_rename_commits_and_refetches_once() {
    let mut api = MockNotebookApi::new();
    api.expect_rename_source()
        .withf(|id, old, new| *id == 1 && old == "a.pdf" && new == "plan.pdf")
        .times(1)
        .returning(|_, _, _| Ok(()));
    api.expect_get_notebook()
        .times(1)
        .returning(|_| Ok(notebook_with(vec![wire("plan.pdf", 9)])));

    // Trailing whitespace is trimmed before the commit.
    let outcome = workflow::rename_source(&api, 1, "a.pdf", " plan.pdf ").await.unwrap();
    match outcome {
        RenameOutcome::Renamed(fresh) => assert_eq!(fresh[0].name, "plan.pdf"),
        RenameOutcome::Skipped => panic!("expected a committed rename"),
    }
}

#[tokio::test]
async fn test_create_notebook_rejects_empty_title() {
    let api = MockNotebookApi::new();
    let result = workflow::create_notebook(&api, "   ").await;
    assert!(matches!(result, Err(WorkflowError::Validation(_))));
}

#[tokio::test]
async fn test_delete_notebook_drops_transcript() {
    let tmp = tempfile::tempdir().unwrap();
    let prefs = PrefsStore::open(tmp.path());
    let mut transcript = crate::core::chat::Transcript::new();
    transcript.push_user("keep this?");
    prefs.save_chat(42, &transcript).unwrap();

    let mut api = MockNotebookApi::new();
    api.expect_delete_notebook()
        .withf(|id| *id == 42)
        .times(1)
        .returning(|_| Ok(()));

    workflow::delete_notebook(&api, &prefs, 42).await.unwrap();
    assert!(prefs.load_chat(42).is_none());
}
