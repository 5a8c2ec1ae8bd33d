//! Mutation workflows against the notebook backend.
//!
//! Every successful mutation resolves through exactly one reconciling
//! re-fetch of the full source list - server truth replaces local state,
//! never a hand-patched merge. Failures are terminal for the attempt and
//! leave local state unchanged; rename additionally contracts the caller
//! to roll back its optimistically edited display.

use crate::api::types::{Notebook, SourceFile};
use crate::api::{ApiError, NotebookApi};

use super::prefs::PrefsStore;

/// Result type alias using [`WorkflowError`].
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors surfaced by the mutation workflows.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Client-side guard rejected the operation before any network call.
    #[error("{0}")]
    Validation(String),

    /// The backend rejected or never received the request.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WorkflowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        WorkflowError::Validation(msg.into())
    }

    /// Short user-facing message for notification overlays.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Validation(msg) => msg.clone(),
            WorkflowError::Api(err) => err.user_message(),
        }
    }
}

/// A file staged for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Per-file outcome within a batch upload.
#[derive(Debug)]
pub struct UploadOutcome {
    pub name: String,
    pub result: Result<()>,
}

/// Result of a batch upload.
///
/// Batches are best-effort, not atomic: files validate and upload
/// sequentially, one failure does not roll back files the server already
/// accepted.
#[derive(Debug)]
pub struct BatchUploadReport {
    pub outcomes: Vec<UploadOutcome>,
    /// Fresh list from the single reconciling re-fetch, present when at
    /// least one file was accepted.
    pub refreshed: Option<Vec<SourceFile>>,
}

impl BatchUploadReport {
    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes.len() - self.accepted_count()
    }
}

/// Outcome of a rename commit.
#[derive(Debug)]
pub enum RenameOutcome {
    /// Commit skipped - empty or unchanged name is treated as a cancel,
    /// with zero network calls.
    Skipped,
    /// Rename confirmed; fresh list from the reconciling re-fetch.
    Renamed(Vec<SourceFile>),
}

/// Reconciling re-fetch: full reload of a notebook's source list, used
/// after every mutation instead of incremental local patching.
pub async fn refetch_sources<A: NotebookApi + ?Sized>(
    api: &A,
    notebook_id: i64,
) -> std::result::Result<Vec<SourceFile>, ApiError> {
    let notebook = api.get_notebook(notebook_id).await?;
    Ok(notebook.sources)
}

/// Duplicate-name pre-check: case-sensitive exact match against the
/// current list. A purely local guard - the server may still reject
/// independently (e.g. a race with a concurrent session).
fn validate_upload_name(name: &str, existing_names: &[String]) -> Result<()> {
    if existing_names.iter().any(|existing| existing == name) {
        return Err(WorkflowError::validation(format!(
            "A source named \"{name}\" already exists in this notebook."
        )));
    }
    Ok(())
}

/// Upload one file: duplicate-name guard, multipart POST, re-fetch.
pub async fn upload_source<A: NotebookApi + ?Sized>(
    api: &A,
    notebook_id: i64,
    existing_names: &[String],
    file: UploadFile,
) -> Result<Vec<SourceFile>> {
    validate_upload_name(&file.name, existing_names)?;
    api.upload_source(notebook_id, &file.name, file.bytes).await?;
    Ok(refetch_sources(api, notebook_id).await?)
}

/// Upload a batch of files sequentially, each independently validated
/// (against the pre-existing names plus names accepted earlier in the
/// batch), followed by a single reconciling re-fetch when anything was
/// accepted.
///
/// Returns `Err` only when that final re-fetch fails; per-file failures
/// are reported in the outcomes.
pub async fn upload_batch<A: NotebookApi + ?Sized>(
    api: &A,
    notebook_id: i64,
    existing_names: &[String],
    files: Vec<UploadFile>,
) -> Result<BatchUploadReport> {
    let mut known_names = existing_names.to_vec();
    let mut outcomes = Vec::with_capacity(files.len());
    let mut any_accepted = false;

    for file in files {
        let name = file.name.clone();
        let result = match validate_upload_name(&name, &known_names) {
            Ok(()) => match api.upload_source(notebook_id, &name, file.bytes).await {
                Ok(()) => {
                    known_names.push(name.clone());
                    any_accepted = true;
                    Ok(())
                }
                Err(err) => Err(err.into()),
            },
            Err(err) => Err(err),
        };
        outcomes.push(UploadOutcome { name, result });
    }

    let refreshed = if any_accepted {
        Some(refetch_sources(api, notebook_id).await?)
    } else {
        None
    };

    Ok(BatchUploadReport {
        outcomes,
        refreshed,
    })
}

/// Delete a source, then re-fetch. Confirmation happens in the UI layer
/// before this is called.
pub async fn delete_source<A: NotebookApi + ?Sized>(
    api: &A,
    notebook_id: i64,
    name: &str,
) -> Result<Vec<SourceFile>> {
    api.delete_source(notebook_id, name).await?;
    Ok(refetch_sources(api, notebook_id).await?)
}

/// Commit a rename.
///
/// The no-op guard treats an empty (after trimming) or unchanged name as
/// a cancel: no request is issued. On failure the caller must restore the
/// displayed name to `old_name` - rename is the one workflow that edits
/// its display before server confirmation.
pub async fn rename_source<A: NotebookApi + ?Sized>(
    api: &A,
    notebook_id: i64,
    old_name: &str,
    new_name: &str,
) -> Result<RenameOutcome> {
    let new_name = new_name.trim();
    if new_name.is_empty() || new_name == old_name {
        return Ok(RenameOutcome::Skipped);
    }

    api.rename_source(notebook_id, old_name, new_name).await?;
    let fresh = refetch_sources(api, notebook_id).await?;
    Ok(RenameOutcome::Renamed(fresh))
}

// ── Notebook CRUD ───────────────────────────────────────────────────────

/// Build a new notebook record the way the backend expects it: a
/// client-generated epoch-millis id, a display date, and no sources.
pub fn new_notebook(title: &str) -> Notebook {
    Notebook {
        id: chrono::Utc::now().timestamp_millis(),
        title: title.trim().to_string(),
        date: chrono::Local::now().format("%b %-d, %Y").to_string(),
        sources: Vec::new(),
        category: None,
        description: None,
    }
}

/// Create a notebook. The created record echoed by the server is returned
/// for insertion at the head of the local list.
pub async fn create_notebook<A: NotebookApi + ?Sized>(api: &A, title: &str) -> Result<Notebook> {
    if title.trim().is_empty() {
        return Err(WorkflowError::validation("Notebook title cannot be empty."));
    }
    Ok(api.create_notebook(&new_notebook(title)).await?)
}

/// Delete a notebook and drop its locally persisted chat transcript.
pub async fn delete_notebook<A: NotebookApi + ?Sized>(
    api: &A,
    prefs: &PrefsStore,
    id: i64,
) -> Result<()> {
    api.delete_notebook(id).await?;
    if let Err(e) = prefs.remove_chat(id) {
        log::warn!("Failed to remove chat transcript for notebook {id}: {e}");
    }
    Ok(())
}
