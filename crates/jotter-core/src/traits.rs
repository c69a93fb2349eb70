//! Core traits for jotter abstractions.
//!
//! These traits define the seams between the engine and its external
//! collaborators: the generation service and note storage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GenerationError, Result};
use crate::generation::{GenerationOutput, GenerationRequest, ModelKind};
use crate::models::{Category, Note};

// =============================================================================
// GENERATION BACKEND
// =============================================================================

/// Backend for the external text/embedding generation service.
///
/// Implementations hold no state between calls beyond connection pooling,
/// and never retry on their own.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Issue a minimal request to the service.
    ///
    /// Returns `true` only on a successful response. Network failures,
    /// timeouts and non-success statuses all return `false`.
    async fn probe(&self) -> bool;

    /// Send one request without probing first.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationOutput, GenerationError>;

    /// Model name used for the given kind.
    fn model_name(&self, kind: ModelKind) -> &str;

    /// Probe, then send the request.
    ///
    /// A failed probe is reported as `ServiceUnavailable` without sending
    /// the request.
    async fn probe_and_generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationOutput, GenerationError> {
        if !self.probe().await {
            return Err(GenerationError::ServiceUnavailable(
                "liveness probe failed".to_string(),
            ));
        }
        self.generate(request).await
    }
}

// =============================================================================
// NOTE STORE
// =============================================================================

/// Fields supplied when creating a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Partial update of a note; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Category>,
    pub summary: Option<Option<String>>,
}

/// Storage collaborator, scoped by owner.
///
/// Failures (`NoteNotFound`, `Unauthorized`) are passed to callers
/// unmodified; the engine never masks them.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Every note owned by `owner`, newest first.
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Note>>;

    /// Persist a new note and return the stored row.
    async fn create(&self, owner: Uuid, note: NewNote) -> Result<Note>;

    /// Apply an update to an owned note and return the stored row.
    async fn update(&self, owner: Uuid, id: Uuid, update: NoteUpdate) -> Result<Note>;

    /// Delete an owned note.
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<()>;
}
