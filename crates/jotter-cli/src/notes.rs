//! JSON note files.
//!
//! A note file is a JSON array of notes. Only `title` is required; a missing
//! id gets a fresh UUID, missing timestamps default to the load time and a
//! missing owner is the nil UUID.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use jotter_core::{Category, InMemoryNoteStore, Note, NoteStore};

#[derive(Debug, Deserialize)]
struct NoteRecord {
    #[serde(default)]
    id: Option<Uuid>,
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    user_id: Option<Uuid>,
    #[serde(default)]
    summary: Option<String>,
}

impl NoteRecord {
    fn into_note(self, now: DateTime<Utc>) -> Note {
        let created_at = self.created_at.unwrap_or(now);
        Note {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            title: self.title,
            content: self.content,
            category: self.category,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
            user_id: self.user_id.unwrap_or_else(Uuid::nil),
            summary: self.summary,
        }
    }
}

/// Parse a JSON array of notes.
pub fn parse_notes(json: &str) -> Result<Vec<Note>> {
    let records: Vec<NoteRecord> =
        serde_json::from_str(json).context("note file is not a JSON array of notes")?;
    let now = Utc::now();
    Ok(records.into_iter().map(|r| r.into_note(now)).collect())
}

/// Load `owner`'s notes from `path`, newest first.
pub async fn load_notes(path: &Path, owner: Uuid) -> Result<Vec<Note>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read note file {}", path.display()))?;
    let store = InMemoryNoteStore::with_notes(parse_notes(&json)?);
    Ok(store.list_for_owner(owner).await?)
}
