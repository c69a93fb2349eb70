//! In-memory [`NoteStore`] used by tests and the CLI's JSON note files.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::Note;
use crate::traits::{NewNote, NoteStore, NoteUpdate};

/// Owner-scoped note storage held in a map.
#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    notes: RwLock<HashMap<Uuid, Note>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing rows (e.g. loaded from a file).
    pub fn with_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        Self {
            notes: RwLock::new(notes.into_iter().map(|n| (n.id, n)).collect()),
        }
    }

    /// Look up the note and check ownership.
    fn owned_mut<'a>(
        notes: &'a mut HashMap<Uuid, Note>,
        owner: Uuid,
        id: Uuid,
    ) -> Result<&'a mut Note> {
        let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
        if note.user_id != owner {
            return Err(Error::Unauthorized(format!(
                "note {} is not owned by {}",
                id, owner
            )));
        }
        Ok(note)
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut owned: Vec<Note> = notes
            .values()
            .filter(|n| n.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn create(&self, owner: Uuid, note: NewNote) -> Result<Note> {
        let now = Utc::now();
        let stored = Note {
            id: Uuid::new_v4(),
            title: note.title,
            content: note.content,
            category: note.category,
            created_at: now,
            updated_at: now,
            user_id: owner,
            summary: note.summary,
        };
        debug!(note_id = %stored.id, "Created note");
        self.notes.write().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, owner: Uuid, id: Uuid, update: NoteUpdate) -> Result<Note> {
        let mut notes = self.notes.write().await;
        let note = Self::owned_mut(&mut notes, owner, id)?;
        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        if let Some(category) = update.category {
            note.category = category;
        }
        if let Some(summary) = update.summary {
            note.summary = summary;
        }
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<()> {
        let mut notes = self.notes.write().await;
        Self::owned_mut(&mut notes, owner, id)?;
        notes.remove(&id);
        debug!(note_id = %id, "Deleted note");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Duration;

    fn new_note(title: &str) -> NewNote {
        NewNote {
            title: title.to_string(),
            content: "content".to_string(),
            category: Category::Work,
            summary: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let store = InMemoryNoteStore::new();
        let owner = Uuid::new_v4();
        let created = store.create(owner, new_note("first")).await.unwrap();
        assert_eq!(created.user_id, owner);
        assert_eq!(created.created_at, created.updated_at);

        let notes = store.list_for_owner(owner).await.unwrap();
        assert_eq!(notes, vec![created]);
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped_and_newest_first() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let now = Utc::now();
        let make = |title: &str, user_id: Uuid, age_days: i64| Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: String::new(),
            category: Category::Other,
            created_at: now - Duration::days(age_days),
            updated_at: now,
            user_id,
            summary: None,
        };
        let store = InMemoryNoteStore::with_notes(vec![
            make("old", owner, 5),
            make("foreign", other, 0),
            make("new", owner, 1),
        ]);

        let titles: Vec<String> = store
            .list_for_owner(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_update_applies_fields() {
        let store = InMemoryNoteStore::new();
        let owner = Uuid::new_v4();
        let created = store.create(owner, new_note("draft")).await.unwrap();

        let updated = store
            .update(
                owner,
                created.id,
                NoteUpdate {
                    title: Some("final".to_string()),
                    summary: Some(Some("short".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "final");
        assert_eq!(updated.content, "content");
        assert_eq!(updated.summary.as_deref(), Some("short"));
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_note_is_not_found() {
        let store = InMemoryNoteStore::new();
        let id = Uuid::new_v4();
        let err = store
            .update(Uuid::new_v4(), id, NoteUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_foreign_update_and_delete_are_unauthorized() {
        let store = InMemoryNoteStore::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let created = store.create(owner, new_note("mine")).await.unwrap();

        let err = store
            .update(intruder, created.id, NoteUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        let err = store.delete(intruder, created.id).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
        assert_eq!(store.list_for_owner(owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryNoteStore::new();
        let owner = Uuid::new_v4();
        let created = store.create(owner, new_note("gone")).await.unwrap();
        store.delete(owner, created.id).await.unwrap();
        assert!(store.list_for_owner(owner).await.unwrap().is_empty());

        let err = store.delete(owner, created.id).await.unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(_)));
    }
}
