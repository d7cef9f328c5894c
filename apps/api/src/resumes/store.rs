//! Resume store: pluggable persistence for resume documents.
//!
//! `AppState` holds an `Arc<dyn ResumeStore>`. The Postgres backend lives in
//! `pg_store`; `MemoryResumeStore` keeps everything in process and backs the
//! test suite.
//!
//! Ownership is checked by the caller before any mutation. Store methods
//! that take a `user_id` additionally scope their writes to that user, so a
//! stale ownership check can never touch another user's resumes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{
    NewResume, PublicFilter, PublicPage, PublicResumeSummary, Resume,
};
use crate::resumes::defaults::{default_count, is_first_resume, promotion_candidate};

/// In-place edit run against the locked resume inside `ResumeStore::update`.
pub type ResumeEdit = Box<dyn FnOnce(&mut Resume) -> Result<(), AppError> + Send>;

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Inserts a resume. It becomes the user's default iff the user had none.
    async fn create(&self, new: NewResume) -> Result<Resume, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Resume>, AppError>;

    /// All resumes owned by `user_id`, most recently modified first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError>;

    async fn find_default(&self, user_id: Uuid) -> Result<Option<Resume>, AppError>;

    /// Applies `edit` to the current stored version of the resume while it is
    /// locked, then persists `content`, `template` and `is_public` and touches
    /// `last_modified`. Ownership and the default flag are never written.
    /// An `Err` from `edit` leaves the stored resume unchanged.
    async fn update(&self, user_id: Uuid, id: Uuid, edit: ResumeEdit) -> Result<Resume, AppError>;

    /// Deletes the resume. When it was the default, the most recently
    /// modified remaining resume is promoted in the same transaction.
    /// Returns the id of the promoted resume, if any.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Option<Uuid>, AppError>;

    /// Clears the default flag across the user's resumes and sets it on `id`,
    /// atomically.
    async fn set_default(&self, user_id: Uuid, id: Uuid) -> Result<Resume, AppError>;

    async fn list_public(&self, filter: &PublicFilter) -> Result<PublicPage, AppError>;
}

pub(crate) fn resume_not_found() -> AppError {
    AppError::NotFound("Resume not found".to_string())
}

/// In-process store. A single lock serialises every mutation, which makes
/// each default-affecting operation atomic.
#[derive(Default)]
pub struct MemoryResumeStore {
    resumes: RwLock<HashMap<Uuid, Resume>>,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_recent_first(resumes: &mut [Resume]) {
    resumes.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn create(&self, new: NewResume) -> Result<Resume, AppError> {
        let mut resumes = self.resumes.write().await;
        let existing = resumes
            .values()
            .filter(|r| r.user_id == new.user_id)
            .count();

        let now = Utc::now();
        let resume = Resume {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            content: new.content,
            template: new.template,
            is_public: new.is_public,
            is_default: is_first_resume(existing),
            last_modified: now,
            created_at: now,
            updated_at: now,
        };
        resumes.insert(resume.id, resume.clone());
        Ok(resume)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self.resumes.read().await.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let mut owned: Vec<Resume> = self
            .resumes
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        sort_recent_first(&mut owned);
        Ok(owned)
    }

    async fn find_default(&self, user_id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self
            .resumes
            .read()
            .await
            .values()
            .find(|r| r.user_id == user_id && r.is_default)
            .cloned())
    }

    async fn update(&self, user_id: Uuid, id: Uuid, edit: ResumeEdit) -> Result<Resume, AppError> {
        let mut resumes = self.resumes.write().await;
        let stored = resumes
            .get_mut(&id)
            .filter(|r| r.user_id == user_id)
            .ok_or_else(resume_not_found)?;

        let mut edited = stored.clone();
        edit(&mut edited)?;

        let now = Utc::now();
        stored.content = edited.content;
        stored.template = edited.template;
        stored.is_public = edited.is_public;
        stored.last_modified = now;
        stored.updated_at = now;
        Ok(stored.clone())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Option<Uuid>, AppError> {
        let mut resumes = self.resumes.write().await;
        let was_default = match resumes.get(&id) {
            Some(r) if r.user_id == user_id => r.is_default,
            _ => return Err(resume_not_found()),
        };

        let promoted = if was_default {
            promotion_candidate(resumes.values().filter(|r| r.user_id == user_id), id)
                .map(|r| r.id)
        } else {
            None
        };

        resumes.remove(&id);
        if let Some(promoted_id) = promoted {
            if let Some(r) = resumes.get_mut(&promoted_id) {
                r.is_default = true;
                r.updated_at = Utc::now();
            }
        }
        debug_assert!(default_count(resumes.values().filter(|r| r.user_id == user_id)) <= 1);
        Ok(promoted)
    }

    async fn set_default(&self, user_id: Uuid, id: Uuid) -> Result<Resume, AppError> {
        let mut resumes = self.resumes.write().await;
        if !resumes.get(&id).is_some_and(|r| r.user_id == user_id) {
            return Err(resume_not_found());
        }

        let now = Utc::now();
        for r in resumes.values_mut().filter(|r| r.user_id == user_id) {
            let should_be_default = r.id == id;
            if r.is_default != should_be_default {
                r.is_default = should_be_default;
                r.updated_at = now;
            }
        }
        resumes.get(&id).cloned().ok_or_else(resume_not_found)
    }

    async fn list_public(&self, filter: &PublicFilter) -> Result<PublicPage, AppError> {
        let mut matching: Vec<Resume> = self
            .resumes
            .read()
            .await
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        sort_recent_first(&mut matching);

        let total = matching.len() as u64;
        let items = matching
            .iter()
            .skip(filter.offset() as usize)
            .take(filter.limit as usize)
            .map(PublicResumeSummary::from)
            .collect();
        Ok(PublicPage { items, total })
    }
}
