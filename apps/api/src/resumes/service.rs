//! Resume operations: ownership gate, validation, then the store.
//!
//! Every function takes the caller explicitly; nothing here reads identity
//! from ambient request state.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::models::resume::{
    AwardEntry, CertificationEntry, EducationEntry, ExperienceEntry, LanguageEntry, NewResume,
    PersonalInfo, ProjectEntry, PublicFilter, PublicPage, Resume, ResumeContent, SkillEntry,
    VolunteerEntry,
};
use crate::resumes::access::{ensure_owner, ensure_readable};
use crate::resumes::store::{resume_not_found, ResumeStore};
use crate::resumes::validation::{normalize_template, sanitize_content, validate_content};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Body of `POST /`. `userId` and `isDefault` are never taken from the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResumeRequest {
    #[serde(flatten)]
    pub content: ResumeContent,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Body of `PUT /:id`. Present fields replace the stored value; absent
/// fields are kept.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateResumeRequest {
    pub personal_info: Option<PersonalInfo>,
    pub education: Option<Vec<EducationEntry>>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub skills: Option<Vec<SkillEntry>>,
    pub projects: Option<Vec<ProjectEntry>>,
    pub certifications: Option<Vec<CertificationEntry>>,
    pub languages: Option<Vec<LanguageEntry>>,
    pub volunteer: Option<Vec<VolunteerEntry>>,
    pub awards: Option<Vec<AwardEntry>>,
    pub template: Option<String>,
    pub is_public: Option<bool>,
}

impl UpdateResumeRequest {
    fn apply_to(self, resume: &mut Resume) {
        let c = &mut resume.content;
        if let Some(v) = self.personal_info {
            c.personal_info = v;
        }
        if let Some(v) = self.education {
            c.education = v;
        }
        if let Some(v) = self.experience {
            c.experience = v;
        }
        if let Some(v) = self.skills {
            c.skills = v;
        }
        if let Some(v) = self.projects {
            c.projects = v;
        }
        if let Some(v) = self.certifications {
            c.certifications = v;
        }
        if let Some(v) = self.languages {
            c.languages = v;
        }
        if let Some(v) = self.volunteer {
            c.volunteer = v;
        }
        if let Some(v) = self.awards {
            c.awards = v;
        }
        if self.template.is_some() {
            resume.template = normalize_template(self.template);
        }
        if let Some(v) = self.is_public {
            resume.is_public = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub template: Option<String>,
    pub search: Option<String>,
}

impl PublicQuery {
    pub fn into_filter(self) -> PublicFilter {
        let non_blank = |s: Option<String>| {
            s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };
        PublicFilter {
            page: self.page.unwrap_or(1).max(1),
            limit: self
                .limit
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .clamp(1, MAX_PAGE_LIMIT),
            template: non_blank(self.template),
            search: non_blank(self.search),
        }
    }
}

async fn load(store: &dyn ResumeStore, id: Uuid) -> Result<Resume, AppError> {
    store.get(id).await?.ok_or_else(resume_not_found)
}

pub async fn create_resume(
    store: &dyn ResumeStore,
    caller: Caller,
    req: CreateResumeRequest,
) -> Result<Resume, AppError> {
    let CreateResumeRequest {
        mut content,
        template,
        is_public,
    } = req;
    sanitize_content(&mut content);
    validate_content(&content)?;

    let resume = store
        .create(NewResume {
            user_id: caller.user_id,
            content,
            template: normalize_template(template),
            is_public,
        })
        .await?;

    info!(
        "Created resume {} for user {} (default: {})",
        resume.id, caller.user_id, resume.is_default
    );
    Ok(resume)
}

pub async fn list_resumes(store: &dyn ResumeStore, caller: Caller) -> Result<Vec<Resume>, AppError> {
    store.list_for_user(caller.user_id).await
}

pub async fn get_default_resume(store: &dyn ResumeStore, caller: Caller) -> Result<Resume, AppError> {
    store
        .find_default(caller.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No default resume found".to_string()))
}

pub async fn get_resume(store: &dyn ResumeStore, caller: Caller, id: Uuid) -> Result<Resume, AppError> {
    let resume = load(store, id).await?;
    ensure_readable(&resume, &caller)?;
    Ok(resume)
}

pub async fn update_resume(
    store: &dyn ResumeStore,
    caller: Caller,
    id: Uuid,
    req: UpdateResumeRequest,
) -> Result<Resume, AppError> {
    let resume = load(store, id).await?;
    ensure_owner(&resume, &caller)?;

    // Only the sections present in `req` are replaced, on top of whatever is
    // stored when the row lock is taken.
    let saved = store
        .update(
            caller.user_id,
            id,
            Box::new(move |resume: &mut Resume| {
                req.apply_to(resume);
                sanitize_content(&mut resume.content);
                validate_content(&resume.content)
            }),
        )
        .await?;
    info!("Updated resume {id} for user {}", caller.user_id);
    Ok(saved)
}

/// Deletes a resume, promoting a replacement default when needed.
/// Returns the id of the promoted resume.
pub async fn delete_resume(
    store: &dyn ResumeStore,
    caller: Caller,
    id: Uuid,
) -> Result<Option<Uuid>, AppError> {
    let resume = load(store, id).await?;
    ensure_owner(&resume, &caller)?;

    let promoted = store.delete(caller.user_id, id).await?;
    info!("Deleted resume {id} for user {}", caller.user_id);
    Ok(promoted)
}

pub async fn set_default_resume(
    store: &dyn ResumeStore,
    caller: Caller,
    id: Uuid,
) -> Result<Resume, AppError> {
    let resume = load(store, id).await?;
    ensure_owner(&resume, &caller)?;

    let resume = store.set_default(caller.user_id, id).await?;
    info!("Resume {id} is now the default for user {}", caller.user_id);
    Ok(resume)
}

/// Copies the content of an owned resume into a new private, non-default one.
pub async fn duplicate_resume(
    store: &dyn ResumeStore,
    caller: Caller,
    id: Uuid,
) -> Result<Resume, AppError> {
    let original = load(store, id).await?;
    ensure_owner(&original, &caller)?;

    let copy = store
        .create(NewResume {
            user_id: caller.user_id,
            content: original.content,
            template: original.template,
            is_public: false,
        })
        .await?;

    info!("Duplicated resume {id} as {}", copy.id);
    Ok(copy)
}

pub async fn public_resumes(
    store: &dyn ResumeStore,
    filter: &PublicFilter,
) -> Result<PublicPage, AppError> {
    store.list_public(filter).await
}
