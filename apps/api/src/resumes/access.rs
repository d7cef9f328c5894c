//! Ownership gate.

use tracing::warn;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::models::resume::Resume;

pub fn is_owner(resume: &Resume, caller: &Caller) -> bool {
    resume.user_id == caller.user_id
}

/// Mutations and duplication are owner-only.
pub fn ensure_owner(resume: &Resume, caller: &Caller) -> Result<(), AppError> {
    if is_owner(resume, caller) {
        return Ok(());
    }
    warn!(
        "User {} denied write access to resume {}",
        caller.user_id, resume.id
    );
    Err(AppError::Forbidden)
}

/// Reads are allowed for the owner, or for anyone when the resume is public.
pub fn ensure_readable(resume: &Resume, caller: &Caller) -> Result<(), AppError> {
    if is_owner(resume, caller) || resume.is_public {
        return Ok(());
    }
    warn!(
        "User {} denied read access to private resume {}",
        caller.user_id, resume.id
    );
    Err(AppError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeContent;
    use chrono::Utc;
    use uuid::Uuid;

    fn resume_owned_by(user_id: Uuid, is_public: bool) -> Resume {
        let now = Utc::now();
        Resume {
            id: Uuid::new_v4(),
            user_id,
            content: ResumeContent::default(),
            template: "modern".to_string(),
            is_public,
            is_default: false,
            last_modified: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_passes_both_gates() {
        let owner = Caller::new(Uuid::new_v4());
        let resume = resume_owned_by(owner.user_id, false);
        assert!(ensure_owner(&resume, &owner).is_ok());
        assert!(ensure_readable(&resume, &owner).is_ok());
    }

    #[test]
    fn stranger_cannot_touch_private_resume() {
        let stranger = Caller::new(Uuid::new_v4());
        let resume = resume_owned_by(Uuid::new_v4(), false);
        assert!(matches!(
            ensure_owner(&resume, &stranger),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            ensure_readable(&resume, &stranger),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn public_flag_opens_reads_only() {
        let stranger = Caller::new(Uuid::new_v4());
        let resume = resume_owned_by(Uuid::new_v4(), true);
        assert!(ensure_readable(&resume, &stranger).is_ok());
        assert!(ensure_owner(&resume, &stranger).is_err());
    }
}
