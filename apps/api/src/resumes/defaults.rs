//! Default-resume invariant: at most one resume per user carries
//! `is_default`, and a user's first resume always does.
//!
//! The store backends call into these helpers (or their SQL equivalents in
//! `pg_store`) so every backend promotes the same resume.

use uuid::Uuid;

use crate::models::resume::Resume;

/// Ordering used to pick the replacement default: most recently modified
/// first, ties broken by the larger id.
pub const PROMOTION_ORDER_SQL: &str = "last_modified DESC, id DESC";

/// A new resume becomes the default only when the user owns none yet.
pub fn is_first_resume(existing_for_user: usize) -> bool {
    existing_for_user == 0
}

/// Picks the resume to promote when `deleted` (the current default) goes away.
pub fn promotion_candidate<'a, I>(owned: I, deleted: Uuid) -> Option<&'a Resume>
where
    I: IntoIterator<Item = &'a Resume>,
{
    owned
        .into_iter()
        .filter(|r| r.id != deleted)
        .max_by(|a, b| {
            a.last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.id.cmp(&b.id))
        })
}

/// Number of default resumes in `owned`. Anything above one is a violation.
pub fn default_count<'a, I>(owned: I) -> usize
where
    I: IntoIterator<Item = &'a Resume>,
{
    owned.into_iter().filter(|r| r.is_default).count()
}
