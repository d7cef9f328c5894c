use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{
    NewResume, PublicFilter, PublicPage, PublicResumeSummary, Resume, ResumeRow,
};
use crate::resumes::defaults::PROMOTION_ORDER_SQL;
use crate::resumes::store::{resume_not_found, ResumeEdit, ResumeStore};

/// PostgreSQL-backed store. Resume sections live in one JSONB column.
///
/// Every operation that can change which resume is the default runs in a
/// transaction holding a per-user advisory lock, so concurrent create,
/// delete and set-default calls for one user are serialised. The partial
/// unique index `resumes_one_default_per_user` rejects anything that slips
/// past.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn lock_user(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> Result<(), AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Escapes LIKE metacharacters so user search text matches literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

const PUBLIC_WHERE: &str = r#"
    is_public
    AND ($1::text IS NULL OR template = $1)
    AND (
        $2::text IS NULL
        OR content->'personalInfo'->>'firstName' ILIKE $2
        OR content->'personalInfo'->>'lastName' ILIKE $2
        OR content->'personalInfo'->>'summary' ILIKE $2
    )
"#;

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn create(&self, new: NewResume) -> Result<Resume, AppError> {
        let mut tx = self.pool.begin().await?;
        lock_user(&mut tx, new.user_id).await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE user_id = $1")
            .bind(new.user_id)
            .fetch_one(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (id, user_id, content, template, is_public, is_default)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(Json(&new.content))
        .bind(&new.template)
        .bind(new.is_public)
        .bind(existing == 0)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Resume::from))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let rows = sqlx::query_as::<_, ResumeRow>(&format!(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY {PROMOTION_ORDER_SQL}"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn find_default(&self, user_id: Uuid) -> Result<Option<Resume>, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 AND is_default LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Resume::from))
    }

    async fn update(&self, user_id: Uuid, id: Uuid, edit: ResumeEdit) -> Result<Resume, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock: concurrent updates of one resume apply their edits in turn,
        // each on top of the previous one's result.
        let current = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(resume_not_found)?;

        let mut resume = Resume::from(current);
        edit(&mut resume)?;

        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET content = $3,
                template = $4,
                is_public = $5,
                last_modified = now(),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(Json(&resume.content))
        .bind(&resume.template)
        .bind(resume.is_public)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Option<Uuid>, AppError> {
        let mut tx = self.pool.begin().await?;
        lock_user(&mut tx, user_id).await?;

        let was_default: Option<bool> = sqlx::query_scalar(
            "DELETE FROM resumes WHERE id = $1 AND user_id = $2 RETURNING is_default",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let was_default = was_default.ok_or_else(resume_not_found)?;

        // The row is already gone, so promoting cannot collide with the
        // one-default index.
        let promoted: Option<Uuid> = if was_default {
            sqlx::query_scalar(&format!(
                r#"
                UPDATE resumes SET is_default = TRUE, updated_at = now()
                WHERE id = (
                    SELECT id FROM resumes
                    WHERE user_id = $1
                    ORDER BY {PROMOTION_ORDER_SQL}
                    LIMIT 1
                )
                RETURNING id
                "#
            ))
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        } else {
            None
        };

        tx.commit().await?;

        if let Some(promoted_id) = promoted {
            info!("Promoted resume {promoted_id} to default for user {user_id}");
        }
        Ok(promoted)
    }

    async fn set_default(&self, user_id: Uuid, id: Uuid) -> Result<Resume, AppError> {
        let mut tx = self.pool.begin().await?;
        lock_user(&mut tx, user_id).await?;

        sqlx::query(
            r#"
            UPDATE resumes SET is_default = FALSE, updated_at = now()
            WHERE user_id = $1 AND is_default AND id <> $2
            "#,
        )
        .bind(user_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes SET is_default = TRUE, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction on the error path rolls the clear back.
        let row = row.ok_or_else(resume_not_found)?;
        tx.commit().await?;
        Ok(row.into())
    }

    async fn list_public(&self, filter: &PublicFilter) -> Result<PublicPage, AppError> {
        let search = filter.search.as_deref().map(like_pattern);

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM resumes WHERE {PUBLIC_WHERE}"))
                .bind(filter.template.as_deref())
                .bind(search.as_deref())
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, ResumeRow>(&format!(
            "SELECT * FROM resumes WHERE {PUBLIC_WHERE} ORDER BY {PROMOTION_ORDER_SQL} LIMIT $3 OFFSET $4"
        ))
        .bind(filter.template.as_deref())
        .bind(search.as_deref())
        .bind(i64::from(filter.limit))
        .bind(filter.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(Resume::from)
            .map(|r| PublicResumeSummary::from(&r))
            .collect();

        Ok(PublicPage {
            items,
            total: total.max(0) as u64,
        })
    }
}
