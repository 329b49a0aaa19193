// src/db/seo_repository.rs
// DOCUMENTATION: SEO column writes shared by both listing tables
// PURPOSE: Persist generated metadata and the selected description variant

use super::db_error;
use crate::errors::DirectoryError;
use crate::models::{GeneratedSeo, ListingKind, SeoVariant};
use sqlx::PgPool;
use uuid::Uuid;

pub struct SeoRepository;

impl SeoRepository {
    /// Overwrite the generated SEO columns and stamp seo_generated_at
    /// DOCUMENTATION: The selected variant is left untouched
    pub async fn save_generated(
        pool: &PgPool,
        kind: ListingKind,
        id: Uuid,
        seo: &GeneratedSeo,
    ) -> Result<(), DirectoryError> {
        let sql = format!(
            r#"
            UPDATE {}
            SET seo_title = $2,
                seo_description_a = $3,
                seo_description_b = $4,
                seo_description_c = $5,
                seo_keywords = $6,
                seo_content = $7,
                seo_generated_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            "#,
            kind.table()
        );

        let rows = sqlx::query(&sql)
            .bind(id)
            .bind(&seo.title)
            .bind(&seo.description_a)
            .bind(&seo.description_b)
            .bind(&seo.description_c)
            .bind(&seo.keywords)
            .bind(&seo.content)
            .execute(pool)
            .await
            .map_err(|e| db_error("Failed to save generated SEO", e))?
            .rows_affected();

        if rows == 0 {
            return Err(DirectoryError::NotFound(format!("{} {}", kind, id)));
        }

        log::info!("Saved SEO metadata for {} {}", kind, id);
        Ok(())
    }

    pub async fn set_variant(
        pool: &PgPool,
        kind: ListingKind,
        id: Uuid,
        variant: SeoVariant,
    ) -> Result<(), DirectoryError> {
        let sql = format!(
            "UPDATE {} SET seo_variant = $2, updated_at = NOW() WHERE id = $1",
            kind.table()
        );

        let rows = sqlx::query(&sql)
            .bind(id)
            .bind(variant.as_str())
            .execute(pool)
            .await
            .map_err(|e| db_error("Failed to set SEO variant", e))?
            .rows_affected();

        if rows == 0 {
            return Err(DirectoryError::NotFound(format!("{} {}", kind, id)));
        }

        log::info!("{} {} now uses SEO variant {}", kind, id, variant);
        Ok(())
    }

    /// Ids eligible for batch regeneration, oldest first
    pub async fn ids_for_generation(
        pool: &PgPool,
        kind: ListingKind,
        only_missing: bool,
    ) -> Result<Vec<Uuid>, DirectoryError> {
        let filter = if only_missing {
            "WHERE seo_generated_at IS NULL"
        } else {
            ""
        };
        let sql = format!(
            "SELECT id FROM {} {} ORDER BY created_at ASC",
            kind.table(),
            filter
        );

        let rows: Vec<(Uuid,)> = sqlx::query_as(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("Failed to list listings for SEO", e))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
