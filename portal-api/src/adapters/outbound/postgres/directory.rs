use std::collections::HashMap;

use async_trait::async_trait;
use portal_search::{
    CompanyRecord, ContactRecord, DirectoryRepository, DirectoryResult, PaymentMethodRecord,
    StorageItemRecord, UserRecord,
};
use sqlx::PgPool;

use super::rows::{CompanyRow, ContactRow, PaymentMethodRow, StorageItemRow, UserRow};
use crate::repositories::RepositoryError;

/// Case-insensitive substring lookups over the portal tables.
#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build an `ILIKE` pattern matching `query` anywhere, with its own
/// wildcards taken literally.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl DirectoryRepository for PgDirectory {
    async fn find_users(&self, query: &str, limit: usize) -> DirectoryResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id::text AS id, first_name, last_name, second_last_name,
                   email, username, rut, role, is_active
            FROM users
            WHERE first_name ILIKE $1 ESCAPE '\'
               OR last_name ILIKE $1 ESCAPE '\'
               OR second_last_name ILIKE $1 ESCAPE '\'
               OR email ILIKE $1 ESCAPE '\'
               OR username ILIKE $1 ESCAPE '\'
               OR rut ILIKE $1 ESCAPE '\'
            ORDER BY first_name, last_name
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(query))
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn find_storage_items(
        &self,
        query: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<StorageItemRecord>> {
        let rows = sqlx::query_as::<_, StorageItemRow>(
            r#"
            SELECT id::text AS id, name, kind, path, parent_path, mime_type, size_bytes
            FROM storage_items
            WHERE name ILIKE $1 ESCAPE '\'
            ORDER BY kind DESC, name
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(query))
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        let items = rows
            .into_iter()
            .map(StorageItemRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    async fn find_companies(
        &self,
        query: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<CompanyRecord>> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id::text AS id, name, rut, is_active
            FROM companies
            WHERE name ILIKE $1 ESCAPE '\'
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(query))
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(rows.into_iter().map(CompanyRecord::from).collect())
    }

    async fn find_contacts(
        &self,
        query: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<ContactRecord>> {
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id::text AS id, company_id::text AS company_id, name, email, phone, position
            FROM company_contacts
            WHERE name ILIKE $1 ESCAPE '\'
               OR email ILIKE $1 ESCAPE '\'
               OR phone ILIKE $1 ESCAPE '\'
               OR position ILIKE $1 ESCAPE '\'
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(query))
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(rows.into_iter().map(ContactRecord::from).collect())
    }

    async fn company_names(
        &self,
        company_ids: &[String],
    ) -> DirectoryResult<HashMap<String, String>> {
        if company_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT id::text, name
            FROM companies
            WHERE id::text = ANY($1)
            "#,
        )
        .bind(company_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(rows.into_iter().collect())
    }

    async fn find_payment_methods(
        &self,
        query: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<PaymentMethodRecord>> {
        let rows = sqlx::query_as::<_, PaymentMethodRow>(
            r#"
            SELECT pm.id::text AS id, pm.company_id::text AS company_id,
                   c.name AS company_name, pm.tax_id, pm.bank_name,
                   pm.account_type, pm.account_number, pm.is_active
            FROM payment_methods pm
            JOIN companies c ON c.id = pm.company_id
            WHERE pm.is_active
              AND (c.name ILIKE $1 ESCAPE '\'
                   OR pm.tax_id ILIKE $1 ESCAPE '\'
                   OR pm.bank_name ILIKE $1 ESCAPE '\')
            ORDER BY c.name
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(query))
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(rows.into_iter().map(PaymentMethodRecord::from).collect())
    }
}
