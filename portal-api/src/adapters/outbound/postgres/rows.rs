use std::str::FromStr;

use portal_search::{
    CompanyRecord, ContactRecord, PaymentMethodRecord, StorageItemKind, StorageItemRecord,
    UserRecord,
};

use crate::repositories::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
pub(super) struct UserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub second_last_name: Option<String>,
    pub email: String,
    pub username: Option<String>,
    pub rut: Option<String>,
    pub role: String,
    pub is_active: bool,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            second_last_name: row.second_last_name,
            email: row.email,
            username: row.username,
            rut: row.rut,
            role: row.role,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct StorageItemRow {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub path: String,
    pub parent_path: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
}

impl TryFrom<StorageItemRow> for StorageItemRecord {
    type Error = RepositoryError;

    fn try_from(row: StorageItemRow) -> Result<Self, Self::Error> {
        let kind = StorageItemKind::from_str(&row.kind).map_err(|_| {
            RepositoryError::InvalidRow(format!(
                "storage item {} has unknown kind '{}'",
                row.id, row.kind
            ))
        })?;

        Ok(StorageItemRecord {
            id: row.id,
            name: row.name,
            kind,
            path: row.path,
            parent_path: row.parent_path,
            mime_type: row.mime_type,
            size_bytes: row.size_bytes,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct CompanyRow {
    pub id: String,
    pub name: String,
    pub rut: Option<String>,
    pub is_active: bool,
}

impl From<CompanyRow> for CompanyRecord {
    fn from(row: CompanyRow) -> Self {
        CompanyRecord {
            id: row.id,
            name: row.name,
            rut: row.rut,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ContactRow {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
}

impl From<ContactRow> for ContactRecord {
    fn from(row: ContactRow) -> Self {
        ContactRecord {
            id: row.id,
            company_id: row.company_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            position: row.position,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PaymentMethodRow {
    pub id: String,
    pub company_id: String,
    pub company_name: String,
    pub tax_id: Option<String>,
    pub bank_name: Option<String>,
    pub account_type: Option<String>,
    pub account_number: Option<String>,
    pub is_active: bool,
}

impl From<PaymentMethodRow> for PaymentMethodRecord {
    fn from(row: PaymentMethodRow) -> Self {
        PaymentMethodRecord {
            id: row.id,
            company_id: row.company_id,
            company_name: row.company_name,
            tax_id: row.tax_id,
            bank_name: row.bank_name,
            account_type: row.account_type,
            account_number: row.account_number,
            is_active: row.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_row(kind: &str) -> StorageItemRow {
        StorageItemRow {
            id: "f-1".to_string(),
            name: "Contrato.pdf".to_string(),
            kind: kind.to_string(),
            path: "/legal/Contrato.pdf".to_string(),
            parent_path: "/legal".to_string(),
            mime_type: Some("application/pdf".to_string()),
            size_bytes: Some(2048),
        }
    }

    #[test]
    fn storage_kind_is_parsed() {
        let record = StorageItemRecord::try_from(storage_row("FOLDER")).unwrap();
        assert_eq!(record.kind, StorageItemKind::Folder);

        let record = StorageItemRecord::try_from(storage_row("file")).unwrap();
        assert_eq!(record.kind, StorageItemKind::File);
    }

    #[test]
    fn unknown_storage_kind_is_rejected() {
        let err = StorageItemRecord::try_from(storage_row("symlink")).unwrap_err();
        assert!(err.to_string().contains("symlink"));
    }
}
