//! Per-module search functions.
//!
//! Each function runs one lookup against its collaborator and maps the rows into
//! [`SearchResult`]s. A failing lookup is logged and yields an empty list so that
//! one module can never blank out the others.

use std::collections::BTreeSet;

use serde_json::{json, Map, Value};
use tracing::{debug, error, warn};

use crate::permissions::Module;
use crate::role::Role;
use crate::traits::{DirectoryRepository, FilePermissionChecker};
use crate::types::{
    CallerIdentity, CompanyRecord, ContactRecord, PaymentMethodRecord, ResultType, SearchResult,
    StorageItemKind, StorageItemRecord, UserRecord,
};

/// Search portal users. Only administrators get results.
pub async fn search_users<D>(
    directory: &D,
    query: &str,
    caller: &CallerIdentity,
    limit: usize,
) -> Vec<SearchResult>
where
    D: DirectoryRepository + ?Sized,
{
    if !caller.role.is_admin() {
        return vec![];
    }

    match directory.find_users(query, limit).await {
        Ok(rows) => rows.into_iter().take(limit).map(user_result).collect(),
        Err(e) => {
            error!(module = %Module::Users, error = %e, "Module search failed");
            vec![]
        }
    }
}

/// Search files and folders by name.
///
/// Folders are always visible. Each file goes through the permission checker,
/// so twice `limit` candidates are fetched to leave room for rejections.
pub async fn search_files<D, P>(
    directory: &D,
    permissions: &P,
    query: &str,
    caller: &CallerIdentity,
    limit: usize,
) -> Vec<SearchResult>
where
    D: DirectoryRepository + ?Sized,
    P: FilePermissionChecker + ?Sized,
{
    let fetch_limit = limit.saturating_mul(2);
    let candidates = match directory.find_storage_items(query, fetch_limit).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(module = %Module::Files, error = %e, "Module search failed");
            return vec![];
        }
    };
    let candidate_count = candidates.len();

    let mut results = Vec::with_capacity(limit.min(candidate_count));
    for item in candidates {
        if results.len() >= limit {
            break;
        }

        if is_visible(permissions, &item, caller.role).await {
            results.push(storage_item_result(item));
        }
    }

    // No refill round: a full candidate page with rejections can leave the list short.
    if results.len() < limit && candidate_count >= fetch_limit {
        debug!(
            accepted = results.len(),
            candidates = candidate_count,
            limit,
            "File search under-filled after permission filtering"
        );
    }

    results
}

async fn is_visible<P>(permissions: &P, item: &StorageItemRecord, role: Role) -> bool
where
    P: FilePermissionChecker + ?Sized,
{
    match item.kind {
        StorageItemKind::Folder => true,
        StorageItemKind::File => match permissions.can_view_file(item, role).await {
            Ok(allowed) => allowed,
            Err(e) => {
                warn!(file_id = %item.id, error = %e, "File permission check failed, hiding file");
                false
            }
        },
    }
}

/// Search companies by name. Companies are visible to every caller.
pub async fn search_companies<D>(directory: &D, query: &str, limit: usize) -> Vec<SearchResult>
where
    D: DirectoryRepository + ?Sized,
{
    match directory.find_companies(query, limit).await {
        Ok(rows) => rows.into_iter().take(limit).map(company_result).collect(),
        Err(e) => {
            error!(module = %Module::Companies, error = %e, "Module search failed");
            vec![]
        }
    }
}

/// Search company contacts, then resolve their company names in one batch.
pub async fn search_contacts<D>(directory: &D, query: &str, limit: usize) -> Vec<SearchResult>
where
    D: DirectoryRepository + ?Sized,
{
    let contacts = match directory.find_contacts(query, limit).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(module = %Module::Contacts, error = %e, "Module search failed");
            return vec![];
        }
    };

    if contacts.is_empty() {
        return vec![];
    }

    let company_ids: Vec<String> = contacts
        .iter()
        .map(|c| c.company_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    // Missing names only cost the subtitle
    let company_names = directory
        .company_names(&company_ids)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Failed to resolve contact company names");
            Default::default()
        });

    contacts
        .into_iter()
        .take(limit)
        .map(|contact| {
            let company_name = company_names.get(&contact.company_id).cloned();
            contact_result(contact, company_name)
        })
        .collect()
}

/// Search active payment methods by company name, tax ID or bank.
pub async fn search_payment_methods<D>(
    directory: &D,
    query: &str,
    limit: usize,
) -> Vec<SearchResult>
where
    D: DirectoryRepository + ?Sized,
{
    match directory.find_payment_methods(query, limit).await {
        Ok(rows) => rows
            .into_iter()
            .filter(|m| m.is_active)
            .take(limit)
            .map(payment_method_result)
            .collect(),
        Err(e) => {
            error!(module = %Module::PaymentMethods, error = %e, "Module search failed");
            vec![]
        }
    }
}

fn user_result(user: UserRecord) -> SearchResult {
    let full_name = user.full_name();
    let title = if full_name.is_empty() {
        user.username.clone().unwrap_or_else(|| user.email.clone())
    } else {
        full_name
    };
    let role = Role::from(user.role.as_str());

    SearchResult {
        navigation_path: format!("/admin/users?user={}", urlencoding::encode(&user.id)),
        id: user.id,
        result_type: ResultType::User,
        title,
        subtitle: Some(user.email.clone()),
        badge: Some(role.label().to_string()),
        metadata: metadata([
            ("email", json!(user.email)),
            ("username", json!(user.username)),
            ("rut", json!(user.rut)),
            ("role", json!(role)),
            ("isActive", json!(user.is_active)),
        ]),
    }
}

fn storage_item_result(item: StorageItemRecord) -> SearchResult {
    let (navigation_path, badge) = match item.kind {
        StorageItemKind::Folder => (
            format!("/files?path={}", urlencoding::encode(&item.path)),
            Some("Folder".to_string()),
        ),
        StorageItemKind::File => (
            format!(
                "/files?path={}&file={}",
                urlencoding::encode(&item.parent_path),
                urlencoding::encode(&item.id)
            ),
            item.extension().map(str::to_uppercase),
        ),
    };

    SearchResult {
        navigation_path,
        badge,
        result_type: ResultType::File,
        subtitle: Some(item.parent_path.clone()),
        metadata: metadata([
            ("kind", json!(item.kind)),
            ("path", json!(item.path)),
            ("mimeType", json!(item.mime_type)),
            ("size", json!(item.size_bytes)),
        ]),
        id: item.id,
        title: item.name,
    }
}

fn company_result(company: CompanyRecord) -> SearchResult {
    SearchResult {
        navigation_path: format!("/companies/{}", urlencoding::encode(&company.id)),
        result_type: ResultType::Company,
        subtitle: company.rut.as_ref().map(|rut| format!("RUT {rut}")),
        badge: (!company.is_active).then(|| "Inactive".to_string()),
        metadata: metadata([
            ("rut", json!(company.rut)),
            ("isActive", json!(company.is_active)),
        ]),
        id: company.id,
        title: company.name,
    }
}

fn contact_result(contact: ContactRecord, company_name: Option<String>) -> SearchResult {
    SearchResult {
        navigation_path: format!(
            "/companies/{}?contact={}",
            urlencoding::encode(&contact.company_id),
            urlencoding::encode(&contact.id)
        ),
        result_type: ResultType::Contact,
        subtitle: company_name.clone(),
        badge: contact.position.clone(),
        metadata: metadata([
            ("companyId", json!(contact.company_id)),
            ("companyName", json!(company_name)),
            ("email", json!(contact.email)),
            ("phone", json!(contact.phone)),
            ("position", json!(contact.position)),
        ]),
        id: contact.id,
        title: contact.name,
    }
}

fn payment_method_result(method: PaymentMethodRecord) -> SearchResult {
    let subtitle = match (&method.bank_name, &method.tax_id) {
        (Some(bank), Some(tax_id)) => Some(format!("{bank} · {tax_id}")),
        (Some(bank), None) => Some(bank.clone()),
        (None, Some(tax_id)) => Some(tax_id.clone()),
        (None, None) => None,
    };

    SearchResult {
        navigation_path: format!(
            "/companies/{}?tab=payment-methods&method={}",
            urlencoding::encode(&method.company_id),
            urlencoding::encode(&method.id)
        ),
        result_type: ResultType::PaymentMethod,
        subtitle,
        badge: method.account_type.clone(),
        metadata: metadata([
            ("companyId", json!(method.company_id)),
            ("taxId", json!(method.tax_id)),
            ("bankName", json!(method.bank_name)),
            ("accountNumber", json!(method.account_number)),
        ]),
        id: method.id,
        title: method.company_name,
    }
}

fn metadata<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
