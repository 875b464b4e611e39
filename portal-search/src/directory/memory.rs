//! Directory backed by in-memory vectors.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::permissions::Module;
use crate::traits::{DirectoryError, DirectoryRepository, DirectoryResult};
use crate::types::{
    CompanyRecord, ContactRecord, PaymentMethodRecord, StorageItemRecord, UserRecord,
};

/// Directory backed by in-memory row lists, with call tracking and failure injection.
///
/// Rows are returned in insertion order.
///
/// # Examples
///
/// ```
/// use portal_search::directory::InMemoryDirectory;
/// use portal_search::Module;
///
/// let directory = InMemoryDirectory::new().failing(Module::Companies);
/// assert_eq!(directory.call_count(Module::Companies), 0);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    data: Arc<RwLock<DirectoryData>>,
    failing: Arc<RwLock<HashSet<Module>>>,
    calls: Arc<Mutex<HashMap<Module, CallLog>>>,
    company_name_lookups: Arc<AtomicUsize>,
}

#[derive(Default)]
struct DirectoryData {
    users: Vec<UserRecord>,
    storage_items: Vec<StorageItemRecord>,
    companies: Vec<CompanyRecord>,
    contacts: Vec<ContactRecord>,
    payment_methods: Vec<PaymentMethodRecord>,
}

#[derive(Debug, Clone, Default)]
struct CallLog {
    count: usize,
    last_query: Option<String>,
    last_limit: Option<usize>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, users: Vec<UserRecord>) -> Self {
        self.write_data(|data| data.users.extend(users));
        self
    }

    pub fn with_storage_items(self, items: Vec<StorageItemRecord>) -> Self {
        self.write_data(|data| data.storage_items.extend(items));
        self
    }

    pub fn with_companies(self, companies: Vec<CompanyRecord>) -> Self {
        self.write_data(|data| data.companies.extend(companies));
        self
    }

    pub fn with_contacts(self, contacts: Vec<ContactRecord>) -> Self {
        self.write_data(|data| data.contacts.extend(contacts));
        self
    }

    pub fn with_payment_methods(self, methods: Vec<PaymentMethodRecord>) -> Self {
        self.write_data(|data| data.payment_methods.extend(methods));
        self
    }

    /// Make every lookup for `module` fail with a database error.
    pub fn failing(self, module: Module) -> Self {
        self.failing
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(module);
        self
    }

    /// Number of lookups made for `module`, failed ones included.
    pub fn call_count(&self, module: Module) -> usize {
        self.call_log(module).count
    }

    pub fn last_query(&self, module: Module) -> Option<String> {
        self.call_log(module).last_query
    }

    pub fn last_limit(&self, module: Module) -> Option<usize> {
        self.call_log(module).last_limit
    }

    /// Number of batch company name lookups.
    pub fn company_name_lookups(&self) -> usize {
        self.company_name_lookups.load(Ordering::SeqCst)
    }

    fn write_data(&self, f: impl FnOnce(&mut DirectoryData)) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut data);
    }

    fn call_log(&self, module: Module) -> CallLog {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&module)
            .cloned()
            .unwrap_or_default()
    }

    /// Log the call and fail it if the module was marked as failing.
    fn record(&self, module: Module, query: &str, limit: usize) -> DirectoryResult<()> {
        {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            let log = calls.entry(module).or_default();
            log.count += 1;
            log.last_query = Some(query.to_string());
            log.last_limit = Some(limit);
        }

        let failing = self.failing.read().unwrap_or_else(PoisonError::into_inner);
        if failing.contains(&module) {
            return Err(DirectoryError::DatabaseError(format!(
                "{module} table unavailable"
            )));
        }

        Ok(())
    }

    fn find<T: Clone>(
        &self,
        rows: impl Fn(&DirectoryData) -> &Vec<T>,
        matches: impl Fn(&T, &str) -> bool,
        query: &str,
        limit: usize,
    ) -> Vec<T> {
        let needle = query.to_lowercase();
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        rows(&data)
            .iter()
            .filter(|row| matches(row, &needle))
            .take(limit)
            .cloned()
            .collect()
    }
}

fn contains(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}

fn contains_opt(field: &Option<String>, needle: &str) -> bool {
    field.as_deref().is_some_and(|f| contains(f, needle))
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectory {
    async fn find_users(&self, query: &str, limit: usize) -> DirectoryResult<Vec<UserRecord>> {
        self.record(Module::Users, query, limit)?;
        Ok(self.find(
            |data| &data.users,
            |user, needle| {
                contains(&user.first_name, needle)
                    || contains_opt(&user.last_name, needle)
                    || contains_opt(&user.second_last_name, needle)
                    || contains(&user.email, needle)
                    || contains_opt(&user.username, needle)
                    || contains_opt(&user.rut, needle)
            },
            query,
            limit,
        ))
    }

    async fn find_storage_items(
        &self,
        query: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<StorageItemRecord>> {
        self.record(Module::Files, query, limit)?;
        Ok(self.find(
            |data| &data.storage_items,
            |item, needle| contains(&item.name, needle),
            query,
            limit,
        ))
    }

    async fn find_companies(
        &self,
        query: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<CompanyRecord>> {
        self.record(Module::Companies, query, limit)?;
        Ok(self.find(
            |data| &data.companies,
            |company, needle| contains(&company.name, needle),
            query,
            limit,
        ))
    }

    async fn find_contacts(
        &self,
        query: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<ContactRecord>> {
        self.record(Module::Contacts, query, limit)?;
        Ok(self.find(
            |data| &data.contacts,
            |contact, needle| {
                contains(&contact.name, needle)
                    || contains_opt(&contact.email, needle)
                    || contains_opt(&contact.phone, needle)
                    || contains_opt(&contact.position, needle)
            },
            query,
            limit,
        ))
    }

    async fn company_names(
        &self,
        company_ids: &[String],
    ) -> DirectoryResult<HashMap<String, String>> {
        self.company_name_lookups.fetch_add(1, Ordering::SeqCst);

        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        Ok(data
            .companies
            .iter()
            .filter(|c| company_ids.contains(&c.id))
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect())
    }

    async fn find_payment_methods(
        &self,
        query: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<PaymentMethodRecord>> {
        self.record(Module::PaymentMethods, query, limit)?;
        Ok(self.find(
            |data| &data.payment_methods,
            |method, needle| {
                method.is_active
                    && (contains(&method.company_name, needle)
                        || contains_opt(&method.tax_id, needle)
                        || contains_opt(&method.bank_name, needle))
            },
            query,
            limit,
        ))
    }
}
