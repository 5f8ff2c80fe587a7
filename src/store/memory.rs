//! In-memory account store with optional JSON snapshot persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::{Account, AccountUpdate};
use crate::observability::metrics;
use crate::store::{AccountStore, StoreResult};

/// A thread-safe account table.
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    inner: Arc<DashMap<String, Account>>,
    persistence_path: Option<PathBuf>,
}

impl InMemoryAccountStore {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Load from a snapshot file if it exists; later saves go to the same file.
    pub fn load_from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let accounts: Vec<Account> = serde_json::from_reader(reader)?;
            for account in accounts {
                store.insert(account);
            }
            metrics::record_store_size(store.len());
            tracing::info!(path = %path.display(), accounts = store.len(), "Loaded account snapshot");
        }
        Ok(store)
    }

    /// Write every account to the snapshot file. No-op without a path.
    pub fn save_to_file(&self) -> StoreResult<()> {
        if let Some(path) = &self.persistence_path {
            let accounts: Vec<Account> = self.inner.iter().map(|r| r.value().clone()).collect();

            // Write beside the snapshot and swap it in, so a crash mid-write
            // leaves the previous snapshot intact.
            let tmp = snapshot_tmp_path(path);
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, &accounts)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            drop(writer);
            fs::rename(&tmp, path)?;

            tracing::info!(path = %path.display(), accounts = accounts.len(), "Saved account snapshot");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn insert(&self, account: Account) -> Account {
        let account = account.without_customer();
        self.inner.insert(account.account_id.clone(), account.clone());
        account
    }
}

fn snapshot_tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn save(&self, account: Account) -> StoreResult<Account> {
        let stored = self.insert(account);
        metrics::record_store_size(self.inner.len());
        Ok(stored)
    }

    async fn find_all(&self) -> StoreResult<Vec<Account>> {
        Ok(self.inner.iter().map(|r| r.value().clone()).collect())
    }

    async fn find_by_id(&self, account_id: &str) -> StoreResult<Option<Account>> {
        Ok(self.inner.get(account_id).map(|r| r.value().clone()))
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> StoreResult<Vec<Account>> {
        Ok(self
            .inner
            .iter()
            .filter(|r| r.value().customer_id == customer_id)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn update(
        &self,
        account_id: &str,
        update: AccountUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Account>> {
        Ok(self.inner.get_mut(account_id).map(|mut entry| {
            entry.apply(update, now);
            entry.value().clone()
        }))
    }

    async fn delete(&self, account_id: &str) -> StoreResult<bool> {
        let removed = self.inner.remove(account_id).is_some();
        metrics::record_store_size(self.inner.len());
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Customer, NewAccount};

    fn account(customer_id: &str) -> Account {
        Account::open(
            NewAccount {
                customer_id: customer_id.into(),
                account_type: "SAVINGS".into(),
            },
            Utc::now(),
        )
    }

    fn customer(id: &str) -> Customer {
        Customer {
            customer_id: id.into(),
            details: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_crud_operations() {
        let store = InMemoryAccountStore::new(None);
        let a = store.save(account("C1")).await.unwrap();

        let found = store.find_by_id(&a.account_id).await.unwrap().unwrap();
        assert_eq!(found, a);
        assert_eq!(store.find_all().await.unwrap().len(), 1);

        assert!(store.delete(&a.account_id).await.unwrap());
        assert!(!store.delete(&a.account_id).await.unwrap());
        assert!(store.find_by_id(&a.account_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_customer_is_never_stored() {
        let store = InMemoryAccountStore::new(None);
        let decorated = account("C1").with_customer(customer("C1"));

        let stored = store.save(decorated.clone()).await.unwrap();
        assert!(stored.customer.is_none());

        let found = store.find_by_id(&decorated.account_id).await.unwrap().unwrap();
        assert!(found.customer.is_none());
    }

    #[tokio::test]
    async fn test_find_by_customer_id() {
        let store = InMemoryAccountStore::new(None);
        let a1 = store.save(account("C1")).await.unwrap();
        let a2 = store.save(account("C1")).await.unwrap();
        store.save(account("C2")).await.unwrap();

        let mut ids: Vec<_> = store
            .find_by_customer_id("C1")
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.account_id)
            .collect();
        ids.sort();
        let mut expected = vec![a1.account_id, a2.account_id];
        expected.sort();
        assert_eq!(ids, expected);

        assert!(store.find_by_customer_id("C404").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_in_place() {
        let store = InMemoryAccountStore::new(None);
        let a = store.save(account("C1")).await.unwrap();
        let change = || AccountUpdate {
            account_type: "CURRENT".into(),
        };

        let updated = store
            .update(&a.account_id, change(), Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.account_type, "CURRENT");
        assert_eq!(store.find_by_id(&a.account_id).await.unwrap(), Some(updated));

        // A deleted record is not brought back
        store.delete(&a.account_id).await.unwrap();
        assert!(store.update(&a.account_id, change(), Utc::now()).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_persistence() {
        let path = std::env::temp_dir().join(format!("accounts-{}.json", uuid::Uuid::new_v4()));

        let store = InMemoryAccountStore::new(Some(path.clone()));
        let a = store.save(account("C7")).await.unwrap();
        store.save_to_file().unwrap();

        let loaded = InMemoryAccountStore::load_from_file(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.find_by_id(&a.account_id).await.unwrap(), Some(a));

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_snapshot_is_replaced_whole() {
        let path = std::env::temp_dir().join(format!("accounts-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[]").unwrap();

        let store = InMemoryAccountStore::load_from_file(&path).unwrap();
        store.save(account("C1")).await.unwrap();
        store.save(account("C2")).await.unwrap();
        store.save_to_file().unwrap();

        assert!(!snapshot_tmp_path(&path).exists());
        assert_eq!(InMemoryAccountStore::load_from_file(&path).unwrap().len(), 2);

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_snapshot_starts_empty() {
        let path = std::env::temp_dir().join(format!("absent-{}.json", uuid::Uuid::new_v4()));
        let store = InMemoryAccountStore::load_from_file(&path).unwrap();
        assert!(store.is_empty());
    }
}
