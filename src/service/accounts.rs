//! Account lifecycle operations and the customer-enriched read path.

use chrono::Utc;
use std::sync::Arc;

use crate::customer::{CustomerLookup, CustomerLookupError};
use crate::domain::{Account, AccountUpdate, NewAccount};
use crate::observability::metrics;
use crate::resilience::{CallFailure, CircuitBreaker};
use crate::service::types::{AccountError, AccountResult};
use crate::store::AccountStore;

/// Account operations over a store, with customer enrichment on `get`.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    customers: Arc<dyn CustomerLookup>,
    breaker: Arc<CircuitBreaker>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        customers: Arc<dyn CustomerLookup>,
        breaker: Arc<CircuitBreaker>,
    ) -> Self {
        Self {
            store,
            customers,
            breaker,
        }
    }

    /// The breaker guarding customer lookups.
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Open and persist a new account.
    pub async fn create(&self, new_account: NewAccount) -> AccountResult<Account> {
        let account = Account::open(new_account, Utc::now());
        let stored = self.store.save(account).await?;
        tracing::info!(
            account_id = %stored.account_id,
            customer_id = %stored.customer_id,
            account_type = %stored.account_type,
            "Account created"
        );
        Ok(stored)
    }

    pub async fn list_all(&self) -> AccountResult<Vec<Account>> {
        Ok(self.store.find_all().await?)
    }

    /// Fetch an account and attach its customer. If the customer service
    /// cannot answer, the account comes back without customer data.
    pub async fn get(&self, id: &str) -> AccountResult<Account> {
        let account = self.find_existing(id).await?;
        let customer_id = account.customer_id.clone();
        let customers = &self.customers;

        self.breaker
            .call_or_fallback(
                move || async move {
                    let customer = customers.fetch_customer(&customer_id).await?;
                    Ok::<_, CustomerLookupError>(account.with_customer(customer))
                },
                |failure| self.fallback_get(id, failure),
            )
            .await
    }

    pub async fn get_by_customer_id(&self, customer_id: &str) -> AccountResult<Vec<Account>> {
        Ok(self.store.find_by_customer_id(customer_id).await?)
    }

    /// Change the account type. Every other field except `last_activity`
    /// is preserved.
    pub async fn update(&self, id: &str, update: AccountUpdate) -> AccountResult<Account> {
        let stored = self
            .store
            .update(id, update, Utc::now())
            .await?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;
        tracing::info!(account_id = %id, account_type = %stored.account_type, "Account updated");
        Ok(stored)
    }

    /// Permanently remove an account.
    pub async fn delete(&self, id: &str) -> AccountResult<()> {
        self.find_existing(id).await?;
        if !self.store.delete(id).await? {
            return Err(AccountError::NotFound(id.to_string()));
        }
        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }

    async fn find_existing(&self, id: &str) -> AccountResult<Account> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))
    }

    /// Degraded read: log why the customer is missing, re-read the account
    /// and return it undecorated.
    async fn fallback_get(
        &self,
        id: &str,
        failure: CallFailure<CustomerLookupError>,
    ) -> AccountResult<Account> {
        tracing::error!(
            account_id = %id,
            breaker = %self.breaker.name(),
            error = %failure,
            "Customer service is down"
        );
        if matches!(failure, CallFailure::Rejected(_)) {
            metrics::record_customer_lookup("rejected");
        }
        metrics::record_fallback();

        let account = self.find_existing(id).await?;
        Ok(account.without_customer())
    }
}
