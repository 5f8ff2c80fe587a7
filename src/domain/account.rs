//! Account records and the request shapes that create or modify them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::customer::Customer;

/// A bank account owned by exactly one customer reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Opaque identifier, assigned once at creation.
    pub account_id: String,
    /// Owning customer, fixed at creation.
    pub customer_id: String,
    pub account_type: String,
    pub account_opening_date: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    /// Presentation-time decoration filled on the enriched read path only.
    #[serde(default)]
    pub customer: Option<Customer>,
}

impl Account {
    /// Open a new account at `now` with a freshly generated identifier.
    pub fn open(new_account: NewAccount, now: DateTime<Utc>) -> Self {
        Self {
            account_id: Uuid::new_v4().to_string(),
            customer_id: new_account.customer_id,
            account_type: new_account.account_type,
            account_opening_date: now,
            last_activity: now,
            customer: None,
        }
    }

    /// Apply an update: only the account type changes, and activity is
    /// refreshed without ever moving backwards.
    pub fn apply(&mut self, update: AccountUpdate, now: DateTime<Utc>) {
        self.account_type = update.account_type;
        self.last_activity = now.max(self.last_activity);
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn without_customer(mut self) -> Self {
        self.customer = None;
        self
    }
}

/// Input for account creation. Identifier and timestamps are never taken
/// from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub customer_id: String,
    pub account_type: String,
}

/// Input for account updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub account_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn savings() -> NewAccount {
        NewAccount {
            customer_id: "C1".into(),
            account_type: "SAVINGS".into(),
        }
    }

    #[test]
    fn test_open_assigns_identity_and_timestamps() {
        let now = Utc::now();
        let account = Account::open(savings(), now);

        assert!(!account.account_id.is_empty());
        assert!(Uuid::parse_str(&account.account_id).is_ok());
        assert_eq!(account.account_opening_date, now);
        assert_eq!(account.last_activity, now);
        assert!(account.customer.is_none());
    }

    #[test]
    fn test_apply_never_moves_activity_backwards() {
        let t0 = Utc::now();
        let mut account = Account::open(savings(), t0);

        account.apply(
            AccountUpdate { account_type: "CURRENT".into() },
            t0 - Duration::seconds(30),
        );
        assert_eq!(account.account_type, "CURRENT");
        assert_eq!(account.last_activity, t0);

        let t1 = t0 + Duration::seconds(5);
        account.apply(AccountUpdate { account_type: "CURRENT".into() }, t1);
        assert_eq!(account.last_activity, t1);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let account = Account::open(savings(), Utc::now());
        let json = serde_json::to_value(&account).unwrap();

        assert_eq!(json["customerId"], "C1");
        assert_eq!(json["accountType"], "SAVINGS");
        assert!(json.get("accountOpeningDate").is_some());
        assert!(json["customer"].is_null());
    }

    #[test]
    fn test_new_account_ignores_client_supplied_identity() {
        let parsed: NewAccount = serde_json::from_str(
            r#"{"accountId":"forged","customerId":"C9","accountType":"SAVINGS"}"#,
        )
        .unwrap();
        assert_eq!(parsed, NewAccount { customer_id: "C9".into(), account_type: "SAVINGS".into() });
    }
}
