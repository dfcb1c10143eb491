//! Shape types: the requested target, the store's current form, and
//! the aggregate counts both reduce to.

use crate::{
    error::{LoadError, LoadResult},
    types::{AccountId, CustomerId, TransactionId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The requested uniform shape: so many customers, each with so many
/// accounts, each with so many transactions. Counts are signed so a
/// malformed (negative) request can reach validation instead of being
/// silently reinterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetShape {
    pub customers: i64,
    pub accounts_per_customer: i64,
    pub transactions_per_account: i64,
}

impl TargetShape {
    pub fn new(customers: i64, accounts_per_customer: i64, transactions_per_account: i64) -> Self {
        Self {
            customers,
            accounts_per_customer,
            transactions_per_account,
        }
    }

    /// Reject malformed targets before any store access. Zero is a
    /// valid count (empty tier); negatives are not.
    pub fn validate(&self) -> LoadResult<()> {
        let reject = |reason: &str| {
            Err(LoadError::InvalidTargetShape {
                target: *self,
                reason: reason.to_string(),
            })
        };
        if self.customers < 0 {
            return reject("customer count is negative");
        }
        if self.accounts_per_customer < 0 {
            return reject("accounts-per-customer is negative");
        }
        if self.transactions_per_account < 0 {
            return reject("transactions-per-account is negative");
        }
        let total = self
            .customers
            .checked_mul(self.accounts_per_customer)
            .and_then(|a| a.checked_mul(self.transactions_per_account));
        if total.is_none() {
            return reject("total row count overflows");
        }
        Ok(())
    }

    /// Aggregate counts this target expands to.
    pub fn counts(&self) -> ShapeCounts {
        let customers = self.customers as u64;
        let accounts = customers * self.accounts_per_customer as u64;
        let transactions = accounts * self.transactions_per_account as u64;
        ShapeCounts {
            customers,
            accounts,
            transactions,
        }
    }
}

/// Aggregate row counts per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCounts {
    pub customers: u64,
    pub accounts: u64,
    pub transactions: u64,
}

impl ShapeCounts {
    pub fn zero() -> Self {
        Self {
            customers: 0,
            accounts: 0,
            transactions: 0,
        }
    }
}

/// One account as the inspector sees it: identity plus its
/// transactions in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountNode {
    pub account_id: AccountId,
    pub transaction_ids: Vec<TransactionId>,
}

/// One customer with its accounts in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerNode {
    pub customer_id: CustomerId,
    pub accounts: Vec<AccountNode>,
}

/// The full store contents as a creation-ordered tree. Creation order
/// (store insertion order) is what the merge shrink rule keys on:
/// most-recently-created entities are deleted first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub customers: Vec<CustomerNode>,
}

impl StoreSnapshot {
    pub fn counts(&self) -> ShapeCounts {
        let mut counts = ShapeCounts::zero();
        counts.customers = self.customers.len() as u64;
        for c in &self.customers {
            counts.accounts += c.accounts.len() as u64;
            for a in &c.accounts {
                counts.transactions += a.transaction_ids.len() as u64;
            }
        }
        counts
    }

    /// The inspector's count-map view: accounts per customer and
    /// transactions per account.
    pub fn shape(&self) -> CurrentShape {
        let mut accounts_per_customer = BTreeMap::new();
        let mut transactions_per_account = BTreeMap::new();
        for c in &self.customers {
            accounts_per_customer.insert(c.customer_id.clone(), c.accounts.len() as u64);
            for a in &c.accounts {
                transactions_per_account
                    .insert(a.account_id.clone(), a.transaction_ids.len() as u64);
            }
        }
        CurrentShape {
            customer_count: self.customers.len() as u64,
            accounts_per_customer,
            transactions_per_account,
        }
    }

    /// First per-parent deviation from a uniform target, if any.
    /// Returns a human-readable description of the offending parent.
    pub fn first_deviation_from(&self, target: &TargetShape) -> Option<String> {
        if self.customers.len() as i64 != target.customers {
            return Some(format!(
                "customer count {} != target {}",
                self.customers.len(),
                target.customers
            ));
        }
        for c in &self.customers {
            if c.accounts.len() as i64 != target.accounts_per_customer {
                return Some(format!(
                    "customer {} has {} accounts, target {}",
                    c.customer_id,
                    c.accounts.len(),
                    target.accounts_per_customer
                ));
            }
            for a in &c.accounts {
                if a.transaction_ids.len() as i64 != target.transactions_per_account {
                    return Some(format!(
                        "account {} has {} transactions, target {}",
                        a.account_id,
                        a.transaction_ids.len(),
                        target.transactions_per_account
                    ));
                }
            }
        }
        None
    }
}

/// The Store Inspector contract: counts grouped by parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentShape {
    pub customer_count: u64,
    pub accounts_per_customer: BTreeMap<CustomerId, u64>,
    pub transactions_per_account: BTreeMap<AccountId, u64>,
}
