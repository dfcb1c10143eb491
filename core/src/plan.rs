//! Plan computation — the pure half of the reconciliation engine.
//!
//! Each loading mode is a pure function from (current snapshot, target
//! shape) to an ordered operation list. Cascading deletion is expanded
//! explicitly here (transactions, then their account, then its
//! customer) rather than delegated to the storage engine, so a plan
//! can be audited and tested without a database.
//!
//! Ordering invariant: all deletions precede all creations, deletions
//! run children-first within each cascade, and creations run
//! parents-first. A plan executed front to back therefore never leaves
//! a child without a committed parent.
//!
//! Shrink selection rule (documented, deterministic): when a tier must
//! shrink, the most-recently-created entities are deleted first,
//! biasing survival toward long-lived seed data. Creation order is the
//! store's insertion order.

use crate::{
    shape::{AccountNode, CustomerNode, StoreSnapshot, TargetShape},
    types::{AccountId, CustomerId, TransactionId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    Replace,
    Insert,
    Merge,
}

impl LoadMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Insert => "insert",
            Self::Merge => "merge",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "replace" => Some(Self::Replace),
            "insert" => Some(Self::Insert),
            "merge" => Some(Self::Merge),
            _ => None,
        }
    }
}

/// Reference to a creation op's parent: either an entity already in
/// the store, or one created earlier in the same plan (by handle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef<Id> {
    Existing(Id),
    Created(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOp {
    CreateCustomer { handle: usize },
    DeleteCustomer(CustomerId),
    CreateAccount { customer: ParentRef<CustomerId>, handle: usize },
    DeleteAccount(AccountId),
    CreateTransaction { account: ParentRef<AccountId> },
    DeleteTransaction(TransactionId),
}

/// An ordered operation list plus the handle-table sizes the executor
/// needs for plan-created parents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub ops: Vec<PlanOp>,
    pub new_customers: usize,
    pub new_accounts: usize,
}

/// Compute the plan for one run. Pure; touches no store.
pub fn build_plan(mode: LoadMode, snapshot: &StoreSnapshot, target: &TargetShape) -> Plan {
    match mode {
        LoadMode::Replace => plan_replace(snapshot, target),
        LoadMode::Insert => plan_insert(target),
        LoadMode::Merge => plan_merge(snapshot, target),
    }
}

/// Replace: delete every existing entity, then create the full target
/// complement from scratch.
fn plan_replace(snapshot: &StoreSnapshot, target: &TargetShape) -> Plan {
    let mut b = PlanBuilder::default();
    for customer in snapshot.customers.iter().rev() {
        b.delete_customer_cascade(customer);
    }
    for _ in 0..target.customers {
        b.create_customer_complement(target);
    }
    b.finish()
}

/// Insert: create exactly the requested additional complement. The
/// store's current contents are irrelevant and untouched.
fn plan_insert(target: &TargetShape) -> Plan {
    let mut b = PlanBuilder::default();
    for _ in 0..target.customers {
        b.create_customer_complement(target);
    }
    b.finish()
}

/// Merge: per-tier delta in dependency order. Customers first, then
/// accounts for every surviving customer, then transactions for every
/// surviving account.
fn plan_merge(snapshot: &StoreSnapshot, target: &TargetShape) -> Plan {
    let mut b = PlanBuilder::default();

    let customer_delta = target.customers - snapshot.customers.len() as i64;
    let shrink_by = (-customer_delta).max(0) as usize;
    let keep = snapshot.customers.len() - shrink_by;
    let (survivors, victims) = snapshot.customers.split_at(keep);

    for customer in victims.iter().rev() {
        b.delete_customer_cascade(customer);
    }

    for customer in survivors {
        let account_delta = target.accounts_per_customer - customer.accounts.len() as i64;
        let account_shrink = (-account_delta).max(0) as usize;
        let kept_accounts = customer.accounts.len() - account_shrink;
        let (surviving_accounts, victim_accounts) = customer.accounts.split_at(kept_accounts);

        for account in victim_accounts.iter().rev() {
            b.delete_account_cascade(account);
        }
        for account in surviving_accounts {
            b.transaction_delta(account, target.transactions_per_account);
        }
        for _ in 0..account_delta.max(0) {
            b.create_account_complement(
                ParentRef::Existing(customer.customer_id.clone()),
                target.transactions_per_account,
            );
        }
    }

    for _ in 0..customer_delta.max(0) {
        b.create_customer_complement(target);
    }

    b.finish()
}

#[derive(Default)]
struct PlanBuilder {
    deletes: Vec<PlanOp>,
    creates: Vec<PlanOp>,
    new_customers: usize,
    new_accounts: usize,
}

impl PlanBuilder {
    fn delete_customer_cascade(&mut self, customer: &CustomerNode) {
        for account in customer.accounts.iter().rev() {
            self.delete_account_cascade(account);
        }
        self.deletes
            .push(PlanOp::DeleteCustomer(customer.customer_id.clone()));
    }

    fn delete_account_cascade(&mut self, account: &AccountNode) {
        for txn_id in account.transaction_ids.iter().rev() {
            self.deletes.push(PlanOp::DeleteTransaction(txn_id.clone()));
        }
        self.deletes
            .push(PlanOp::DeleteAccount(account.account_id.clone()));
    }

    /// One new customer with its full account/transaction complement.
    fn create_customer_complement(&mut self, target: &TargetShape) {
        let handle = self.new_customers;
        self.new_customers += 1;
        self.creates.push(PlanOp::CreateCustomer { handle });
        for _ in 0..target.accounts_per_customer {
            self.create_account_complement(
                ParentRef::Created(handle),
                target.transactions_per_account,
            );
        }
    }

    /// One new account with its full transaction complement.
    fn create_account_complement(
        &mut self,
        customer: ParentRef<CustomerId>,
        transactions: i64,
    ) {
        let handle = self.new_accounts;
        self.new_accounts += 1;
        self.creates.push(PlanOp::CreateAccount { customer, handle });
        for _ in 0..transactions {
            self.creates.push(PlanOp::CreateTransaction {
                account: ParentRef::Created(handle),
            });
        }
    }

    /// Adjust a surviving account's transactions toward the target.
    fn transaction_delta(&mut self, account: &AccountNode, target_transactions: i64) {
        let delta = target_transactions - account.transaction_ids.len() as i64;
        if delta < 0 {
            let keep = account.transaction_ids.len() - (-delta) as usize;
            for txn_id in account.transaction_ids[keep..].iter().rev() {
                self.deletes.push(PlanOp::DeleteTransaction(txn_id.clone()));
            }
        } else {
            for _ in 0..delta {
                self.creates.push(PlanOp::CreateTransaction {
                    account: ParentRef::Existing(account.account_id.clone()),
                });
            }
        }
    }

    fn finish(mut self) -> Plan {
        let mut ops = self.deletes;
        ops.append(&mut self.creates);
        Plan {
            ops,
            new_customers: self.new_customers,
            new_accounts: self.new_accounts,
        }
    }
}
