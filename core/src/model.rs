//! Entity model: the three relational tiers and their identity rules.
//!
//! RULES:
//!   - Identities are opaque UUID strings, never row counters, so
//!     repeated insert runs can never clash with earlier ones.
//!   - Parent references are mandatory and immutable once assigned.
//!   - Monetary fields are integer cents.
//!   - `validate()` runs once at construction/insert time; the store
//!     never sees a record that fails it.

use crate::{
    error::{LoadError, LoadResult},
    types::{AccountId, Cents, CustomerId, TransactionId},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    Individual,
    Business,
    Premium,
}

impl CustomerType {
    pub const ALL: [CustomerType; 3] = [Self::Individual, Self::Business, Self::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Business => "business",
            Self::Premium => "premium",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
    Investment,
    Credit,
}

impl AccountType {
    pub const ALL: [AccountType; 4] =
        [Self::Checking, Self::Savings, Self::Investment, Self::Credit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Investment => "investment",
            Self::Credit => "credit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    Payment,
    Fee,
}

impl TransactionType {
    pub const ALL: [TransactionType; 5] = [
        Self::Deposit,
        Self::Withdrawal,
        Self::Transfer,
        Self::Payment,
        Self::Fee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
            Self::Payment => "payment",
            Self::Fee => "fee",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// Credit-like types add to a balance; the rest draw from it.
    pub fn is_credit(&self) -> bool {
        matches!(self, Self::Deposit | Self::Transfer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_joined: NaiveDate,
    pub customer_type: CustomerType,
}

impl Customer {
    pub fn validate(&self) -> LoadResult<()> {
        if self.customer_id.is_empty() {
            return Err(invalid("customer", "empty customer_id"));
        }
        if self.name.is_empty() {
            return Err(invalid("customer", "empty name"));
        }
        if self.email.is_empty() || !self.email.contains('@') {
            return Err(invalid("customer", "malformed email"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub customer_id: CustomerId,
    pub account_number: String,
    pub iban: String,
    pub account_type: AccountType,
    pub currency: String,
    pub balance_cents: Cents,
    pub created_date: NaiveDate,
}

impl Account {
    pub fn validate(&self) -> LoadResult<()> {
        if self.account_id.is_empty() {
            return Err(invalid("account", "empty account_id"));
        }
        if self.customer_id.is_empty() {
            return Err(invalid("account", "missing parent customer_id"));
        }
        if self.currency.len() != 3 {
            return Err(invalid("account", "currency must be a 3-letter code"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub transaction_type: TransactionType,
    pub amount_cents: Cents,
    pub currency: String,
    pub description: String,
    pub merchant: Option<String>,
    pub category: String,
    pub transaction_date: NaiveDateTime,
}

impl Transaction {
    pub fn validate(&self) -> LoadResult<()> {
        if self.transaction_id.is_empty() {
            return Err(invalid("transaction", "empty transaction_id"));
        }
        if self.account_id.is_empty() {
            return Err(invalid("transaction", "missing parent account_id"));
        }
        if self.amount_cents < 0 {
            return Err(invalid("transaction", "negative amount"));
        }
        Ok(())
    }
}

fn invalid(entity: &'static str, reason: &str) -> LoadError {
    LoadError::Synthesis {
        entity,
        reason: reason.to_string(),
    }
}
