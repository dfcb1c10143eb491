//! Field synthesis: plausible values for freshly created entities.
//!
//! RULE: Synthesizers are pure of store access. They see only the
//! parent key they are handed plus their own RNG stream. Identity is
//! always a fresh UUID v4 — 128-bit identities make cross-run
//! collisions negligible without any shared counter (the reason insert
//! mode can run back to back safely).

use crate::{
    config::GenConfig,
    error::LoadResult,
    model::{Account, AccountType, Customer, CustomerType, Transaction, TransactionType},
    names::NamePool,
    rng::SynthRng,
    types::{AccountId, CustomerId},
};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

/// The synthesis surface the reconciliation engine consumes. Swappable
/// without touching reconciliation logic; tests inject failing
/// implementations to exercise rollback.
pub trait Synthesize {
    fn customer(&mut self) -> LoadResult<Customer>;
    fn account(&mut self, customer_id: &CustomerId) -> LoadResult<Account>;
    fn transaction(&mut self, account_id: &AccountId) -> LoadResult<Transaction>;
}

/// Default synthesizer: curated value pools driven by a seeded PCG
/// stream per tier.
pub struct FieldSynthesizer {
    config: GenConfig,
    today: NaiveDate,
    customer_rng: SynthRng,
    account_rng: SynthRng,
    transaction_rng: SynthRng,
}

impl FieldSynthesizer {
    pub fn new(seed: u64, config: GenConfig) -> Self {
        let base = SynthRng::new(seed);
        Self {
            config,
            today: Utc::now().date_naive(),
            customer_rng: base.derive(1),
            account_rng: base.derive(2),
            transaction_rng: base.derive(3),
        }
    }

    fn date_days_back(rng: &mut SynthRng, today: NaiveDate, lo: i64, hi: i64) -> NaiveDate {
        let back = rng.range_i64(lo.min(hi), lo.max(hi));
        today - Duration::days(back)
    }
}

impl Synthesize for FieldSynthesizer {
    fn customer(&mut self) -> LoadResult<Customer> {
        let rng = &mut self.customer_rng;
        let name = NamePool::full_name(rng);
        let email = NamePool::email_for(&name, rng);
        let customer = Customer {
            customer_id: Uuid::new_v4().to_string(),
            email,
            phone: NamePool::phone(rng),
            address: NamePool::street_address(rng),
            date_joined: Self::date_days_back(
                rng,
                self.today,
                self.config.join_window_end_days,
                self.config.join_window_start_days,
            ),
            customer_type: *rng.pick(&CustomerType::ALL),
            name,
        };
        customer.validate()?;
        Ok(customer)
    }

    fn account(&mut self, customer_id: &CustomerId) -> LoadResult<Account> {
        let rng = &mut self.account_rng;
        let account = Account {
            account_id: Uuid::new_v4().to_string(),
            customer_id: customer_id.clone(),
            account_number: format!("{:010}", rng.next_u64_below(10_000_000_000)),
            iban: format!(
                "GB{:02}FORG{:014}",
                rng.next_u64_below(100),
                rng.next_u64_below(100_000_000_000_000)
            ),
            account_type: *rng.pick(&AccountType::ALL),
            currency: rng.pick(&self.config.currencies).clone(),
            balance_cents: rng.range_i64(
                self.config.min_balance_cents,
                self.config.max_balance_cents,
            ),
            created_date: Self::date_days_back(rng, self.today, 0, self.config.account_window_days),
        };
        account.validate()?;
        Ok(account)
    }

    fn transaction(&mut self, account_id: &AccountId) -> LoadResult<Transaction> {
        let rng = &mut self.transaction_rng;
        let transaction_type = *rng.pick(&TransactionType::ALL);
        // Merchants only make sense for outbound spend.
        let merchant = match transaction_type {
            TransactionType::Payment | TransactionType::Withdrawal => {
                Some(NamePool::merchant(rng))
            }
            _ => None,
        };
        let category = if transaction_type.is_credit() {
            "income".to_string()
        } else {
            rng.pick(&self.config.categories).clone()
        };
        let date = Self::date_days_back(rng, self.today, 0, self.config.transaction_window_days);
        let seconds = rng.next_u64_below(86_400) as u32;
        let time =
            NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or(NaiveTime::MIN);
        let transaction = Transaction {
            transaction_id: Uuid::new_v4().to_string(),
            account_id: account_id.clone(),
            transaction_type,
            amount_cents: rng
                .range_i64(self.config.min_amount_cents, self.config.max_amount_cents),
            currency: rng.pick(&self.config.currencies).clone(),
            description: NamePool::description(rng),
            merchant,
            category,
            transaction_date: NaiveDateTime::new(date, time),
        };
        transaction.validate()?;
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn synthesized_entities_validate_and_link() {
        let mut synth = FieldSynthesizer::new(42, GenConfig::default());
        let customer = synth.customer().unwrap();
        let account = synth.account(&customer.customer_id).unwrap();
        let txn = synth.transaction(&account.account_id).unwrap();

        assert_eq!(account.customer_id, customer.customer_id);
        assert_eq!(txn.account_id, account.account_id);
    }

    #[test]
    fn identities_are_fresh_across_draws() {
        let mut synth = FieldSynthesizer::new(1, GenConfig::default());
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let c = synth.customer().unwrap();
            assert!(seen.insert(c.customer_id), "duplicate customer identity");
        }
    }

    #[test]
    fn merchant_present_only_for_spend_types() {
        let mut synth = FieldSynthesizer::new(77, GenConfig::default());
        for _ in 0..200 {
            let txn = synth.transaction(&"a-test".to_string()).unwrap();
            let expect_merchant = matches!(
                txn.transaction_type,
                TransactionType::Payment | TransactionType::Withdrawal
            );
            assert_eq!(txn.merchant.is_some(), expect_merchant);
        }
    }

    #[test]
    fn credit_types_are_categorized_as_income() {
        let mut synth = FieldSynthesizer::new(3, GenConfig::default());
        for _ in 0..200 {
            let txn = synth.transaction(&"a-test".to_string()).unwrap();
            if txn.transaction_type.is_credit() {
                assert_eq!(txn.category, "income");
            }
        }
    }
}
