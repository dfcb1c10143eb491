//! The reconciliation engine — the heart of the loader.
//!
//! A run is one atomic unit of work:
//!   1. Validate the requested target (no store access yet).
//!   2. Open the single write transaction.
//!   3. Snapshot the store (the inspector sees transaction state).
//!   4. Compute the plan for the requested mode (pure, see `plan`).
//!   5. Execute the plan front to back, synthesizing fields on demand.
//!   6. Re-inspect and verify the post-condition shape.
//!   7. Commit — or roll back on any failure, leaving the store
//!      exactly as it was pre-run.
//!
//! RULES:
//!   - No partial plan application is ever visible to later readers.
//!   - A post-condition mismatch is a fatal internal-consistency
//!     error, never silently tolerated.

use crate::{
    error::{LoadError, LoadResult},
    plan::{build_plan, LoadMode, ParentRef, Plan, PlanOp},
    shape::{ShapeCounts, StoreSnapshot, TargetShape},
    store::DataStore,
    synth::Synthesize,
    types::{AccountId, CustomerId},
};
use anyhow::anyhow;
use serde::Serialize;

/// Outcome of a committed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: LoadMode,
    pub target: TargetShape,
    pub created: ShapeCounts,
    pub deleted: ShapeCounts,
    pub final_shape: ShapeCounts,
}

pub struct LoadEngine<S: Synthesize> {
    store: DataStore,
    synth: S,
}

impl<S: Synthesize> LoadEngine<S> {
    pub fn new(store: DataStore, synth: S) -> Self {
        Self { store, synth }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn into_store(self) -> DataStore {
        self.store
    }

    /// Execute one reconciliation run. Atomic: commits entirely or
    /// rolls back entirely.
    pub fn run(&mut self, mode: LoadMode, target: TargetShape) -> LoadResult<RunReport> {
        target.validate()?;
        log::info!(
            "run start: mode={} target=({}, {}, {})",
            mode.as_str(),
            target.customers,
            target.accounts_per_customer,
            target.transactions_per_account
        );

        self.store.begin()?;
        match self.run_in_transaction(mode, target) {
            Ok(report) => {
                if let Err(e) = self.store.commit() {
                    self.store.rollback();
                    return Err(e);
                }
                log::info!(
                    "run committed: mode={} final={:?}",
                    mode.as_str(),
                    report.final_shape
                );
                Ok(report)
            }
            Err(e) => {
                self.store.rollback();
                log::warn!("run rolled back: mode={} error={e}", mode.as_str());
                Err(e)
            }
        }
    }

    fn run_in_transaction(
        &mut self,
        mode: LoadMode,
        target: TargetShape,
    ) -> LoadResult<RunReport> {
        let before = self.store.snapshot()?;
        let plan = build_plan(mode, &before, &target);
        log::debug!(
            "plan: {} ops ({} new customers, {} new accounts)",
            plan.ops.len(),
            plan.new_customers,
            plan.new_accounts
        );

        let (created, deleted) = self.execute(&plan)?;
        self.verify(mode, &before, &target)?;

        Ok(RunReport {
            mode,
            target,
            created,
            deleted,
            final_shape: self.store.counts()?,
        })
    }

    /// Apply the plan in order. Create ops invoke the synthesizer and
    /// insert; delete ops remove exactly the planned row. Handle
    /// tables map plan-created parents to their synthesized ids.
    fn execute(&mut self, plan: &Plan) -> LoadResult<(ShapeCounts, ShapeCounts)> {
        let mut created = ShapeCounts::zero();
        let mut deleted = ShapeCounts::zero();
        let mut new_customers: Vec<CustomerId> = Vec::with_capacity(plan.new_customers);
        let mut new_accounts: Vec<AccountId> = Vec::with_capacity(plan.new_accounts);

        for op in &plan.ops {
            match op {
                PlanOp::CreateCustomer { handle } => {
                    debug_assert_eq!(*handle, new_customers.len());
                    let customer = self.synth.customer()?;
                    customer.validate()?;
                    self.store.insert_customer(&customer)?;
                    new_customers.push(customer.customer_id);
                    created.customers += 1;
                }
                PlanOp::DeleteCustomer(id) => {
                    self.store.delete_customer(id)?;
                    deleted.customers += 1;
                }
                PlanOp::CreateAccount { customer, handle } => {
                    debug_assert_eq!(*handle, new_accounts.len());
                    let parent = resolve(customer, &new_customers)?;
                    let account = self.synth.account(parent)?;
                    if account.customer_id != *parent {
                        return Err(LoadError::Synthesis {
                            entity: "account",
                            reason: format!(
                                "synthesizer attached account to {} instead of {}",
                                account.customer_id, parent
                            ),
                        });
                    }
                    account.validate()?;
                    self.store.insert_account(&account)?;
                    new_accounts.push(account.account_id);
                    created.accounts += 1;
                }
                PlanOp::DeleteAccount(id) => {
                    self.store.delete_account(id)?;
                    deleted.accounts += 1;
                }
                PlanOp::CreateTransaction { account } => {
                    let parent = resolve(account, &new_accounts)?;
                    let transaction = self.synth.transaction(parent)?;
                    if transaction.account_id != *parent {
                        return Err(LoadError::Synthesis {
                            entity: "transaction",
                            reason: format!(
                                "synthesizer attached transaction to {} instead of {}",
                                transaction.account_id, parent
                            ),
                        });
                    }
                    transaction.validate()?;
                    self.store.insert_transaction(&transaction)?;
                    created.transactions += 1;
                }
                PlanOp::DeleteTransaction(id) => {
                    self.store.delete_transaction(id)?;
                    deleted.transactions += 1;
                }
            }
        }
        Ok((created, deleted))
    }

    /// Post-condition check, before commit. Replace and merge demand
    /// the exact uniform target per customer and per account; insert
    /// demands the prior contents plus exactly one new complement.
    fn verify(
        &self,
        mode: LoadMode,
        before: &StoreSnapshot,
        target: &TargetShape,
    ) -> LoadResult<()> {
        let after = self.store.snapshot()?;
        match mode {
            LoadMode::Replace | LoadMode::Merge => {
                if let Some(detail) = after.first_deviation_from(target) {
                    return Err(LoadError::PlanExecutionMismatch {
                        mode: mode.as_str(),
                        expected: target.counts(),
                        actual: after.counts(),
                        detail,
                    });
                }
            }
            LoadMode::Insert => {
                let prior = before.counts();
                let added = target.counts();
                let expected = ShapeCounts {
                    customers: prior.customers + added.customers,
                    accounts: prior.accounts + added.accounts,
                    transactions: prior.transactions + added.transactions,
                };
                let actual = after.counts();
                if actual != expected {
                    return Err(LoadError::PlanExecutionMismatch {
                        mode: mode.as_str(),
                        expected,
                        actual,
                        detail: "aggregate counts after insert differ from prior + complement"
                            .to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn resolve<'a, Id>(parent: &'a ParentRef<Id>, created: &'a [Id]) -> LoadResult<&'a Id> {
    match parent {
        ParentRef::Existing(id) => Ok(id),
        ParentRef::Created(handle) => created
            .get(*handle)
            .ok_or_else(|| anyhow!("plan referenced unfilled parent handle {handle}").into()),
    }
}
