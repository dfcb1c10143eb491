//! Generation configuration: value pools and bounded historical windows.
//!
//! Defaults match the seeded production profile; a JSON file with the
//! same field names can override any of them (`datagen --config`).

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub currencies: Vec<String>,
    pub categories: Vec<String>,

    /// New-account balance range, in cents.
    pub min_balance_cents: i64,
    pub max_balance_cents: i64,

    /// Transaction amount range, in cents.
    pub min_amount_cents: i64,
    pub max_amount_cents: i64,

    /// Customer join dates fall this many days back from today.
    pub join_window_start_days: i64,
    pub join_window_end_days: i64,

    /// Account creation dates fall within this many days back.
    pub account_window_days: i64,

    /// Transaction timestamps fall within this many days back.
    pub transaction_window_days: i64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            currencies: ["USD", "EUR", "GBP", "CAD"]
                .map(String::from)
                .to_vec(),
            categories: [
                "groceries",
                "restaurants",
                "gas",
                "shopping",
                "entertainment",
                "utilities",
                "rent",
                "insurance",
                "healthcare",
                "education",
                "travel",
                "other",
            ]
            .map(String::from)
            .to_vec(),
            min_balance_cents: 10_000,     // $100
            max_balance_cents: 5_000_000,  // $50k
            min_amount_cents: 500,         // $5
            max_amount_cents: 500_000,     // $5k
            join_window_start_days: 365 * 3,
            join_window_end_days: 30,
            account_window_days: 365 * 2,
            transaction_window_days: 365,
        }
    }
}

impl GenConfig {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: GenConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Sanity-check ranges so synthesis can sample without clamping.
    pub fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.currencies.is_empty(), "currencies must not be empty");
        anyhow::ensure!(!self.categories.is_empty(), "categories must not be empty");
        anyhow::ensure!(
            self.min_balance_cents >= 0 && self.min_balance_cents <= self.max_balance_cents,
            "balance range is inverted"
        );
        anyhow::ensure!(
            self.min_amount_cents >= 0 && self.min_amount_cents <= self.max_amount_cents,
            "amount range is inverted"
        );
        anyhow::ensure!(
            self.join_window_end_days <= self.join_window_start_days,
            "join window is inverted"
        );
        Ok(())
    }
}
