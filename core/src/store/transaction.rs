use super::DataStore;
use crate::{
    error::LoadResult,
    model::{Transaction, TransactionType},
};
use anyhow::anyhow;
use rusqlite::params;

impl DataStore {
    // ── Transaction ───────────────────────────────────────────────

    pub fn insert_transaction(&self, t: &Transaction) -> LoadResult<()> {
        self.conn.execute(
            "INSERT INTO transactions (
                transaction_id, account_id, transaction_type, amount_cents,
                currency, description, merchant, category, transaction_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &t.transaction_id,
                &t.account_id,
                t.transaction_type.as_str(),
                t.amount_cents,
                &t.currency,
                &t.description,
                &t.merchant,
                &t.category,
                t.transaction_date,
            ],
        )?;
        Ok(())
    }

    pub fn delete_transaction(&self, transaction_id: &str) -> LoadResult<()> {
        let n = self.conn.execute(
            "DELETE FROM transactions WHERE transaction_id = ?1",
            params![transaction_id],
        )?;
        if n == 0 {
            return Err(anyhow!("delete_transaction: no row for {transaction_id}").into());
        }
        Ok(())
    }

    pub fn get_transaction(&self, transaction_id: &str) -> LoadResult<Option<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT transaction_id, account_id, transaction_type, amount_cents,
                    currency, description, merchant, category, transaction_date
             FROM transactions WHERE transaction_id = ?1",
        )?;
        let mut rows = stmt.query_map(params![transaction_id], |row| {
            let type_str: String = row.get(2)?;
            Ok(Transaction {
                transaction_id: row.get(0)?,
                account_id: row.get(1)?,
                transaction_type: TransactionType::parse(&type_str).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        format!("unknown transaction_type '{type_str}'").into(),
                    )
                })?,
                amount_cents: row.get(3)?,
                currency: row.get(4)?,
                description: row.get(5)?,
                merchant: row.get(6)?,
                category: row.get(7)?,
                transaction_date: row.get(8)?,
            })
        })?;
        rows.next().transpose().map_err(Into::into)
    }

    /// All transaction identities in creation order.
    pub fn transaction_ids(&self) -> LoadResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT transaction_id FROM transactions ORDER BY rowid ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
